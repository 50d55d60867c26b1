//! # Catalog Framework
//!
//! Entity-agnostic building blocks for screens that page through a remote collection of
//! records: the [`Entity`] contract, the [`RemoteCollection`] seam every data source sits
//! behind, and an actor-backed in-memory collection for offline use and tests.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`Entity`]) - the record type, its create payload (draft) and its
//!    partial update payload (patch).
//! 2. **Source Layer** ([`RemoteCollection`]) - `list/get/create/update/delete` with a single
//!    error taxonomy ([`RemoteError`]). The HTTP client in the application crate implements it;
//!    so does [`ResourceClient`].
//! 3. **Runtime Layer** ([`ResourceActor`]) - an in-memory collection that owns its records and
//!    answers requests sequentially over a channel, mimicking the remote API's paging.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task and processes one request at a time, so its store
//!   needs no locks.
//! - Clients are cheap clones of a channel sender.
//! - Dropping the last client stops the actor.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a queue of expectations and makes error
//! injection trivial; [`mock::create_mock_client`] gives the test the raw request receiver so it
//! can answer requests in any order. See the [`mock`] module for both.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod page;
pub mod tracing;

// Re-export core types for convenience
pub use actor::{ResourceActor, WriteMode};
pub use client::ResourceClient;
pub use client_trait::RemoteCollection;
pub use entity::Entity;
pub use error::{FrameworkError, RemoteError};
pub use message::{ResourceRequest, Response};
pub use page::Page;
