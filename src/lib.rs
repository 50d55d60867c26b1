#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Catalog Admin
//!
//! > **A product-catalog admin table, driven by an actor.**
//!
//! This crate lists products from a remote REST API in a paged, sortable, searchable table and
//! lets the user add, edit and delete them through validated forms. Writes are applied to the
//! cached page optimistically, because the public demo API answers writes without keeping them.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One writer for the whole screen
//! All screen state lives in a single [`CatalogSession`](session::CatalogSession) actor. Commands
//! and remote results are processed one at a time, so there are no locks and no races between
//! a page fetch and a user clicking "next". Stale fetches are recognised by ticket and ignored.
//!
//! ### Pure table core
//! The [`table`] module knows nothing about actors or HTTP. The
//! [`TableEngine`](table::TableEngine) is a pure function of rows and view state, and the
//! [`PaginationStore`](table::PaginationStore) is a plain value with named mutations.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`], [`product_actor`])
//! - **Role**: the `Product` record, its draft and patch payloads, and the
//!   [`Entity`](catalog_framework::Entity) impl that lets an in-memory actor serve products
//!   offline.
//!
//! ### 2. The Sources ([`clients`])
//! - **Role**: the HTTP implementation of
//!   [`RemoteCollection`](catalog_framework::RemoteCollection) and the traced
//!   [`ProductClient`](clients::ProductClient) wrapper.
//!
//! ### 3. The Table ([`table`], [`cache`])
//! - **Role**: paging, column model and formatting, view state, the engine, the text renderer,
//!   and the page cache with its optimistic patch helpers.
//!
//! ### 4. The Forms ([`forms`])
//! - **Role**: form values and validation, the form state machine, and the edit dialog target.
//!
//! ### 5. The Orchestrator ([`session`])
//! - **Role**: the session actor, its handle, and [`CatalogSystem`](session::CatalogSystem),
//!   which starts it against HTTP or the offline sample catalog.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # First page from the live API
//! RUST_LOG=info cargo run -- list
//!
//! # Sorted by price, descending, without network
//! cargo run -- --offline list --size 20 --sort price:desc
//! ```

pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod forms;
pub mod model;
pub mod product_actor;
pub mod session;
pub mod table;

pub use error::{CatalogError, Result};
