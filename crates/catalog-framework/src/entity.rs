//! # Entity Trait
//!
//! The `Entity` trait is the contract every record type (currently only `Product`) must satisfy
//! to be served by a [`ResourceActor`](crate::ResourceActor) or spoken to through a
//! [`RemoteCollection`](crate::RemoteCollection). It fixes the associated types for the id, the
//! create payload (the *draft*) and the partial update payload (the *patch*).
//!
//! # Architecture Note
//! The associated types keep the wire contracts apart at compile time: a `ProductDraft` can only
//! be sent where a `Product` collection expects one, and an update can only carry that entity's
//! `Patch` type.
//!
//! # Patches
//! A patch is "the fields that changed". The same type is used in both directions:
//! - outbound, as the body of an update request;
//! - inbound, as the fields the server echoed back, which the caller shallow-merges into its own
//!   cached copy with [`Entity::apply_patch`].

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be served by the framework.
pub trait Entity: Clone + Send + Sync + Debug + 'static {
    /// The unique identifier for this entity. Must be constructible from `u32` so that the
    /// in-memory actor can assign ids the way the remote API does.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new record. The id is assigned by the server.
    type Draft: Send + Sync + Debug;

    /// A partial record: every field optional.
    type Patch: Clone + Send + Sync + Debug;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The record's id.
    fn id(&self) -> &Self::Id;

    /// Construct the full record from the server-assigned id and the draft.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Result<Self, Self::Error>;

    /// Shallow-merge the present fields of `patch` into `self`.
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    /// A patch carrying every field of `self`.
    fn to_patch(&self) -> Self::Patch;
}
