//! # RemoteCollection Trait
//!
//! The seam between the catalog screens and wherever the records actually live. The session
//! only ever talks to an `Arc<dyn RemoteCollection<T>>`; production wires in the HTTP client,
//! offline mode and tests wire in a [`ResourceClient`] (real actor or [`MockClient`](crate::mock::MockClient)).
//!
//! Implementations must not retry. `list` and `get` are side-effect free; `create`, `update` and
//! `delete` are not idempotent against the remote API, so a failed call is reported and the user
//! decides whether to resubmit.

use crate::{Entity, Page, RemoteError, ResourceClient};
use async_trait::async_trait;

#[async_trait]
pub trait RemoteCollection<T: Entity>: Send + Sync {
    /// Fetch `limit` records starting at offset `skip`, with the collection total.
    async fn list(&self, skip: u64, limit: u64) -> Result<Page<T>, RemoteError>;

    /// Fetch one record. A missing record is an HTTP 404.
    async fn get(&self, id: T::Id) -> Result<T, RemoteError>;

    /// Create a record; the server assigns the id.
    async fn create(&self, draft: T::Draft) -> Result<T, RemoteError>;

    /// Update a record. Returns the fields the server echoed back.
    async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T::Patch, RemoteError>;

    /// Delete a record. Returns the deleted record as echoed by the server.
    async fn delete(&self, id: T::Id) -> Result<T, RemoteError>;
}

#[async_trait]
impl<T: Entity> RemoteCollection<T> for ResourceClient<T> {
    #[tracing::instrument(skip(self))]
    async fn list(&self, skip: u64, limit: u64) -> Result<Page<T>, RemoteError> {
        tracing::debug!("Sending request");
        ResourceClient::list(self, skip, limit)
            .await
            .map_err(RemoteError::from)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<T, RemoteError> {
        tracing::debug!("Sending request");
        let missing = id.to_string();
        match ResourceClient::get(self, id).await {
            Ok(Some(item)) => Ok(item),
            Ok(None) => Err(RemoteError::from(crate::FrameworkError::NotFound(missing))),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, draft: T::Draft) -> Result<T, RemoteError> {
        tracing::debug!("Sending request");
        ResourceClient::create(self, draft)
            .await
            .map_err(RemoteError::from)
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T::Patch, RemoteError> {
        tracing::debug!("Sending request");
        ResourceClient::update(self, id, patch)
            .await
            .map(|item| item.to_patch())
            .map_err(RemoteError::from)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<T, RemoteError> {
        tracing::debug!("Sending request");
        ResourceClient::delete(self, id)
            .await
            .map_err(RemoteError::from)
    }
}
