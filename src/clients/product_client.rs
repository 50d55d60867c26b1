//! # Product Client
//!
//! Provides the catalog's API for product data. It wraps whichever
//! [`RemoteCollection<Product>`] the system was started with (HTTP, the offline actor, or a
//! mock) and adds paging from the [`PaginationStore`] and tracing around every call.
//!
//! Failures are returned as they are: nothing is retried.

use crate::model::{Product, ProductDraft, ProductId, ProductPatch};
use crate::table::PaginationStore;
use catalog_framework::{Page, RemoteCollection, RemoteError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Client for product data.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<dyn RemoteCollection<Product>>,
}

impl std::fmt::Debug for ProductClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductClient").finish_non_exhaustive()
    }
}

impl ProductClient {
    pub fn new(inner: Arc<dyn RemoteCollection<Product>>) -> Self {
        Self { inner }
    }

    /// Fetches the page the store currently points at.
    #[instrument(skip(self, pages), fields(page_index = pages.page_index(), page_size = pages.page_size()))]
    pub async fn fetch_page(&self, pages: &PaginationStore) -> Result<Page<Product>, RemoteError> {
        self.list(pages.skip(), pages.limit()).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Page<Product>, RemoteError> {
        debug!("Sending request");
        let result = self.inner.list(skip, limit).await;
        match &result {
            Ok(page) => debug!(rows = page.items.len(), total = page.total, "Page received"),
            Err(e) => warn!(error = %e, "List failed"),
        }
        result
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product, RemoteError> {
        debug!("Sending request");
        self.inner.get(id).await
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, RemoteError> {
        debug!("Sending request");
        let created = self.inner.create(draft).await?;
        info!(id = %created.id, "Product created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<ProductPatch, RemoteError> {
        debug!(?patch, "Sending request");
        let echoed = self.inner.update(id, patch).await?;
        info!("Product updated");
        Ok(echoed)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<Product, RemoteError> {
        debug!("Sending request");
        let deleted = self.inner.delete(id).await?;
        info!("Product deleted");
        Ok(deleted)
    }
}
