use super::actor::CatalogSession;
use super::error::SessionError;
use super::handle::SessionHandle;
use crate::clients::{HttpProductApi, ProductClient};
use crate::config::AppConfig;
use crate::error::Result;
use crate::model::Product;
use crate::table::product_columns;
use catalog_framework::{RemoteCollection, WriteMode};
use std::sync::Arc;
use tracing::{error, info};

/// Size of the offline sample catalog; the same as the public demo API.
pub const OFFLINE_PRODUCTS: u32 = 194;

/// Starts and stops the catalog session and, in offline mode, the in-memory product
/// collection behind it.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::offline(&AppConfig::default());
/// let first = system.session.settled().await?;
/// println!("{}", first.footer.label); // "1-10 of 194"
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    /// Handle for driving the session.
    pub session: SessionHandle,

    /// Task handles for the session and any local collection (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts a session over any product collection. Must be called inside a Tokio runtime.
    pub fn start(config: &AppConfig, backend: Arc<dyn RemoteCollection<Product>>) -> Self {
        let client = ProductClient::new(backend);
        let (session, sender, snapshots) = CatalogSession::new(config, client, product_columns());
        let handle = tokio::spawn(session.run());
        Self {
            session: SessionHandle::new(sender, snapshots),
            handles: vec![handle],
        }
    }

    /// Starts a session against the remote HTTP API.
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let api = HttpProductApi::new(&config.api)?;
        info!(base_url = %api.base_url(), "Connecting to product API");
        Ok(Self::start(config, Arc::new(api)))
    }

    /// Starts a session against a local sample catalog that, like the public API, answers
    /// writes without keeping them.
    pub fn offline(config: &AppConfig) -> Self {
        let (actor, client) = crate::product_actor::seeded(
            config.session.channel_capacity,
            OFFLINE_PRODUCTS,
            WriteMode::Echo,
        );
        let actor_handle = tokio::spawn(actor.run());
        let mut system = Self::start(config, Arc::new(client));
        system.handles.push(actor_handle);
        system
    }

    /// Gracefully shuts down the session and waits for its tasks.
    ///
    /// Dropping the handle closes the session's channel; the session then drops its client,
    /// which in turn stops a local collection actor. Other clones of the handle keep the session
    /// alive, so drop them first.
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down catalog...");
        drop(self.session);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Task failed: {:?}", e);
                return Err(SessionError::TaskFailed(e.to_string()).into());
            }
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}
