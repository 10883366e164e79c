use std::sync::Arc;

use partition_actor::PartitionActor;
use tracing::{error, info};

use crate::asset::{AssetResolver, BlobStore, MemoryBlobStore};
use crate::catalog::CatalogService;
use crate::clients::{CatalogClient, ProductClient};
use crate::config::CatalogConfig;
use crate::keygen::KeyGenerator;
use crate::model::Product;

/// Runtime that owns the product store and wires the catalog around it.
///
/// `CatalogSystem` is responsible for:
/// - **Lifecycle Management**: spawning the store actor and stopping it again
/// - **Dependency Wiring**: one store client shared by the key generator and the
///   product client, one resolver over the blob store
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::new(CatalogConfig::from_env()?);
///
/// let upload = system.catalog.upload_image("widget.png", bytes).await?;
/// let draft = ProductDraft::new("Widget", 9.99, 10)
///     .with_image(ImageSource::Pending(upload.handle));
/// let widget = system.catalog.create_product(draft).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    /// Client for the presentation layer.
    pub catalog: CatalogClient,

    config: CatalogConfig,

    /// Store actor task, awaited on shutdown.
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogSystem {
    /// Starts a catalog backed by an in-memory blob store.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: CatalogConfig) -> Self {
        let blobs = Arc::new(MemoryBlobStore::new(config.blob_base_url.as_str()));
        Self::with_blob_store(config, blobs)
    }

    /// Starts a catalog over the given blob store.
    pub fn with_blob_store(config: CatalogConfig, blobs: Arc<dyn BlobStore>) -> Self {
        let (actor, store) = PartitionActor::<Product>::new(config.store_buffer);
        let store = store.with_page_size(config.scan_page_size);
        let handle = tokio::spawn(actor.run());

        let service = CatalogService::new(
            ProductClient::new(store.clone(), config.partition.as_str()),
            KeyGenerator::new(store),
            AssetResolver::new(blobs, config.upload_ttl),
            config.key_retries,
        );
        info!(
            partition = %config.partition,
            key_retries = config.key_retries,
            "Catalog started"
        );

        Self {
            catalog: CatalogClient::new(service),
            config,
            handle,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Stops the store actor.
    ///
    /// Dropping the catalog client closes the store channel once every clone of it
    /// is gone; the actor then drains and exits.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor stopped cleanly
    /// - `Err(String)` if the actor task panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");
        drop(self.catalog);

        if let Err(e) = self.handle.await {
            error!("Store actor task failed: {:?}", e);
            return Err(format!("Store actor task failed: {:?}", e));
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}
