use tracing::{debug, instrument};

use crate::asset::PendingUpload;
use crate::catalog::{CatalogError, CatalogService};
use crate::model::{ProductChanges, ProductDraft, ProductView};

/// Entry point for the presentation layer.
///
/// Wraps a [`CatalogService`] and answers with [`ProductView`]s, so callers never
/// see partition keys or stored record layout. Cheap to clone.
#[derive(Clone)]
pub struct CatalogClient {
    service: CatalogService,
}

impl CatalogClient {
    pub fn new(service: CatalogService) -> Self {
        Self { service }
    }

    /// The service underneath, for callers that need stored records rather than views.
    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductView>, CatalogError> {
        let products = self.service.list_all().await?;
        debug!(count = products.len(), "Listing products");
        Ok(products.into_iter().map(ProductView::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<ProductView, CatalogError> {
        self.service.get_by_id(id).await.map(ProductView::from)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<ProductView, CatalogError> {
        self.service.create(draft).await.map(ProductView::from)
    }

    #[instrument(skip(self, changes))]
    pub async fn update_product(
        &self,
        id: &str,
        changes: ProductChanges,
    ) -> Result<ProductView, CatalogError> {
        debug!(?changes, "update_product called");
        self.service.update(id, changes).await.map(ProductView::from)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        self.service.delete(id).await
    }

    /// Stores an image and returns the handle to pass in a later
    /// [`create_product`](Self::create_product).
    #[instrument(skip(self, bytes))]
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PendingUpload, CatalogError> {
        self.service.stage_image(file_name, bytes).await
    }
}
