//! # Catalog Service
//!
//! Create, read, update and delete for products, plus the upload step of the
//! two-phase create. The service owns one rule the store cannot enforce: a stored
//! product never points at an image the blob store does not hold.
//!
//! ## Create
//!
//! 1. The draft is validated; nothing else happens for an invalid draft.
//! 2. The image, if any, is resolved.
//! 3. The caller's row key is used as given, otherwise the [`KeyGenerator`] supplies one.
//! 4. The record is inserted. A generated key that collides with another writer is
//!    regenerated up to `key_retries` times; a caller-supplied key that collides
//!    fails at once with [`CatalogError::Conflict`].
//! 5. The pending upload handle is released.

use tracing::{error, info, instrument, warn};

use crate::asset::{AssetRef, AssetResolver, PendingUpload};
use crate::catalog::validation::{validate_changes, validate_draft};
use crate::catalog::CatalogError;
use crate::clients::ProductClient;
use crate::keygen::KeyGenerator;
use crate::model::{ImageSource, Product, ProductChanges, ProductDraft};

/// Product operations over one catalog partition.
#[derive(Clone)]
pub struct CatalogService {
    products: ProductClient,
    keys: KeyGenerator<Product>,
    assets: AssetResolver,
    key_retries: u32,
}

impl CatalogService {
    pub fn new(
        products: ProductClient,
        keys: KeyGenerator<Product>,
        assets: AssetResolver,
        key_retries: u32,
    ) -> Self {
        Self {
            products,
            keys,
            assets,
            key_retries,
        }
    }

    pub fn partition(&self) -> &str {
        self.products.partition()
    }

    /// Every product in the partition.
    pub async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.products.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, row_key: &str) -> Result<Product, CatalogError> {
        self.products
            .find(row_key)
            .await?
            .ok_or_else(|| CatalogError::not_found(self.partition(), row_key))
    }

    /// Stores a new product and returns it with its row key filled in.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for a bad draft or an unresolvable image
    /// - [`CatalogError::Conflict`] when the key is taken
    /// - [`CatalogError::KeyspaceExhausted`] when no numeric key is left
    /// - [`CatalogError::StoreUnavailable`] when either store fails
    #[instrument(skip(self, draft), fields(partition = %self.partition()))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        validate_draft(&draft)?;

        let image = match &draft.image {
            Some(source) => Some(self.resolve_image(source).await?),
            None => None,
        };

        let product = match draft.requested_row_key() {
            Some(row_key) => {
                let product =
                    Product::from_draft(self.partition(), row_key, &draft, image.as_ref());
                self.products.insert(product.clone()).await?;
                product
            }
            None => self.insert_with_generated_key(&draft, image.as_ref()).await?,
        };

        if let Some(ImageSource::Pending(handle)) = &draft.image {
            self.assets.release(handle);
        }
        info!(row_key = %product.row_key, name = %product.name, "Product created");
        Ok(product)
    }

    async fn insert_with_generated_key(
        &self,
        draft: &ProductDraft,
        image: Option<&AssetRef>,
    ) -> Result<Product, CatalogError> {
        let mut retries_left = self.key_retries;
        loop {
            let row_key = self.keys.next_row_key(self.partition()).await?;
            info!(row_key = %row_key, "Generated row key");

            let product = Product::from_draft(self.partition(), row_key, draft, image);
            match self.products.insert(product.clone()).await {
                Ok(()) => return Ok(product),
                Err(CatalogError::Conflict { row_key, .. }) if retries_left > 0 => {
                    retries_left -= 1;
                    warn!(%row_key, retries_left, "Generated row key taken, regenerating");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Applies `changes` to a stored product. Last writer wins.
    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        row_key: &str,
        changes: ProductChanges,
    ) -> Result<Product, CatalogError> {
        validate_changes(&changes)?;

        let mut product = self.get_by_id(row_key).await?;
        if changes.is_empty() {
            return Ok(product);
        }
        product.apply(changes);
        self.products.replace(product.clone()).await?;

        info!(stock_level = product.stock_level, "Product updated");
        Ok(product)
    }

    /// Removes a product. Its image stays in the blob store.
    #[instrument(skip(self))]
    pub async fn delete(&self, row_key: &str) -> Result<(), CatalogError> {
        self.products.remove(row_key).await?;
        info!("Product deleted");
        Ok(())
    }

    /// Upload step of the two-phase create.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn stage_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PendingUpload, CatalogError> {
        let upload = self.assets.stage(file_name, bytes).await.map_err(|e| {
            if e.is_backend() {
                error!(error = %e, "Blob store unavailable");
            }
            CatalogError::from(e)
        })?;
        info!(handle = %upload.handle, url = %upload.url, "Image staged");
        Ok(upload)
    }

    async fn resolve_image(&self, source: &ImageSource) -> Result<AssetRef, CatalogError> {
        self.assets.resolve_source(source).await.map_err(|e| {
            if e.is_backend() {
                error!(error = %e, "Blob store unavailable");
            } else {
                warn!(error = %e, "Image reference rejected");
            }
            CatalogError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MemoryBlobStore;
    use partition_actor::mock::MockClient;
    use partition_actor::{EntityKey, Page, PartitionActor, PartitionClient, StoreError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Counts ERROR events emitted while it is the default subscriber.
    #[derive(Clone, Default)]
    struct ErrorCounter(Arc<AtomicUsize>);

    impl ErrorCounter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl<S: Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn service_over(store: PartitionClient<Product>, key_retries: u32) -> CatalogService {
        let blobs = Arc::new(MemoryBlobStore::new("memory://images"));
        CatalogService::new(
            ProductClient::new(store.clone(), "Product"),
            KeyGenerator::new(store),
            AssetResolver::new(blobs, Duration::from_secs(60)),
            key_retries,
        )
    }

    fn running_service() -> CatalogService {
        let (actor, store) = PartitionActor::new(10);
        tokio::spawn(actor.run());
        service_over(store, 1)
    }

    fn empty_page() -> Page<Product> {
        Page {
            items: vec![],
            continuation: None,
        }
    }

    fn taken(row_key: &str) -> StoreError {
        StoreError::AlreadyExists(EntityKey::new("Product", row_key))
    }

    #[tokio::test]
    async fn collision_is_retried_with_a_fresh_key() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_scan().return_ok(empty_page());
        mock.expect_insert().return_err(taken("0"));
        mock.expect_scan().return_ok(empty_page());
        mock.expect_insert().return_ok(());
        let service = service_over(mock.client(), 1);

        let product = service
            .create(ProductDraft::new("Widget", 9.99, 10))
            .await
            .unwrap();

        assert_eq!(product.row_key, "1");
        let attempted: Vec<String> = mock.written().into_iter().map(|p| p.row_key).collect();
        assert_eq!(attempted, vec!["0", "1"]);
        mock.verify();
    }

    #[tokio::test]
    async fn second_collision_is_a_conflict() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_scan().return_ok(empty_page());
        mock.expect_insert().return_err(taken("0"));
        mock.expect_scan().return_ok(empty_page());
        mock.expect_insert().return_err(taken("1"));
        let service = service_over(mock.client(), 1);

        let result = service.create(ProductDraft::new("Widget", 9.99, 10)).await;

        assert_eq!(
            result,
            Err(CatalogError::Conflict {
                partition: "Product".to_string(),
                row_key: "1".to_string()
            })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn zero_retries_fails_on_first_collision() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_scan().return_ok(empty_page());
        mock.expect_insert().return_err(taken("0"));
        let service = service_over(mock.client(), 0);

        let result = service.create(ProductDraft::new("Widget", 1.0, 1)).await;
        assert!(matches!(result, Err(CatalogError::Conflict { .. })));
        mock.verify();
    }

    #[tokio::test]
    async fn supplied_key_collision_is_not_retried() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_insert().return_err(taken("sku-1"));
        let service = service_over(mock.client(), 3);

        let draft = ProductDraft::new("Widget", 1.0, 1).with_row_key("sku-1");
        let result = service.create(draft).await;

        assert!(matches!(
            result,
            Err(CatalogError::Conflict { ref row_key, .. }) if row_key == "sku-1"
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn invalid_draft_touches_nothing() {
        let mock = MockClient::<Product>::new();
        let service = service_over(mock.client(), 1);

        let result = service.create(ProductDraft::new("", -5.0, 1)).await;

        match result {
            Err(CatalogError::Validation(errors)) => {
                assert!(errors.contains("name"));
                assert!(errors.contains("price"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(mock.written().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn store_outage_is_unavailable() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_scan().return_err(StoreError::Closed);
        let service = service_over(mock.client(), 1);

        let result = service.create(ProductDraft::new("Widget", 1.0, 1)).await;
        assert!(matches!(result, Err(CatalogError::StoreUnavailable(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn store_outage_during_key_generation_is_logged() {
        let errors = ErrorCounter::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(errors.clone()));

        let mut mock = MockClient::<Product>::new();
        mock.expect_scan().return_err(StoreError::Closed);
        let service = service_over(mock.client(), 1);

        let result = service.create(ProductDraft::new("Widget", 1.0, 1)).await;

        assert!(matches!(result, Err(CatalogError::StoreUnavailable(_))));
        assert_eq!(errors.count(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn blank_row_key_gets_a_generated_one() {
        let service = running_service();
        let draft = ProductDraft::new("Widget", 9.99, 10).with_row_key("   ");

        let product = service.create(draft).await.unwrap();
        assert_eq!(product.row_key, "0");
    }

    #[tokio::test]
    async fn update_can_clear_the_description() {
        let service = running_service();
        let created = service
            .create(ProductDraft::new("Widget", 9.99, 10).with_description("Blue"))
            .await
            .unwrap();

        let changes = ProductChanges {
            description: Some(None),
            ..ProductChanges::default()
        };
        service.update(&created.row_key, changes).await.unwrap();

        let stored = service.get_by_id(&created.row_key).await.unwrap();
        assert!(stored.description.is_none());
        assert_eq!(stored.name, "Widget");
    }

    #[tokio::test]
    async fn record_vanishing_before_replace_is_not_found() {
        let draft = ProductDraft::new("Bolt", 0.25, 100);
        let stored = Product::from_draft("Product", "3", &draft, None);
        let mut mock = MockClient::<Product>::new();
        mock.expect_get().return_ok(Some(stored));
        mock.expect_replace()
            .return_err(StoreError::NotFound(EntityKey::new("Product", "3")));
        let service = service_over(mock.client(), 1);

        let changes = ProductChanges {
            price: Some(0.30),
            ..ProductChanges::default()
        };
        let result = service.update("3", changes).await;
        assert_eq!(result, Err(CatalogError::not_found("Product", "3")));
        mock.verify();
    }

    #[tokio::test]
    async fn empty_changes_skip_the_write() {
        let service = running_service();
        let created = service
            .create(ProductDraft::new("Widget", 9.99, 10))
            .await
            .unwrap();

        let unchanged = service
            .update(&created.row_key, ProductChanges::default())
            .await
            .unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn update_keeps_identity_and_trims_name() {
        let service = running_service();
        let created = service
            .create(ProductDraft::new("Widget", 9.99, 10).with_description("Blue"))
            .await
            .unwrap();

        let changes = ProductChanges {
            name: Some("  Widget Pro ".to_string()),
            ..ProductChanges::default()
        };
        let updated = service.update(&created.row_key, changes).await.unwrap();

        assert_eq!(updated.row_key, created.row_key);
        assert_eq!(updated.partition_key, "Product");
        assert_eq!(updated.name, "Widget Pro");
        assert_eq!(updated.description.as_deref(), Some("Blue"));
        assert_eq!(service.get_by_id(&created.row_key).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn invalid_update_is_rejected_before_lookup() {
        let mock = MockClient::<Product>::new();
        let service = service_over(mock.client(), 1);

        let changes = ProductChanges {
            price: Some(-1.0),
            ..ProductChanges::default()
        };
        let result = service.update("0", changes).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn staged_image_is_attached_and_released() {
        let service = running_service();
        let upload = service.stage_image("widget.png", vec![1, 2, 3]).await.unwrap();

        let draft =
            ProductDraft::new("Widget", 9.99, 10).with_image(ImageSource::Pending(upload.handle));
        let product = service.create(draft).await.unwrap();
        assert_eq!(product.image_ref.as_deref(), Some(upload.url.as_str()));

        let draft =
            ProductDraft::new("Copy", 1.0, 1).with_image(ImageSource::Pending(upload.handle));
        let reuse = service.create(draft).await;
        assert!(matches!(reuse, Err(CatalogError::Validation(ref e)) if e.contains("image_ref")));
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let service = running_service();
        let result = service.stage_image("widget.png", Vec::new()).await;
        assert!(matches!(result, Err(CatalogError::Validation(ref e)) if e.contains("image")));
    }
}
