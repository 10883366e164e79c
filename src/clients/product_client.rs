use async_trait::async_trait;
use partition_actor::{EntityKey, PartitionClient, StoreClient, StoreError};
use tracing::{debug, error, instrument};

use crate::catalog::CatalogError;
use crate::model::Product;

/// Store client bound to one catalog partition.
///
/// Every row key passed in is resolved against that partition, and store errors
/// come back as [`CatalogError`]s.
#[derive(Clone)]
pub struct ProductClient {
    inner: PartitionClient<Product>,
    partition: String,
}

impl ProductClient {
    pub fn new(inner: PartitionClient<Product>, partition: impl Into<String>) -> Self {
        Self {
            inner,
            partition: partition.into(),
        }
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn key(&self, row_key: &str) -> EntityKey {
        EntityKey::new(self.partition.as_str(), row_key)
    }

    /// Every product in the partition, ordered by row key.
    #[instrument(skip(self), fields(partition = %self.partition))]
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let rows = self
            .inner
            .scan_partition(self.partition.as_str())
            .collect()
            .await
            .map_err(Self::map_error)?;
        debug!(count = rows.len(), "Scanned partition");
        Ok(rows)
    }

    pub async fn find(&self, row_key: &str) -> Result<Option<Product>, CatalogError> {
        self.get(self.key(row_key)).await
    }

    /// Writes a new product. A taken key fails with [`CatalogError::Conflict`].
    #[instrument(skip(self, product), fields(row_key = %product.row_key))]
    pub async fn insert(&self, product: Product) -> Result<(), CatalogError> {
        self.inner.insert(product).await.map_err(Self::map_error)
    }

    /// Overwrites an existing product. A missing key fails with
    /// [`CatalogError::NotFound`].
    #[instrument(skip(self, product), fields(row_key = %product.row_key))]
    pub async fn replace(&self, product: Product) -> Result<(), CatalogError> {
        self.inner.replace(product).await.map_err(Self::map_error)
    }

    pub async fn remove(&self, row_key: &str) -> Result<(), CatalogError> {
        self.delete(self.key(row_key)).await
    }
}

#[async_trait]
impl StoreClient<Product> for ProductClient {
    type Error = CatalogError;

    fn inner(&self) -> &PartitionClient<Product> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        if e.is_transport() {
            error!(error = %e, "Product store unavailable");
        }
        CatalogError::from(e)
    }
}
