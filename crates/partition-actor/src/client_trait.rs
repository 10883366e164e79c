//! # StoreClient Trait
//!
//! Provides a common interface for domain-specific store clients, adding default
//! `get` and `delete` methods built on top of a generic `PartitionClient`.
use crate::{EntityKey, PartitionClient, PartitionedEntity, StoreError};
use async_trait::async_trait;

/// Trait for domain clients to inherit the standard keyed operations.
///
/// A domain client usually fixes the partition and owns a richer error type. It
/// only has to expose its inner client and say how store errors translate.
///
/// # Example
///
/// ```rust
/// use partition_actor::{PartitionClient, PartitionedEntity, StoreClient, StoreError};
///
/// #[derive(Clone, Debug)]
/// struct Note { shelf: String, id: String }
///
/// impl PartitionedEntity for Note {
///     fn partition_key(&self) -> &str { &self.shelf }
///     fn row_key(&self) -> &str { &self.id }
/// }
///
/// #[derive(Debug)]
/// struct NoteError(String);
///
/// struct NoteClient { inner: PartitionClient<Note> }
///
/// impl StoreClient<Note> for NoteClient {
///     type Error = NoteError;
///
///     fn inner(&self) -> &PartitionClient<Note> { &self.inner }
///
///     fn map_error(e: StoreError) -> Self::Error { NoteError(e.to_string()) }
/// }
/// ```
#[async_trait]
pub trait StoreClient<T: PartitionedEntity>: Send + Sync {
    /// The domain-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic client.
    fn inner(&self) -> &PartitionClient<T>;

    /// Map store errors to the domain error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch a row by key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, key: EntityKey) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(key).await.map_err(Self::map_error)
    }

    /// Delete a row by key.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: EntityKey) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(key).await.map_err(Self::map_error)
    }
}
