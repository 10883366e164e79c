//! # Blob Store
//!
//! The [`BlobStore`] trait is the seam between the catalog and wherever image bytes
//! actually live. [`MemoryBlobStore`] keeps them in process and is what the demo
//! binary and the tests run against.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::AssetError;

/// Storage for binary assets, addressed by the URL returned from `put`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` and returns the URL they can be fetched from.
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, AssetError>;

    /// Fetches the bytes stored under `url`.
    async fn get(&self, url: &str) -> Result<Vec<u8>, AssetError>;

    /// Reports whether `url` names a stored blob.
    async fn exists(&self, url: &str) -> Result<bool, AssetError>;
}

/// In-memory [`BlobStore`].
///
/// URLs have the form `<base_url>/<n>-<name>` where `n` increases with every
/// upload, so two uploads of the same file name never overwrite each other.
pub struct MemoryBlobStore {
    base_url: String,
    next_id: AtomicU64,
    available: AtomicBool,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
            available: AtomicBool::new(true),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulates an outage: while unavailable every call fails with
    /// [`AssetError::Backend`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AssetError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AssetError::Backend(format!("{} is offline", self.base_url)))
        }
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // The map is only touched by insert and lookup, which cannot leave it torn.
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<String, AssetError> {
        self.check_available()?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("{}/{}-{}", self.base_url, id, name);
        debug!(%url, size = bytes.len(), "Stored blob");
        self.blobs().insert(url.clone(), bytes);
        Ok(url)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.check_available()?;
        self.blobs()
            .get(url)
            .cloned()
            .ok_or_else(|| AssetError::Unresolvable(url.to_string()))
    }

    async fn exists(&self, url: &str) -> Result<bool, AssetError> {
        self.check_available()?;
        Ok(self.blobs().contains_key(url))
    }
}
