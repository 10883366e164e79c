//! # Asset Reference Resolver
//!
//! Decides whether an image reference may be written into a product record.
//!
//! Uploads are two-phase. [`AssetResolver::stage`] stores the bytes and hands back a
//! short-lived [`AssetHandle`]; a later create names that handle and the resolver
//! turns it into a checked [`AssetRef`]. Resolving does not consume the handle, so a
//! create that fails for an unrelated reason can be resubmitted. The catalog calls
//! [`AssetResolver::release`] once the record is stored.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::{AssetError, BlobStore};
use crate::model::ImageSource;

/// Identifier of a staged upload, displayed as `upload_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(u64);

impl Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload_{}", self.0)
    }
}

/// Result of the upload step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub handle: AssetHandle,
    pub url: String,
}

/// A reference confirmed to exist in the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    url: String,
}

impl AssetRef {
    pub fn url(&self) -> &str {
        &self.url
    }
}

struct Staged {
    url: String,
    expires_at: Instant,
}

/// Validates image references against a [`BlobStore`] and tracks staged uploads.
///
/// Cloning is cheap; clones share the pending-upload table.
#[derive(Clone)]
pub struct AssetResolver {
    store: Arc<dyn BlobStore>,
    ttl: Duration,
    next_handle: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<AssetHandle, Staged>>>,
}

impl AssetResolver {
    pub fn new(store: Arc<dyn BlobStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            next_handle: Arc::new(AtomicU64::new(1)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Uploads `bytes` and registers a pending handle for them.
    ///
    /// # Errors
    ///
    /// [`AssetError::EmptyFileName`] or [`AssetError::EmptyPayload`] for a bad
    /// upload, [`AssetError::Backend`] when the blob store fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn stage(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<PendingUpload, AssetError> {
        if file_name.trim().is_empty() {
            return Err(AssetError::EmptyFileName);
        }
        if bytes.is_empty() {
            return Err(AssetError::EmptyPayload);
        }

        let url = self.store.put(file_name, bytes).await?;
        let handle = AssetHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));

        let mut pending = self.pending();
        prune_expired(&mut pending, Instant::now());
        pending.insert(
            handle,
            Staged {
                url: url.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        debug!(%handle, %url, "Staged upload");

        Ok(PendingUpload { handle, url })
    }

    /// Checks that `url` names a stored blob.
    ///
    /// # Errors
    ///
    /// [`AssetError::Unresolvable`] for an empty or unknown reference,
    /// [`AssetError::Backend`] when the blob store fails.
    pub async fn resolve(&self, url: &str) -> Result<AssetRef, AssetError> {
        if url.trim().is_empty() {
            return Err(AssetError::Unresolvable(url.to_string()));
        }
        if self.store.exists(url).await? {
            Ok(AssetRef {
                url: url.to_string(),
            })
        } else {
            Err(AssetError::Unresolvable(url.to_string()))
        }
    }

    /// Resolves a staged upload without consuming its handle.
    pub async fn resolve_handle(&self, handle: &AssetHandle) -> Result<AssetRef, AssetError> {
        let url = {
            let mut pending = self.pending();
            let now = Instant::now();
            let staged = pending.remove(handle);
            prune_expired(&mut pending, now);
            match staged {
                Some(staged) if staged.expires_at > now => {
                    let url = staged.url.clone();
                    pending.insert(*handle, staged);
                    url
                }
                Some(_) => {
                    warn!(%handle, "Upload handle expired");
                    return Err(AssetError::ExpiredHandle(*handle));
                }
                None => return Err(AssetError::UnknownHandle(*handle)),
            }
        };
        self.resolve(&url).await
    }

    /// Resolves whichever kind of image source a draft carries.
    pub async fn resolve_source(&self, source: &ImageSource) -> Result<AssetRef, AssetError> {
        match source {
            ImageSource::Pending(handle) => self.resolve_handle(handle).await,
            ImageSource::Url(url) => self.resolve(url).await,
        }
    }

    /// Forgets a handle once its record is stored. Returns whether it was pending.
    pub fn release(&self, handle: &AssetHandle) -> bool {
        let released = self.pending().remove(handle).is_some();
        if released {
            debug!(%handle, "Released upload handle");
        }
        released
    }

    /// Number of handles still tracked, expired ones included until the next prune.
    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<AssetHandle, Staged>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn prune_expired(pending: &mut HashMap<AssetHandle, Staged>, now: Instant) {
    pending.retain(|_, staged| staged.expires_at > now);
}
