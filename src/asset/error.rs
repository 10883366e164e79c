//! Error types for blob storage and asset resolution.

use thiserror::Error;

use super::AssetHandle;

/// Errors raised while uploading or resolving an image asset.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetError {
    /// The upload named no file.
    #[error("file name must not be empty")]
    EmptyFileName,

    /// The upload carried no bytes.
    #[error("upload must not be empty")]
    EmptyPayload,

    /// The reference does not point at a stored blob.
    #[error("asset not found: {0}")]
    Unresolvable(String),

    /// The handle was never issued by this resolver, or was already released.
    #[error("unknown upload handle: {0}")]
    UnknownHandle(AssetHandle),

    /// The handle outlived its time to live.
    #[error("upload handle expired: {0}")]
    ExpiredHandle(AssetHandle),

    /// The blob store itself failed.
    #[error("blob store unavailable: {0}")]
    Backend(String),
}

impl AssetError {
    /// True when the failure came from the blob store rather than the reference.
    pub fn is_backend(&self) -> bool {
        matches!(self, AssetError::Backend(_))
    }
}
