//! Image assets: the blob store they live in and the resolver that decides
//! whether a product may point at one.

pub mod blob;
pub mod error;
pub mod resolver;

pub use blob::{BlobStore, MemoryBlobStore};
pub use error::AssetError;
pub use resolver::{AssetHandle, AssetRef, AssetResolver, PendingUpload};
