//! # Catalog KV
//!
//! A product catalog kept in a partitioned key-value store, with each product's
//! image held in a separate blob store.
//!
//! ## Module Tour
//!
//! ### 1. The Store ([`partition_actor`])
//! A generic actor that owns every row, keyed by partition and row key. It offers
//! point reads, paged partition scans, insert-if-absent, replace and delete.
//! Insert-if-absent is the only concurrency guard: updates are last-writer-wins.
//!
//! ### 2. The Catalog ([`catalog`], [`keygen`], [`asset`])
//! - [`KeyGenerator`](keygen::KeyGenerator) hands out the next integer row key.
//! - [`AssetResolver`](asset::AssetResolver) confirms an image exists before a
//!   record may point at it.
//! - [`CatalogService`](catalog::CatalogService) ties both to the store and
//!   enforces the field rules.
//!
//! ### 3. The Interface ([`clients`])
//! [`CatalogClient`](clients::CatalogClient) is what a presentation layer calls. It
//! speaks in [`ProductView`](model::ProductView)s.
//!
//! ### 4. The Runtime ([`lifecycle`], [`config`])
//! [`CatalogSystem`](lifecycle::CatalogSystem) spawns the store and wires everything
//! from a [`CatalogConfig`](config::CatalogConfig).
//!
//! ## Creating a Product with an Image
//!
//! ```rust
//! use catalog_kv::config::CatalogConfig;
//! use catalog_kv::lifecycle::CatalogSystem;
//! use catalog_kv::model::{ImageSource, ProductDraft};
//!
//! #[tokio::main]
//! async fn main() {
//!     let system = CatalogSystem::new(CatalogConfig::default());
//!
//!     let upload = system
//!         .catalog
//!         .upload_image("widget.png", vec![0x89, 0x50, 0x4e, 0x47])
//!         .await
//!         .unwrap();
//!     let draft = ProductDraft::new("Widget", 9.99, 10)
//!         .with_image(ImageSource::Pending(upload.handle));
//!
//!     let widget = system.catalog.create_product(draft).await.unwrap();
//!     assert_eq!(widget.id, "0");
//!     assert_eq!(widget.image_url, Some(upload.url));
//!
//!     system.shutdown().await.unwrap();
//! }
//! ```
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod asset;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod keygen;
pub mod lifecycle;
pub mod model;
