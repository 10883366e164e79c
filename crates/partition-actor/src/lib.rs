//! # Partition Actor
//!
//! A partitioned key-value store built on the **Actor Model**. Records are grouped by a
//! partition key and identified within it by a row key; one Tokio task owns every row
//! and serves requests from cloneable clients.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`PartitionedEntity`]) - what a record must tell the store about itself
//! 2. **Runtime Layer** ([`PartitionActor`]) - the task that owns the rows
//! 3. **Interface Layer** ([`PartitionClient`], [`StoreClient`]) - typed requests over channels
//!
//! ## Operations
//!
//! | Operation | Success | Failure |
//! |-----------|---------|---------|
//! | `get` | `Some(row)` / `None` | transport only |
//! | `scan_partition` | lazy [`PartitionScan`] | transport only |
//! | `insert` | `()` | [`StoreError::AlreadyExists`] |
//! | `replace` | `()` | [`StoreError::NotFound`] |
//! | `delete` | `()` | [`StoreError::NotFound`] |
//!
//! `replace` is a full overwrite with last-writer-wins semantics; there is no version
//! check. `insert` is atomic with respect to other writers and is the only
//! concurrency guard the store offers.
//!
//! ## Example
//!
//! ```rust
//! use partition_actor::{PartitionActor, PartitionedEntity, StoreError};
//!
//! #[derive(Clone, Debug)]
//! struct Note { shelf: String, id: String, text: String }
//!
//! impl PartitionedEntity for Note {
//!     fn partition_key(&self) -> &str { &self.shelf }
//!     fn row_key(&self) -> &str { &self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = PartitionActor::<Note>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     let note = Note { shelf: "desk".into(), id: "1".into(), text: "hello".into() };
//!     client.insert(note.clone()).await.unwrap();
//!
//!     // A second insert under the same key is refused.
//!     let again = client.insert(note).await;
//!     assert!(matches!(again, Err(StoreError::AlreadyExists(_))));
//!
//!     let rows = client.scan_partition("desk").collect().await.unwrap();
//!     assert_eq!(rows.len(), 1);
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module scripts store answers so callers can be tested against
//! conflicts and transport failures without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::PartitionActor;
pub use client::{PartitionClient, PartitionScan, DEFAULT_PAGE_SIZE};
pub use client_trait::StoreClient;
pub use entity::{EntityKey, PartitionedEntity};
pub use error::StoreError;
pub use message::{Page, Response, StoreRequest};
