//! # Partition Store Actor
//!
//! This module defines the `PartitionActor`, the component that owns every stored
//! row and serves the requests sent by [`PartitionClient`]. It implements the
//! "Server" side of the Actor Model: one task, one map, requests handled in order.

use crate::client::PartitionClient;
use crate::entity::{EntityKey, PartitionedEntity};
use crate::error::StoreError;
use crate::message::{Page, StoreRequest};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns a partitioned key-value space.
///
/// # Architecture Note
/// This struct is the "Server" half of the store. It owns the rows and the
/// receiver end of the channel.
///
/// **Concurrency Model**:
/// Requests are processed *sequentially*, so the insert-if-absent check and the
/// insert itself can never interleave with another writer. That single property is
/// what makes `insert` usable as the only concurrency guard for key allocation.
/// No `Mutex` or `RwLock` guards the rows; the task owns them outright.
///
/// Rows are kept in `BTreeMap`s, so a partition scan walks row keys in byte order
/// and two scans with no writes in between see the same sequence.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `PartitionActor::new()` to get the `actor` and its `client`.
/// 2.  **Run**: Spawn `actor.run()` in a background task.
/// 3.  **Share**: Clone the client into every component that needs the store.
///
/// ```rust
/// use partition_actor::{PartitionActor, PartitionedEntity};
///
/// #[derive(Clone, Debug)]
/// struct Note { shelf: String, id: String, text: String }
///
/// impl PartitionedEntity for Note {
///     fn partition_key(&self) -> &str { &self.shelf }
///     fn row_key(&self) -> &str { &self.id }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = PartitionActor::<Note>::new(10);
///     tokio::spawn(actor.run());
///
///     let note = Note { shelf: "a".into(), id: "1".into(), text: "hello".into() };
///     client.insert(note.clone()).await.unwrap();
///     let found = client.get(note.key()).await.unwrap();
///     assert_eq!(found.unwrap().text, "hello");
/// }
/// ```
///
/// ## Operations
///
/// * **Get**: clone of the row if present, `None` otherwise.
/// * **Scan**: up to `limit` rows of one partition after the continuation key.
/// * **Insert**: fails with [`StoreError::AlreadyExists`] when the key is taken.
/// * **Replace**: fails with [`StoreError::NotFound`] when the key is absent.
/// * **Delete**: fails with [`StoreError::NotFound`] when the key is absent.
pub struct PartitionActor<T: PartitionedEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    partitions: BTreeMap<String, BTreeMap<String, T>>,
}

impl<T: PartitionedEntity> PartitionActor<T> {
    /// Creates a new `PartitionActor` and its associated `PartitionClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, PartitionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            partitions: BTreeMap::new(),
        };
        (actor, PartitionClient::new(sender))
    }

    /// Runs the actor's event loop, processing requests until every client is dropped.
    pub async fn run(mut self) {
        // Just the type name: "Product", not "catalog_kv::model::product::Product"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Get { key, respond_to } => {
                    let item = self
                        .partitions
                        .get(&key.partition)
                        .and_then(|rows| rows.get(&key.row))
                        .cloned();
                    debug!(entity_type, %key, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Scan {
                    partition,
                    after,
                    limit,
                    respond_to,
                } => {
                    let page = self.scan(&partition, after.as_deref(), limit.max(1));
                    debug!(
                        entity_type,
                        %partition,
                        rows = page.items.len(),
                        more = page.continuation.is_some(),
                        "Scan"
                    );
                    let _ = respond_to.send(Ok(page));
                }
                StoreRequest::Insert { entity, respond_to } => {
                    let key = entity.key();
                    debug!(entity_type, %key, ?entity, "Insert");
                    let rows = self.partitions.entry(key.partition.clone()).or_default();
                    let result = match rows.entry(key.row.clone()) {
                        Entry::Occupied(_) => {
                            warn!(entity_type, %key, "Already exists");
                            Err(StoreError::AlreadyExists(key))
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(entity);
                            info!(entity_type, %key, size = rows.len(), "Inserted");
                            Ok(())
                        }
                    };
                    let _ = respond_to.send(result);
                }
                StoreRequest::Replace { entity, respond_to } => {
                    let key = entity.key();
                    debug!(entity_type, %key, ?entity, "Replace");
                    let slot = self
                        .partitions
                        .get_mut(&key.partition)
                        .and_then(|rows| rows.get_mut(&key.row));
                    let result = match slot {
                        Some(existing) => {
                            *existing = entity;
                            info!(entity_type, %key, "Replaced");
                            Ok(())
                        }
                        None => {
                            warn!(entity_type, %key, "Not found");
                            Err(StoreError::NotFound(key))
                        }
                    };
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { key, respond_to } => {
                    debug!(entity_type, %key, "Delete");
                    let result = self.remove(&key);
                    match &result {
                        Ok(()) => info!(entity_type, %key, "Deleted"),
                        Err(_) => warn!(entity_type, %key, "Not found"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        let size: usize = self.partitions.values().map(BTreeMap::len).sum();
        info!(entity_type, partitions = self.partitions.len(), size, "Shutdown");
    }

    fn scan(&self, partition: &str, after: Option<&str>, limit: usize) -> Page<T> {
        let Some(rows) = self.partitions.get(partition) else {
            return Page {
                items: Vec::new(),
                continuation: None,
            };
        };

        let mut range = match after {
            Some(after) => rows.range::<str, _>((Bound::Excluded(after), Bound::Unbounded)),
            None => rows.range::<str, _>(..),
        };
        let items: Vec<T> = range
            .by_ref()
            .take(limit)
            .map(|(_, row)| row.clone())
            .collect();
        let continuation = if range.next().is_some() {
            items.last().map(|row| row.row_key().to_string())
        } else {
            None
        };
        Page {
            items,
            continuation,
        }
    }

    fn remove(&mut self, key: &EntityKey) -> Result<(), StoreError> {
        let rows = self
            .partitions
            .get_mut(&key.partition)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        rows.remove(&key.row)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        if rows.is_empty() {
            self.partitions.remove(&key.partition);
        }
        Ok(())
    }
}
