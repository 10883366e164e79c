//! # PartitionedEntity Trait
//!
//! The `PartitionedEntity` trait is the contract every record kept by a
//! [`PartitionActor`](crate::PartitionActor) must satisfy. A record names its own
//! partition and row key; the pair is its identity inside the store.
//!
//! # Architecture Note
//! The store never inspects the value fields of a record. It only needs the two
//! key components to place, find and replace it, so the trait stays small and the
//! actor loop is written *once* for every record type.

use std::fmt::{self, Debug, Display};

/// Identity of a record: the partition it lives in plus its row key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub partition: String,
    pub row: String,
}

impl EntityKey {
    pub fn new(partition: impl Into<String>, row: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            row: row.into(),
        }
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.partition, self.row)
    }
}

/// Trait that any record must implement to be stored by a `PartitionActor`.
///
/// # Identity
/// `partition_key` groups records for scans. `row_key` is unique within the
/// partition. Neither may change once the record is stored: `replace` locates the
/// existing row through these two values.
pub trait PartitionedEntity: Clone + Debug + Send + Sync + 'static {
    /// The partition this record belongs to.
    fn partition_key(&self) -> &str;

    /// The record's identifier within its partition.
    fn row_key(&self) -> &str;

    /// Convenience accessor combining both key components.
    fn key(&self) -> EntityKey {
        EntityKey::new(self.partition_key(), self.row_key())
    }
}
