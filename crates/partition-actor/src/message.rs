//! # Store Messages
//!
//! This module defines the request type exchanged between the `PartitionClient`
//! and the `PartitionActor`.

use crate::entity::{EntityKey, PartitionedEntity};
use crate::error::StoreError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// One page of a partition scan.
///
/// `continuation` holds the last row key of the page when more rows may follow;
/// `None` means the scan is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub continuation: Option<String>,
}

/// Request sent to the actor.
///
/// # Operations
/// - **Get**: point lookup by `(partition, row)`.
/// - **Scan**: one page of a partition, resuming strictly after `after`.
/// - **Insert**: store a record only if its key is absent.
/// - **Replace**: overwrite an existing record, last writer wins.
/// - **Delete**: physical removal.
#[derive(Debug)]
pub enum StoreRequest<T: PartitionedEntity> {
    Get {
        key: EntityKey,
        respond_to: Response<Option<T>>,
    },
    Scan {
        partition: String,
        after: Option<String>,
        limit: usize,
        respond_to: Response<Page<T>>,
    },
    Insert {
        entity: T,
        respond_to: Response<()>,
    },
    Replace {
        entity: T,
        respond_to: Response<()>,
    },
    Delete {
        key: EntityKey,
        respond_to: Response<()>,
    },
}
