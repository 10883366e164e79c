//! # Store Errors
//!
//! Every failure a store operation can report. Callers branch on the variant:
//! `NotFound` and `AlreadyExists` describe the data, `Closed` and `Dropped`
//! describe the transport to the actor.

use crate::entity::EntityKey;

/// Errors that can occur within the partitioned store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store actor closed")]
    Closed,
    #[error("Store actor dropped response channel")]
    Dropped,
    #[error("Row not found: {0}")]
    NotFound(EntityKey),
    #[error("Row already exists: {0}")]
    AlreadyExists(EntityKey),
}

impl StoreError {
    /// True when the failure came from the channel rather than the data.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Closed | StoreError::Dropped)
    }
}
