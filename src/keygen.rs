//! # Row Key Generation
//!
//! New products get the next integer after the largest numeric row key in their
//! partition. Keys that are not plain decimal digits are ignored, so a partition
//! holding `"0"`, `"1"`, `"legacy-sku"` and `"2"` yields `"3"`.
//!
//! The store is the only authority across processes: two generators over the same
//! partition can compute the same key, and the store's insert-if-absent decides
//! which create wins. Within one process the generator also remembers the highest
//! key it has issued per partition and never goes below it. Concurrent creates in
//! one process therefore get distinct keys, and a deleted highest key is not handed
//! out again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use partition_actor::{PartitionClient, PartitionedEntity};
use tracing::{debug, error, instrument};

use crate::catalog::CatalogError;

/// Parses a row key made solely of ASCII digits. Anything else, including keys too
/// long for `u64`, is non-numeric.
pub fn numeric_key(key: &str) -> Option<u64> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Next key after the largest numeric key in `keys`, or `0` if there is none.
///
/// Returns `None` when the largest key is `u64::MAX`.
pub fn successor_of<I, S>(keys: I) -> Option<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match highest_numeric(keys) {
        None => Some(0),
        Some(max) => max.checked_add(1),
    }
}

fn highest_numeric<I, S>(keys: I) -> Option<u64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter_map(|key| numeric_key(key.as_ref()))
        .max()
}

/// Computes fresh row keys by scanning a partition.
#[derive(Clone)]
pub struct KeyGenerator<T: PartitionedEntity> {
    store: PartitionClient<T>,
    issued: Arc<Mutex<HashMap<String, u64>>>,
}

impl<T: PartitionedEntity> KeyGenerator<T> {
    pub fn new(store: PartitionClient<T>) -> Self {
        Self {
            store,
            issued: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns a row key not present in `partition` at scan time and not issued
    /// before by this generator.
    ///
    /// # Errors
    ///
    /// [`CatalogError::KeyspaceExhausted`] once `u64::MAX` has been reached;
    /// [`CatalogError::StoreUnavailable`] when the scan fails.
    #[instrument(skip(self))]
    pub async fn next_row_key(&self, partition: &str) -> Result<String, CatalogError> {
        let mut scan = self.store.scan_partition(partition);
        let mut highest: Option<u64> = None;
        while let Some(rows) = scan.next_page().await.map_err(|e| {
            if e.is_transport() {
                error!(error = %e, "Product store unavailable during key generation");
            }
            CatalogError::from(e)
        })? {
            highest = highest.max(highest_numeric(rows.iter().map(|row| row.row_key())));
        }

        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let floor = highest.max(issued.get(partition).copied());
        let next = match floor {
            None => 0,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| CatalogError::KeyspaceExhausted {
                    partition: partition.to_string(),
                })?,
        };
        issued.insert(partition.to_string(), next);
        debug!(stored_max = ?highest, next, "Computed row key");

        Ok(next.to_string())
    }

    /// The highest key issued for `partition` in this process, if any.
    #[cfg(test)]
    fn last_issued(&self, partition: &str) -> Option<u64> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(partition)
            .copied()
    }
}
