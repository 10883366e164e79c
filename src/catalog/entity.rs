//! Store mapping for [`Product`].
//!
//! A product lives in the catalog's partition under its row key; nothing else about
//! the record is visible to the store.

use partition_actor::PartitionedEntity;

use crate::model::Product;

impl PartitionedEntity for Product {
    fn partition_key(&self) -> &str {
        &self.partition_key
    }

    fn row_key(&self) -> &str {
        &self.row_key
    }
}
