//! Typed handles over the catalog.
//!
//! [`ProductClient`] binds the generic store client to the catalog partition;
//! [`CatalogClient`] is what the presentation layer talks to.

pub mod catalog_client;
pub mod product_client;

pub use catalog_client::*;
pub use product_client::*;
