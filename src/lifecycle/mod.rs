//! Startup and shutdown of the catalog runtime.

pub mod catalog_system;

pub use catalog_system::CatalogSystem;
