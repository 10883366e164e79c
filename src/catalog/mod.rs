//! # Catalog
//!
//! The product catalog on top of the partitioned store.
//!
//! - [`service`]: the [`CatalogService`] orchestrating keys, images and records
//! - [`validation`]: field rules shared by create, update and configuration
//! - [`error`]: [`CatalogError`] and the per-field validation report
//! - [`entity`]: how a [`Product`](crate::model::Product) is keyed in the store

pub mod entity;
pub mod error;
pub mod service;
pub mod validation;

pub use error::{CatalogError, FieldError, ValidationErrors};
pub use service::CatalogService;
