//! Error types for catalog operations.

use std::fmt::{self, Display};

use partition_actor::StoreError;
use thiserror::Error;

use crate::asset::AssetError;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every field that failed validation, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// True when `field` is among the failures.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// `Ok(())` if nothing failed, otherwise a [`CatalogError::Validation`].
    pub fn into_result(self) -> Result<(), CatalogError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self))
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The request carried invalid fields. The caller may correct and resubmit.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// No product is stored under the key.
    #[error("product not found: {partition}/{row_key}")]
    NotFound { partition: String, row_key: String },

    /// The key is already taken.
    #[error("product already exists: {partition}/{row_key}")]
    Conflict { partition: String, row_key: String },

    /// Every numeric row key of the partition has been issued.
    #[error("no numeric row keys left in partition {partition}")]
    KeyspaceExhausted { partition: String },

    /// The record store or the blob store could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CatalogError {
    /// A validation failure on a single field.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push(field, reason);
        CatalogError::Validation(errors)
    }

    pub fn not_found(partition: impl Into<String>, row_key: impl Into<String>) -> Self {
        CatalogError::NotFound {
            partition: partition.into(),
            row_key: row_key.into(),
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => CatalogError::NotFound {
                partition: key.partition,
                row_key: key.row,
            },
            StoreError::AlreadyExists(key) => CatalogError::Conflict {
                partition: key.partition,
                row_key: key.row,
            },
            StoreError::Closed | StoreError::Dropped => {
                CatalogError::StoreUnavailable(e.to_string())
            }
        }
    }
}

impl From<AssetError> for CatalogError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::Backend(_) => CatalogError::StoreUnavailable(e.to_string()),
            AssetError::EmptyFileName | AssetError::EmptyPayload => {
                CatalogError::invalid("image", e.to_string())
            }
            AssetError::Unresolvable(_)
            | AssetError::UnknownHandle(_)
            | AssetError::ExpiredHandle(_) => CatalogError::invalid("image_ref", e.to_string()),
        }
    }
}
