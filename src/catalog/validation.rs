//! Input checks shared by create, update and configuration loading.
//!
//! Failures are collected rather than returned on the first one, so a caller sees
//! every bad field at once.

use crate::catalog::error::{CatalogError, ValidationErrors};
use crate::model::{ProductChanges, ProductDraft};

const FORBIDDEN_KEY_CHARS: [char; 4] = ['/', '\\', '#', '?'];

/// Describes why `key` cannot be used as a partition or row key, if it cannot.
pub fn key_violation(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("must not be empty".to_string());
    }
    if let Some(c) = key.chars().find(|c| FORBIDDEN_KEY_CHARS.contains(c)) {
        return Some(format!("must not contain '{c}'"));
    }
    if key.chars().any(char::is_control) {
        return Some("must not contain control characters".to_string());
    }
    None
}

/// Checks a create payload before a key is assigned or an image resolved.
pub fn validate_draft(draft: &ProductDraft) -> Result<(), CatalogError> {
    let mut errors = ValidationErrors::new();
    if let Some(row_key) = draft.requested_row_key() {
        if let Some(reason) = key_violation(row_key) {
            errors.push("row_key", reason);
        }
    }
    check_name(&mut errors, &draft.name);
    check_price(&mut errors, draft.price);
    errors.into_result()
}

/// Checks the fields an update actually supplies.
pub fn validate_changes(changes: &ProductChanges) -> Result<(), CatalogError> {
    let mut errors = ValidationErrors::new();
    if let Some(name) = &changes.name {
        check_name(&mut errors, name);
    }
    if let Some(price) = changes.price {
        check_price(&mut errors, price);
    }
    errors.into_result()
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    if name.trim().is_empty() {
        errors.push("name", "must not be empty");
    }
}

fn check_price(errors: &mut ValidationErrors, price: f64) {
    if !price.is_finite() {
        errors.push("price", "must be a finite number");
    } else if price < 0.0 {
        errors.push("price", "must not be negative");
    }
}
