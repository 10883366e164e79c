//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging for every process
//! that runs a store.
//!
//! ## What Gets Traced
//!
//! - **Store Lifecycle**: startup and shutdown with the final row count
//! - **Row Operations**: Get, Scan, Insert, Replace and Delete with the row key
//! - **Conflicts**: `Already exists` and `Not found` at `warn`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Full payloads for every insert and replace
//! RUST_LOG=debug cargo run
//!
//! # Only the store
//! RUST_LOG=partition_actor=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a create shows up as:
//!
//! ```text
//! INFO create_product: Generated row key partition="Product" row_key="0"
//! INFO create_product: Inserted entity_type="Product" key=Product/0 size=1
//! ```

/// Installs the global subscriber.
///
/// Filtering follows `RUST_LOG`; the module path is hidden because every store
/// event already carries `entity_type`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
