//! Runtime configuration for the catalog.
//!
//! Every setting has a default and may be overridden from the process environment.
//! Values are validated when loaded so a bad deployment fails at startup instead of
//! on the first request.

use std::time::Duration;

use thiserror::Error;

use crate::catalog::validation::key_violation;

const ENV_PARTITION: &str = "CATALOG_PARTITION";
const ENV_KEY_RETRIES: &str = "CATALOG_KEY_RETRIES";
const ENV_STORE_BUFFER: &str = "CATALOG_STORE_BUFFER";
const ENV_SCAN_PAGE_SIZE: &str = "CATALOG_SCAN_PAGE_SIZE";
const ENV_UPLOAD_TTL_SECS: &str = "CATALOG_UPLOAD_TTL_SECS";
const ENV_BLOB_BASE_URL: &str = "CATALOG_BLOB_BASE_URL";

const DEFAULT_PARTITION: &str = "Product";
const DEFAULT_KEY_RETRIES: u32 = 1;
const DEFAULT_STORE_BUFFER: usize = 32;
const DEFAULT_SCAN_PAGE_SIZE: usize = 100;
const DEFAULT_UPLOAD_TTL_SECS: u64 = 900;
const DEFAULT_BLOB_BASE_URL: &str = "memory://product-images";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings shared by every catalog component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Partition holding every product of this catalog.
    pub partition: String,
    /// How many times a generated row key is regenerated after an insert collision.
    pub key_retries: u32,
    /// Capacity of the store actor's request channel.
    pub store_buffer: usize,
    /// Rows fetched per round trip when scanning the partition.
    pub scan_page_size: usize,
    /// Lifetime of a pending upload handle.
    pub upload_ttl: Duration,
    /// Prefix of URLs minted by the in-memory blob store.
    pub blob_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            partition: DEFAULT_PARTITION.to_string(),
            key_retries: DEFAULT_KEY_RETRIES,
            store_buffer: DEFAULT_STORE_BUFFER,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            upload_ttl: Duration::from_secs(DEFAULT_UPLOAD_TTL_SECS),
            blob_base_url: DEFAULT_BLOB_BASE_URL.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set to a value that
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration with a custom lookup, so tests need not touch the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value fails validation.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let partition = get_env(ENV_PARTITION).unwrap_or_else(|| DEFAULT_PARTITION.to_string());
        if let Some(reason) = key_violation(&partition) {
            return Err(ConfigError::Invalid {
                key: ENV_PARTITION,
                reason,
            });
        }

        let blob_base_url =
            get_env(ENV_BLOB_BASE_URL).unwrap_or_else(|| DEFAULT_BLOB_BASE_URL.to_string());
        let blob_base_url = blob_base_url.trim_end_matches('/').to_string();
        if blob_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                key: ENV_BLOB_BASE_URL,
                reason: "must not be empty".to_string(),
            });
        }

        let key_retries = parse_env(&get_env, ENV_KEY_RETRIES, DEFAULT_KEY_RETRIES, 0)?;
        let store_buffer = parse_env(&get_env, ENV_STORE_BUFFER, DEFAULT_STORE_BUFFER, 1)?;
        let scan_page_size = parse_env(&get_env, ENV_SCAN_PAGE_SIZE, DEFAULT_SCAN_PAGE_SIZE, 1)?;
        let upload_ttl_secs = parse_env(&get_env, ENV_UPLOAD_TTL_SECS, DEFAULT_UPLOAD_TTL_SECS, 1)?;

        Ok(Self {
            partition,
            key_retries,
            store_buffer,
            scan_page_size,
            upload_ttl: Duration::from_secs(upload_ttl_secs),
            blob_base_url,
        })
    }
}

fn parse_env<F, N>(get_env: &F, key: &'static str, default: N, min: N) -> Result<N, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    N: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let Some(raw) = get_env(key) else {
        return Ok(default);
    };

    let parsed = raw.trim().parse::<N>().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("expected an integer, got '{raw}'"),
    })?;
    if parsed < min {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be at least {min}, got {parsed}"),
        });
    }
    Ok(parsed)
}
