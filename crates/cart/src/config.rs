//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_API_URL` - Base URL of the stock/catalog service (default: `http://localhost:3333`)
//! - `CART_STORAGE_PATH` - File backing the local key-value store (default: `.rocketshoes/storage.json`)
//! - `CART_STORAGE_KEY` - Storage key the cart is kept under (default: `@RocketShoes:cart`)
//! - `CART_HTTP_TIMEOUT_SECS` - Per-request transport timeout, at least 1 (default: 10)
//! - `CART_PRODUCT_CACHE_TTL_SECS` - Product detail cache lifetime, 0 disables the cache (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Storage key the cart is persisted under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Stock/catalog service configuration
    pub api: CatalogApiConfig,
    /// Path of the file backing the local key-value store
    pub storage_path: PathBuf,
    /// Key the cart is stored under
    pub storage_key: String,
}

/// Remote stock/catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogApiConfig {
    /// Base URL, without a trailing slash
    pub base_url: String,
    /// Transport timeout applied to every request
    pub timeout: Duration,
    /// How long product details stay cached (stock is never cached)
    pub product_cache_ttl: Duration,
}

impl Default for CatalogApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            product_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = parse_base_url(&get_or_default("CART_API_URL", DEFAULT_API_URL))?;
        let timeout = parse_secs(
            "CART_HTTP_TIMEOUT_SECS",
            &get_or_default("CART_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        )?;
        if timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_HTTP_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let product_cache_ttl = parse_secs(
            "CART_PRODUCT_CACHE_TTL_SECS",
            &get_or_default(
                "CART_PRODUCT_CACHE_TTL_SECS",
                DEFAULT_PRODUCT_CACHE_TTL_SECS,
            ),
        )?;

        let storage_path = PathBuf::from(get_or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH));
        let storage_key = get_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api: CatalogApiConfig {
                base_url,
                timeout,
                product_cache_ttl,
            },
            storage_path,
            storage_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate the service URL and strip any trailing slash.
fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("CART_API_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "CART_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Parse a whole number of seconds.
fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("defaults should load");

        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert_eq!(config.api.product_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(
            config.storage_path,
            PathBuf::from(".rocketshoes/storage.json")
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CART_API_URL", "https://api.example.com/v1/"),
            ("CART_HTTP_TIMEOUT_SECS", "3"),
            ("CART_PRODUCT_CACHE_TTL_SECS", "0"),
            ("CART_STORAGE_KEY", "@Test:cart"),
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
        ])
        .expect("overrides should load");

        assert_eq!(config.api.base_url, "https://api.example.com/v1");
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.api.product_cache_ttl, Duration::ZERO);
        assert_eq!(config.storage_key, "@Test:cart");
        assert_eq!(config.storage_path, PathBuf::from("/tmp/cart.json"));
    }

    #[test]
    fn test_invalid_url() {
        let err = config_from(&[("CART_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CART_API_URL"));

        let err = config_from(&[("CART_API_URL", "ftp://files.example.com")]).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = config_from(&[("CART_HTTP_TIMEOUT_SECS", "ten")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CART_HTTP_TIMEOUT_SECS")
        );

        let err = config_from(&[("CART_HTTP_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("must be at least 1"));
    }

    #[test]
    fn test_empty_storage_key() {
        assert!(config_from(&[("CART_STORAGE_KEY", "  ")]).is_err());
    }
}
