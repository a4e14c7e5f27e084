//! CLI command implementations.

pub mod cart;

use rocketshoes_cart::catalog::{CatalogError, HttpCatalog};
use rocketshoes_cart::storage::FileStorage;
use rocketshoes_cart::{CartConfig, CartError, CartManager, ConfigError, Notice};
use thiserror::Error;
use tracing::debug;

/// The cart store as wired up by the CLI.
pub type CliCart = CartManager<HttpCatalog, FileStorage>;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build catalog client: {0}")]
    Catalog(#[from] CatalogError),

    /// A cart operation failed; `notice` is what a user should see.
    #[error("{notice} ({source})")]
    Cart { notice: Notice, source: CartError },

    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Build the cart store from environment configuration.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the HTTP client cannot
/// be built.
pub fn open_cart() -> Result<CliCart, CommandError> {
    let config = CartConfig::from_env()?;
    debug!(
        api = %config.api.base_url,
        storage = %config.storage_path.display(),
        "Opening cart"
    );

    let catalog = HttpCatalog::new(&config.api)?;
    let storage = FileStorage::new(&config.storage_path);
    Ok(CartManager::load(catalog, storage, config.storage_key))
}
