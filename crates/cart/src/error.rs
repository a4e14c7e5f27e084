//! Cart operation errors.
//!
//! Every failing operation returns one of these and leaves both the
//! published cart and storage exactly as they were before the call.
//! Callers decide how to present a failure; see [`crate::notice`].

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Error returned by [`crate::CartManager`] operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds the remote stock level.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// Requested quantity is below one.
    #[error("Invalid amount {0}: must be at least 1")]
    InvalidAmount(i64),

    /// Stock or catalog lookup failed.
    #[error("Catalog error: {0}")]
    Transport(#[from] CatalogError),

    /// Persisting the new cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
