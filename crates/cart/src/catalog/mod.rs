//! Remote stock and catalog service.
//!
//! # Architecture
//!
//! - [`Catalog`] is the seam the cart manager depends on; tests inject a fake
//! - [`HttpCatalog`] talks to the real service with `reqwest`
//! - Stock is always fetched live; product details are cached via `moka`
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` → `{ "id": 1, "amount": 5 }`
//! - `GET /products/{id}` → full product record
//!
//! Every call is attempted exactly once. Transport errors, non-success
//! statuses, and undecodable bodies all surface as [`CatalogError`].

mod http;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use http::HttpCatalog;

/// Errors that can occur when talking to the stock/catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Source of live stock levels and product details.
pub trait Catalog: Send + Sync {
    /// Look up the current stock level for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send;

    /// Fetch the full catalog record for a product.
    ///
    /// The returned product's `amount` is whatever the service sent (usually
    /// absent, so 0); callers set their own quantity.
    fn product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, CatalogError>> + Send;
}
