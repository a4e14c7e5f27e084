//! Cart state manager.
//!
//! [`CartManager`] is the store consumers are handed. It owns the current
//! cart snapshot, validates quantity changes against live stock, persists
//! every successful mutation, and publishes the new snapshot to subscribers.
//!
//! # Mutation protocol
//!
//! 1. Validate and query the catalog (no state touched yet)
//! 2. Build the new `Cart` from the snapshot taken at the start of the call
//! 3. Write it to storage under the cart key
//! 4. Publish it
//!
//! A failure at any step returns before step 4, so the published cart and the
//! stored cart never diverge. Concurrent operations are not serialized: the
//! last one to commit wins.

use std::num::NonZeroU32;
use std::sync::Arc;

use rocketshoes_core::{Cart, CartIntegrityError, ProductId, Stock};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::error::{CartError, Result};
use crate::storage::{CartStorage, StorageError};

/// Request to set a product's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetQuantity {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Shared cart store.
///
/// Cheaply cloneable via `Arc`; all clones observe and mutate the same cart.
pub struct CartManager<C, S> {
    inner: Arc<CartManagerInner<C, S>>,
}

struct CartManagerInner<C, S> {
    catalog: C,
    storage: S,
    storage_key: String,
    state: watch::Sender<Arc<Cart>>,
}

impl<C, S> Clone for CartManager<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Catalog, S: CartStorage> CartManager<C, S> {
    /// Create the store, loading the cart saved under `storage_key`.
    ///
    /// A missing, unreadable, or invalid stored value yields an empty cart.
    pub fn load(catalog: C, storage: S, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let cart = load_cart(&storage, &storage_key);
        info!(
            storage_key = %storage_key,
            products = cart.len(),
            "Cart loaded"
        );

        let (state, _) = watch::channel(Arc::new(cart));

        Self {
            inner: Arc::new(CartManagerInner {
                catalog,
                storage,
                storage_key,
                state,
            }),
        }
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.state.borrow())
    }

    /// Receive every snapshot published after this call.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.state.subscribe()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart().total_quantity()
    }

    /// The catalog this store validates against.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.inner.catalog
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart has its amount bumped by one. A new
    /// product is fetched from the catalog and appended with an amount of 1.
    ///
    /// # Errors
    ///
    /// - `OutOfStock` if the new amount would exceed live stock
    /// - `Transport` if the stock or catalog lookup fails
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add(&self, product_id: ProductId) -> Result<Arc<Cart>> {
        let cart = self.cart();
        let requested = u64::from(cart.amount_of(product_id)) + 1;

        let stock = self.inner.catalog.stock(product_id).await?;
        let amount = checked_amount(product_id, requested, &stock)?;

        let updated = if cart.contains(product_id) {
            cart.with_amount(product_id, amount)
        } else {
            let product = self.inner.catalog.product(product_id).await?;
            if product.id != product_id {
                return Err(CatalogError::Parse(format!(
                    "requested product {product_id}, catalog returned {}",
                    product.id
                ))
                .into());
            }
            cart.with_appended(product.with_amount(amount.get()))
                .map_err(integrity_error)?
        };

        let committed = self.commit(updated)?;
        info!(amount = amount.get(), "Product added to cart");
        Ok(committed)
    }

    /// Remove a product from the cart entirely.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the product is not in the cart
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove(&self, product_id: ProductId) -> Result<Arc<Cart>> {
        let Some(updated) = self.cart().without(product_id) else {
            warn!("Remove requested for product not in cart");
            return Err(CartError::NotFound(product_id));
        };

        let committed = self.commit(updated)?;
        info!("Product removed from cart");
        Ok(committed)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// If the product is not in the cart the contents are unchanged, but the
    /// cart is still persisted and republished.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount < 1` (no network call is made)
    /// - `OutOfStock` if `amount` exceeds live stock
    /// - `Transport` if the stock lookup fails
    /// - `Storage` if the new cart cannot be persisted
    #[instrument(skip_all, fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn set_quantity(&self, request: SetQuantity) -> Result<Arc<Cart>> {
        let SetQuantity { product_id, amount } = request;

        let requested = match u64::try_from(amount) {
            Ok(requested) if requested >= 1 => requested,
            _ => {
                warn!("Rejected quantity below one");
                return Err(CartError::InvalidAmount(amount));
            }
        };

        let cart = self.cart();
        let stock = self.inner.catalog.stock(product_id).await?;
        let amount = checked_amount(product_id, requested, &stock)?;

        if !cart.contains(product_id) {
            debug!("Quantity set for product not in cart; contents unchanged");
        }

        let committed = self.commit(cart.with_amount(product_id, amount))?;
        info!(amount = amount.get(), "Product quantity updated");
        Ok(committed)
    }

    /// Persist `cart`, then publish it.
    fn commit(&self, cart: Cart) -> Result<Arc<Cart>> {
        let serialized = serde_json::to_string(&cart).map_err(StorageError::from)?;
        self.inner
            .storage
            .set_item(&self.inner.storage_key, &serialized)?;

        let cart = Arc::new(cart);
        self.inner.state.send_replace(Arc::clone(&cart));
        Ok(cart)
    }
}

/// Validate `requested` against live stock.
fn checked_amount(product_id: ProductId, requested: u64, stock: &Stock) -> Result<NonZeroU32> {
    let out_of_stock = || {
        warn!(
            requested,
            available = stock.amount,
            "Requested quantity exceeds stock"
        );
        CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        }
    };

    if !stock.covers(requested) {
        return Err(out_of_stock());
    }

    u32::try_from(requested)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(out_of_stock)
}

fn integrity_error(error: CartIntegrityError) -> CartError {
    CartError::Transport(CatalogError::Parse(error.to_string()))
}

/// Read the stored cart, falling back to an empty one.
fn load_cart<S: CartStorage>(storage: &S, key: &str) -> Cart {
    match storage.get_item(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Stored cart is invalid, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            Cart::new()
        }
    }
}
