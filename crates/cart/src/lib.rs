//! RocketShoes cart - client-side shopping cart state.
//!
//! Holds the user's cart, validates quantity changes against a remote stock
//! service, and keeps the cart in durable local storage across sessions.
//!
//! # Architecture
//!
//! - [`CartManager`] is an explicit store injected into consumers
//! - [`catalog::Catalog`] is the remote stock/catalog seam ([`catalog::HttpCatalog`] in production)
//! - [`storage::CartStorage`] is the key-value persistence seam
//! - Operations return typed [`CartError`]s; [`notice`] maps them to user messages
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartManager, ProductId, SetQuantity};
//! use rocketshoes_cart::catalog::HttpCatalog;
//! use rocketshoes_cart::storage::FileStorage;
//!
//! let config = CartConfig::from_env()?;
//! let catalog = HttpCatalog::new(&config.api)?;
//! let storage = FileStorage::new(&config.storage_path);
//! let cart = CartManager::load(catalog, storage, config.storage_key);
//!
//! cart.add(ProductId::new(1)).await?;
//! cart.set_quantity(SetQuantity { product_id: ProductId::new(1), amount: 3 }).await?;
//! cart.remove(ProductId::new(1))?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod notice;
pub mod storage;

pub use config::{CartConfig, CatalogApiConfig, ConfigError, DEFAULT_STORAGE_KEY};
pub use error::CartError;
pub use manager::{CartManager, SetQuantity};
pub use notice::{CartOperation, Notice};
pub use rocketshoes_core::{Cart, Product, ProductId, Stock};
