//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `cart` - Cart state manager, catalog client, and storage backends
//! - `cli` - Command-line consumer of the cart store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, line items, stock lookups, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
