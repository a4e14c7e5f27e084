//! Core types for the RocketShoes cart.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, CartIntegrityError};
pub use id::*;
pub use product::{Product, Stock};
