//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart_item;
pub mod id;
pub mod price;

pub use cart_item::CartItem;
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError, format_money, sum_amounts};
