//! Cart error types.

use std::path::PathBuf;

use shopfront_core::{Price, ProductId};
use thiserror::Error;

use crate::codec::CodecError;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage key cannot be used by this backend.
    #[error("Invalid storage key {0:?}")]
    InvalidKey(String),

    /// Encoding the cart failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced by cart operations.
///
/// Storage failures during a mutation are logged, not returned; the variant
/// exists for operations that ask for the outcome explicitly (the CLI).
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity rejected by [`QuantityPolicy::Reject`](crate::QuantityPolicy::Reject).
    #[error("Invalid quantity {quantity} for product {id}: must be between 1 and 1000000")]
    InvalidQuantity { id: ProductId, quantity: i64 },

    /// A line was added with a price below zero.
    #[error("Invalid price for product {0}: cannot be negative")]
    NegativePrice(ProductId),

    /// A line was added with a price above [`Price::MAX`].
    #[error("Invalid price for product {id}: cannot exceed {max}")]
    PriceTooLarge { id: ProductId, max: Price },

    /// The cart was accessed outside the scope that provides it.
    #[error("Cart store accessed outside its provider: {0}")]
    NotProvided(&'static str),

    /// The saved cart could not be decoded.
    #[error("Saved cart is corrupt: {0}")]
    Corrupt(#[from] CodecError),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
