//! Persistence adapter: a durable mirror of the cart's line list.
//!
//! `load` runs once when a store is built and never fails; corrupt or
//! missing data yields an empty cart. `save` runs after every mutation,
//! rewrites the whole list and logs (rather than returns) failures so the
//! in-memory change always stands.

use chrono::Utc;
use shopfront_core::CartItem;

use crate::codec::{self, Decoded};
use crate::error::{CartError, StorageError};
use crate::storage::CartStorage;

/// Default storage key for the cart.
pub const DEFAULT_STORAGE_KEY: &str = "shopfront_cart";

/// Storage backend bound to a single cart key.
pub struct CartPersistence {
    storage: Box<dyn CartStorage>,
    key: String,
}

impl std::fmt::Debug for CartPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartPersistence {
    /// Bind `storage` to `key`.
    pub fn new(storage: impl CartStorage + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read and decode the saved cart, reporting every failure.
    ///
    /// `Ok(None)` means nothing is saved under the key.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend cannot be read and
    /// [`CartError::Corrupt`] if the saved value cannot be decoded.
    pub fn read(&self) -> Result<Option<Decoded>, CartError> {
        let Some(raw) = self.storage.load(&self.key)? else {
            return Ok(None);
        };

        let decoded = codec::decode(&raw)?;
        if decoded.skipped > 0 || decoded.merged > 0 {
            tracing::warn!(
                key = %self.key,
                skipped = decoded.skipped,
                merged = decoded.merged,
                "Saved cart repaired while loading"
            );
        }
        Ok(Some(decoded))
    }

    /// Load the saved items, falling back to an empty list on any failure.
    #[must_use]
    pub fn load(&self) -> Vec<CartItem> {
        match self.read() {
            Ok(Some(decoded)) => {
                tracing::debug!(
                    key = %self.key,
                    lines = decoded.items.len(),
                    "Loaded saved cart"
                );
                decoded.items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Saved cart is unreadable, starting empty"
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the saved cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or writing fails.
    pub fn try_save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let raw = codec::encode(items, Utc::now())?;
        self.storage.save(&self.key, &raw)
    }

    /// Overwrite the saved cart with `items`, logging failures.
    pub fn save(&self, items: &[CartItem]) {
        if let Err(e) = self.try_save(items) {
            tracing::error!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }

    /// Delete the saved cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}
