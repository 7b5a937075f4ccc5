//! Consumer accessor.
//!
//! [`CartContext`] is the one shared handle to a [`CartStore`]. The owning
//! root builds it once and threads it down; consumers read snapshots and
//! mutate through a [`CartDispatch`]. Every dispatch handle from the same
//! context refers to the same store, so code that keys on handle identity
//! keeps working across requests.
//!
//! Each operation holds the store lock for one mutation and its persistence
//! write, so mutations never interleave.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{CartItem, Price, ProductId};

use crate::checkout::{CheckoutSummary, PriceDrift};
use crate::error::{CartError, Result};
use crate::reducer::Outcome;
use crate::store::CartStore;

/// Shared handle to the cart store.
#[derive(Debug, Clone)]
pub struct CartContext {
    store: Arc<Mutex<CartStore>>,
}

/// Read-only view of the cart at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub formatted_total: String,
    pub item_count: i64,
    pub line_count: usize,
}

impl CartSnapshot {
    /// Whether the cart had no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartContext {
    /// Wrap a store. Call once, at the root that owns the cart.
    #[must_use]
    pub fn new(store: CartStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Resolve the context provided to the current scope.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotProvided`] if nothing provided one. This is a
    /// wiring bug, not a user error.
    pub fn require(provided: Option<&Self>) -> Result<Self> {
        provided.cloned().ok_or(CartError::NotProvided(
            "no CartContext was provided to this scope",
        ))
    }

    fn lock(&self) -> MutexGuard<'_, CartStore> {
        lock(&self.store)
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let store = self.lock();
        CartSnapshot {
            items: store.items().to_vec(),
            total: store.total(),
            formatted_total: store.formatted_total(),
            item_count: store.item_count(),
            line_count: store.line_count(),
        }
    }

    /// Sum of quantities, for badges.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.lock().item_count()
    }

    /// Handle for mutating the cart.
    #[must_use]
    pub fn dispatch(&self) -> CartDispatch {
        CartDispatch {
            store: Arc::clone(&self.store),
        }
    }
}

/// Mutation handle for a [`CartContext`].
///
/// Cheap to clone. Two handles compare equal when they drive the same
/// store.
#[derive(Debug, Clone)]
pub struct CartDispatch {
    store: Arc<Mutex<CartStore>>,
}

impl PartialEq for CartDispatch {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl Eq for CartDispatch {}

impl CartDispatch {
    fn lock(&self) -> MutexGuard<'_, CartStore> {
        lock(&self.store)
    }

    /// See [`CartStore::add_to_cart`].
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity policy or price check rejects the
    /// line.
    pub fn add_to_cart(&self, item: CartItem) -> Result<Outcome> {
        self.lock().add_to_cart(item)
    }

    /// See [`CartStore::remove_from_cart`].
    pub fn remove_from_cart(&self, id: &ProductId) -> Outcome {
        self.lock().remove_from_cart(id)
    }

    /// See [`CartStore::update_quantity`].
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity policy rejects the value.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> Result<Outcome> {
        self.lock().update_quantity(id, quantity)
    }

    /// See [`CartStore::checkout`].
    pub fn checkout(&self) -> CheckoutSummary {
        self.lock().checkout()
    }

    /// See [`CartStore::price_drift`].
    pub fn price_drift(
        &self,
        current_price: impl FnMut(&ProductId) -> Option<Price>,
    ) -> Vec<PriceDrift> {
        self.lock().price_drift(current_price)
    }
}

fn lock(store: &Mutex<CartStore>) -> MutexGuard<'_, CartStore> {
    // A panic mid-mutation leaves the reducer's last complete state, which is
    // still a valid cart.
    store.lock().unwrap_or_else(PoisonError::into_inner)
}
