//! The cart store.
//!
//! Owns the line list exclusively. All mutations go through
//! [`CartStore::apply`], which validates against the configured
//! [`QuantityPolicy`](crate::QuantityPolicy), runs the reducer and then
//! writes the full list back to storage. Totals are derived on every read.

use rust_decimal::Decimal;
use shopfront_core::{CartItem, Price, ProductId, format_money};

use crate::checkout::{CheckoutSummary, PriceDrift};
use crate::error::{CartError, Result};
use crate::persistence::CartPersistence;
use crate::policy::CartSettings;
use crate::reducer::{CartAction, Outcome, reduce};

/// In-memory cart mirrored to durable storage.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartItem>,
    persistence: CartPersistence,
    settings: CartSettings,
}

impl CartStore {
    /// Build a store seeded from whatever `persistence` has saved.
    ///
    /// Unreadable saved data is logged and replaced by an empty cart.
    #[must_use]
    pub fn open(persistence: CartPersistence, settings: CartSettings) -> Self {
        let items = persistence.load();
        tracing::info!(
            key = persistence.key(),
            lines = items.len(),
            quantity_policy = %settings.quantity_policy,
            clear_on_checkout = settings.clear_on_checkout,
            "Cart store opened"
        );
        Self {
            items,
            persistence,
            settings,
        }
    }

    /// Store settings.
    #[must_use]
    pub const fn settings(&self) -> CartSettings {
        self.settings
    }

    /// Apply an action, then persist the full line list.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] when the quantity policy
    /// rejects the action, and [`CartError::NegativePrice`] or
    /// [`CartError::PriceTooLarge`] when an added line is priced outside
    /// `0..=Price::MAX`. Rejected actions change nothing and are not
    /// persisted. Storage failures are logged, not returned.
    ///
    /// Product ids are canonicalized first, so `"42"` and `42` address the
    /// same line.
    pub fn apply(&mut self, action: CartAction) -> Result<Outcome> {
        let action = self.validate(action)?;
        let name = action.name();
        let outcome = reduce(&mut self.items, action);

        tracing::debug!(
            action = name,
            outcome = ?outcome,
            lines = self.items.len(),
            "Cart updated"
        );
        self.persistence.save(&self.items);
        Ok(outcome)
    }

    fn validate(&self, action: CartAction) -> Result<CartAction> {
        let policy = self.settings.quantity_policy;
        match action {
            CartAction::Add(mut item) => {
                item.id = item.id.canonical();
                if item.price.is_negative() {
                    return Err(CartError::NegativePrice(item.id));
                }
                if item.price.is_too_large() {
                    return Err(CartError::PriceTooLarge {
                        id: item.id,
                        max: Price::MAX,
                    });
                }
                item.quantity = match self.get(&item.id) {
                    Some(line) => policy.resolve_added(&item.id, line.quantity, item.quantity)?,
                    None => policy.resolve(&item.id, item.quantity)?,
                };
                Ok(CartAction::Add(item))
            }
            CartAction::UpdateQuantity { id, quantity } => {
                let id = id.canonical();
                let quantity = policy.resolve(&id, quantity)?;
                Ok(CartAction::UpdateQuantity { id, quantity })
            }
            CartAction::Remove(id) => Ok(CartAction::Remove(id.canonical())),
            CartAction::Clear => Ok(CartAction::Clear),
        }
    }

    /// Add a line, merging into an existing line with the same id.
    ///
    /// # Errors
    ///
    /// See [`Self::apply`].
    pub fn add_to_cart(&mut self, item: CartItem) -> Result<Outcome> {
        self.apply(CartAction::Add(item))
    }

    /// Remove the line for `id`. Removing an absent id is a no-op.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Outcome {
        // Remove never fails validation
        self.apply(CartAction::Remove(id.clone()))
            .unwrap_or(Outcome::Unchanged)
    }

    /// Set the quantity of the line for `id`. An absent id is a no-op.
    ///
    /// # Errors
    ///
    /// See [`Self::apply`].
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<Outcome> {
        self.apply(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity,
        })
    }

    /// Drop every line.
    pub fn clear(&mut self) -> Outcome {
        self.apply(CartAction::Clear).unwrap_or(Outcome::Unchanged)
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        let id = id.clone().canonical();
        self.items.iter().find(|item| item.id == id)
    }

    /// `Σ price × quantity`, computed from the current lines.
    ///
    /// Saturates at the bounds of `Decimal` for carts loaded with amounts
    /// the store would not accept.
    #[must_use]
    pub fn total(&self) -> Decimal {
        CartItem::total_of(&self.items)
    }

    /// [`Self::total`] formatted for display (`$1,234.50`).
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_money(self.total())
    }

    /// Sum of quantities across lines, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        CartItem::count_of(&self.items)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines whose locked price differs from `current_price`.
    ///
    /// Reports only; the cart keeps the price captured at add time. Products
    /// the lookup does not know are skipped.
    pub fn price_drift(
        &self,
        mut current_price: impl FnMut(&ProductId) -> Option<Price>,
    ) -> Vec<PriceDrift> {
        self.items
            .iter()
            .filter_map(|item| {
                let current = current_price(&item.id)?;
                (current != item.price).then(|| PriceDrift {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    locked: item.price,
                    current,
                })
            })
            .collect()
    }

    /// Snapshot the cart for a payment request.
    ///
    /// When `clear_on_checkout` is set the cart is emptied (and persisted)
    /// after the summary is taken.
    pub fn checkout(&mut self) -> CheckoutSummary {
        let summary = CheckoutSummary::new(self.items.clone());
        if self.settings.clear_on_checkout {
            self.clear();
            tracing::info!(lines = summary.items.len(), "Cart cleared after checkout");
        }
        summary
    }
}
