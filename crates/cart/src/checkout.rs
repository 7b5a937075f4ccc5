//! Checkout hand-off.
//!
//! The payment flow only needs the lines and their total. Whether the cart
//! is emptied afterwards is decided by [`CartSettings::clear_on_checkout`](crate::CartSettings).

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{CartItem, Price, ProductId, format_money};

/// Lines and total captured for a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub formatted_total: String,
    pub item_count: i64,
}

impl CheckoutSummary {
    /// Summarize `items`.
    #[must_use]
    pub fn new(items: Vec<CartItem>) -> Self {
        let total = CartItem::total_of(&items);
        let item_count = CartItem::count_of(&items);
        Self {
            formatted_total: format_money(total),
            items,
            total,
            item_count,
        }
    }

    /// Whether there is anything to pay for.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A line whose locked price no longer matches the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDrift {
    pub id: ProductId,
    pub name: String,
    /// Price captured when the line was added.
    pub locked: Price,
    /// Price the catalog reports now.
    pub current: Price,
}
