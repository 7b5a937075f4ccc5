//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, sum_amounts};

/// One product line in a cart.
///
/// The wire shape is `{id, name, price, quantity, imageUrl}`. `price` is the
/// unit price captured when the product was first added; it is never
/// re-fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identity; the only key used for merge, update and remove.
    pub id: ProductId,
    /// Display label.
    pub name: String,
    /// Unit price at time of add.
    pub price: Price,
    /// Number of units.
    pub quantity: i64,
    /// Display-only image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartItem {
    /// Create a line item without an image.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        quantity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            image_url: None,
        }
    }

    /// Attach a display image.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    /// `Σ price × quantity` over `items`, saturating instead of overflowing.
    #[must_use]
    pub fn total_of(items: &[Self]) -> Decimal {
        sum_amounts(items.iter().map(Self::line_total))
    }

    /// Sum of quantities over `items`, saturating instead of overflowing.
    #[must_use]
    pub fn count_of(items: &[Self]) -> i64 {
        items
            .iter()
            .fold(0_i64, |count, item| count.saturating_add(item.quantity))
    }
}
