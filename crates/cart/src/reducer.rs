//! Pure cart reducer.
//!
//! `reduce` is the only code that changes a cart's line list. It knows
//! nothing about storage or policy; the store validates an action first and
//! persists after.

use shopfront_core::{CartItem, ProductId};

/// A cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add a line, merging quantity into an existing line with the same id.
    Add(CartItem),
    /// Remove the line with this id, if any.
    Remove(ProductId),
    /// Replace the quantity of the line with this id, if any.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Drop every line.
    Clear,
}

impl CartAction {
    /// Short name for log fields.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Clear => "clear",
        }
    }
}

/// What a reduce step did to the line list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new line was appended.
    Inserted,
    /// An existing line's quantity changed.
    Merged,
    /// A line was dropped (or, for `Clear`, all lines).
    Removed,
    /// Nothing matched; the list is untouched.
    Unchanged,
}

impl Outcome {
    /// Whether the list differs from before.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Apply one action to a line list.
///
/// - `Add` with a known id sums quantities and keeps the first line's name,
///   price and image; an unknown id is appended.
/// - `Remove` and `UpdateQuantity` with an unknown id are no-ops.
pub fn reduce(items: &mut Vec<CartItem>, action: CartAction) -> Outcome {
    match action {
        CartAction::Add(item) => {
            if let Some(existing) = items.iter_mut().find(|line| line.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                Outcome::Merged
            } else {
                items.push(item);
                Outcome::Inserted
            }
        }
        CartAction::Remove(id) => {
            let before = items.len();
            items.retain(|line| line.id != id);
            if items.len() == before {
                Outcome::Unchanged
            } else {
                Outcome::Removed
            }
        }
        CartAction::UpdateQuantity { id, quantity } => {
            match items.iter_mut().find(|line| line.id == id) {
                Some(line) if line.quantity != quantity => {
                    line.quantity = quantity;
                    Outcome::Merged
                }
                _ => Outcome::Unchanged,
            }
        }
        CartAction::Clear => {
            if items.is_empty() {
                Outcome::Unchanged
            } else {
                items.clear();
                Outcome::Removed
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use shopfront_core::Price;

    use super::*;

    fn shoe(quantity: i64) -> CartItem {
        CartItem::new("p1", "Shoe", Price::from_cents(4999), quantity).with_image("/x.jpg")
    }

    #[test]
    fn test_add_appends_new_line() {
        let mut items = Vec::new();
        assert_eq!(reduce(&mut items, CartAction::Add(shoe(1))), Outcome::Inserted);
        assert_eq!(items, vec![shoe(1)]);
    }

    #[test]
    fn test_add_merges_quantity_first_write_wins() {
        let mut items = vec![shoe(1)];
        let mut again = shoe(2);
        again.name = "Renamed".to_string();
        again.price = Price::from_cents(1);
        again.image_url = None;

        assert_eq!(reduce(&mut items, CartAction::Add(again)), Outcome::Merged);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].name, "Shoe");
        assert_eq!(items[0].price, Price::from_cents(4999));
        assert_eq!(items[0].image_url.as_deref(), Some("/x.jpg"));
    }

    #[test]
    fn test_add_sequence_sums_all_quantities() {
        let mut items = Vec::new();
        for q in [1, 4, 2, 7] {
            reduce(&mut items, CartAction::Add(shoe(q)));
        }
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 14);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut items = Vec::new();
        reduce(&mut items, CartAction::Add(shoe(1)));
        reduce(
            &mut items,
            CartAction::Add(CartItem::new(2_i64, "Hat", Price::from_cents(1000), 1)),
        );
        reduce(&mut items, CartAction::Add(shoe(1)));
        let ids: Vec<_> = items.iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids, ["p1", "2"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut items = vec![shoe(1)];
        assert_eq!(
            reduce(&mut items, CartAction::Remove("p1".into())),
            Outcome::Removed
        );
        let after_first = items.clone();
        assert_eq!(
            reduce(&mut items, CartAction::Remove("p1".into())),
            Outcome::Unchanged
        );
        assert_eq!(items, after_first);
        assert!(items.is_empty());
    }

    #[test]
    fn test_update_quantity_touches_only_quantity() {
        let mut items = vec![shoe(1)];
        let outcome = reduce(
            &mut items,
            CartAction::UpdateQuantity {
                id: "p1".into(),
                quantity: 5,
            },
        );
        assert_eq!(outcome, Outcome::Merged);
        assert_eq!(items, vec![shoe(5)]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut items = vec![shoe(1)];
        let outcome = reduce(
            &mut items,
            CartAction::UpdateQuantity {
                id: "missing".into(),
                quantity: 5,
            },
        );
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(items, vec![shoe(1)]);
    }

    #[test]
    fn test_clear() {
        let mut items = vec![shoe(1)];
        assert_eq!(reduce(&mut items, CartAction::Clear), Outcome::Removed);
        assert_eq!(reduce(&mut items, CartAction::Clear), Outcome::Unchanged);
    }
}
