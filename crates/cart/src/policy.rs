//! Cart policies: how bad quantities are handled and whether checkout
//! empties the cart.

use core::fmt;
use core::str::FromStr;

use shopfront_core::ProductId;

use crate::error::CartError;

/// What to do with a quantity outside `1..=1_000_000` on add or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantityPolicy {
    /// Refuse the mutation with [`CartError::InvalidQuantity`].
    #[default]
    Reject,
    /// Raise the quantity to 1 or lower it to the maximum.
    Clamp,
    /// Store the value as given.
    PassThrough,
}

impl QuantityPolicy {
    /// Smallest quantity the `Reject` and `Clamp` policies allow.
    pub const MIN_QUANTITY: i64 = 1;

    /// Largest quantity the `Reject` and `Clamp` policies allow on one line.
    pub const MAX_QUANTITY: i64 = 1_000_000;

    /// Resolve the quantity to store for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] under [`QuantityPolicy::Reject`]
    /// when `quantity` is outside [`Self::MIN_QUANTITY`]..=[`Self::MAX_QUANTITY`].
    pub fn resolve(self, id: &ProductId, quantity: i64) -> Result<i64, CartError> {
        if (Self::MIN_QUANTITY..=Self::MAX_QUANTITY).contains(&quantity) {
            return Ok(quantity);
        }
        match self {
            Self::Reject => Err(CartError::InvalidQuantity {
                id: id.clone(),
                quantity,
            }),
            Self::Clamp => {
                let clamped = quantity.clamp(Self::MIN_QUANTITY, Self::MAX_QUANTITY);
                tracing::debug!(product_id = %id, quantity, clamped, "Clamping cart quantity");
                Ok(clamped)
            }
            Self::PassThrough => Ok(quantity),
        }
    }

    /// Resolve the quantity to add to a line for `id` that already holds
    /// `existing` units.
    ///
    /// `added` is resolved on its own first; the merged line must then stay
    /// within [`Self::MAX_QUANTITY`] unless the policy is `PassThrough`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] under [`QuantityPolicy::Reject`]
    /// when `added` is out of range or the merged line would be.
    pub fn resolve_added(
        self,
        id: &ProductId,
        existing: i64,
        added: i64,
    ) -> Result<i64, CartError> {
        let added = self.resolve(id, added)?;
        let merged = existing.saturating_add(added);
        if merged <= Self::MAX_QUANTITY || self == Self::PassThrough {
            return Ok(added);
        }
        if self == Self::Reject {
            return Err(CartError::InvalidQuantity {
                id: id.clone(),
                quantity: merged,
            });
        }
        tracing::debug!(product_id = %id, existing, added, "Clamping merged cart quantity");
        Ok(Self::MAX_QUANTITY.saturating_sub(existing))
    }

    /// Settings with this policy and default checkout behaviour.
    #[must_use]
    pub fn into_settings(self) -> CartSettings {
        CartSettings {
            quantity_policy: self,
            ..CartSettings::default()
        }
    }

    /// Config string for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Clamp => "clamp",
            Self::PassThrough => "pass-through",
        }
    }
}

impl fmt::Display for QuantityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            "pass-through" | "pass_through" | "passthrough" => Ok(Self::PassThrough),
            other => Err(format!(
                "unknown quantity policy '{other}' (expected reject, clamp or pass-through)"
            )),
        }
    }
}

/// Behavioural settings for a cart store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSettings {
    /// Handling of out-of-range quantities.
    pub quantity_policy: QuantityPolicy,
    /// Empty the cart after a checkout summary is taken.
    pub clear_on_checkout: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_quantity_passes_every_policy() {
        let id = ProductId::from("p1");
        for policy in [
            QuantityPolicy::Reject,
            QuantityPolicy::Clamp,
            QuantityPolicy::PassThrough,
        ] {
            assert_eq!(policy.resolve(&id, 3).unwrap(), 3);
        }
    }

    #[test]
    fn test_reject() {
        let id = ProductId::from("p1");
        let err = QuantityPolicy::Reject.resolve(&id, 0).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity { quantity: 0, .. }));
        assert!(QuantityPolicy::Reject.resolve(&id, -2).is_err());
    }

    #[test]
    fn test_clamp() {
        let id = ProductId::from("p1");
        assert_eq!(QuantityPolicy::Clamp.resolve(&id, 0).unwrap(), 1);
        assert_eq!(QuantityPolicy::Clamp.resolve(&id, -10).unwrap(), 1);
    }

    #[test]
    fn test_pass_through() {
        let id = ProductId::from("p1");
        assert_eq!(QuantityPolicy::PassThrough.resolve(&id, -1).unwrap(), -1);
        assert_eq!(
            QuantityPolicy::PassThrough.resolve(&id, i64::MAX).unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_upper_bound() {
        let id = ProductId::from("p1");
        let max = QuantityPolicy::MAX_QUANTITY;
        assert_eq!(QuantityPolicy::Reject.resolve(&id, max).unwrap(), max);
        assert!(matches!(
            QuantityPolicy::Reject.resolve(&id, i64::MAX),
            Err(CartError::InvalidQuantity { quantity: i64::MAX, .. })
        ));
        assert_eq!(QuantityPolicy::Clamp.resolve(&id, max + 1).unwrap(), max);
        assert_eq!(QuantityPolicy::Clamp.resolve(&id, i64::MAX).unwrap(), max);
    }

    #[test]
    fn test_resolve_added_checks_merged_line() {
        let id = ProductId::from("p1");
        let max = QuantityPolicy::MAX_QUANTITY;

        assert_eq!(QuantityPolicy::Reject.resolve_added(&id, 3, 2).unwrap(), 2);
        assert!(matches!(
            QuantityPolicy::Reject.resolve_added(&id, max, 1),
            Err(CartError::InvalidQuantity { quantity, .. }) if quantity == max + 1
        ));
        assert!(QuantityPolicy::Reject.resolve_added(&id, 3, 0).is_err());

        assert_eq!(QuantityPolicy::Clamp.resolve_added(&id, max - 2, 5).unwrap(), 2);
        assert_eq!(QuantityPolicy::Clamp.resolve_added(&id, max, 5).unwrap(), 0);

        assert_eq!(
            QuantityPolicy::PassThrough.resolve_added(&id, i64::MAX, 1).unwrap(),
            1
        );
    }

    #[test]
    fn test_parse_round_trips_display() {
        for policy in [
            QuantityPolicy::Reject,
            QuantityPolicy::Clamp,
            QuantityPolicy::PassThrough,
        ] {
            assert_eq!(policy.to_string().parse::<QuantityPolicy>().unwrap(), policy);
        }
        assert_eq!(
            " PASS_THROUGH ".parse::<QuantityPolicy>().unwrap(),
            QuantityPolicy::PassThrough
        );
        assert!("lenient".parse::<QuantityPolicy>().is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = CartSettings::default();
        assert_eq!(settings.quantity_policy, QuantityPolicy::Reject);
        assert!(!settings.clear_on_checkout);
    }
}
