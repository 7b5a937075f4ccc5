//! Product identifiers.
//!
//! Catalog products are keyed either by a numeric database ID or by an opaque
//! string (a handle, SKU or GID). Both shapes appear in saved carts. A string
//! holding a canonical integer (`"42"`) names the same product as the number
//! `42`, so ids are brought to one form before they are compared.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A stable product identifier, used as the sole equality key for cart lines.
///
/// Serialized untagged: numeric IDs as JSON numbers, text IDs as JSON strings.
/// Derived equality compares variants, so `Numeric(7)` and `Text("7")` only
/// match after [`ProductId::canonical`]. [`ProductId::parse`] already returns
/// the canonical form; the cart canonicalizes everything else it is given.
///
/// ## Examples
///
/// ```
/// use shopfront_core::ProductId;
///
/// assert_eq!(ProductId::parse("42").unwrap(), ProductId::Numeric(42));
/// assert_eq!(ProductId::parse("p1").unwrap(), ProductId::from("p1"));
/// assert!(ProductId::parse("  ").is_err());
/// assert_eq!(ProductId::from("42").canonical(), ProductId::Numeric(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric catalog ID.
    Numeric(i64),
    /// Opaque string ID (handle, SKU, GID).
    Text(String),
}

impl ProductId {
    /// Maximum length of a text identifier.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `ProductId` from user input.
    ///
    /// Canonical integers (no sign, no leading zeros) become
    /// [`ProductId::Numeric`]; anything else is kept as trimmed text.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty after trimming or longer than
    /// [`ProductId::MAX_LENGTH`].
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ProductIdError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(ProductIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(canonical_number(s).map_or_else(|| Self::Text(s.to_owned()), Self::Numeric))
    }

    /// The canonical form of this id: text holding a canonical integer
    /// becomes [`ProductId::Numeric`], anything else is returned unchanged.
    #[must_use]
    pub fn canonical(self) -> Self {
        match self {
            Self::Text(s) => canonical_number(&s).map_or(Self::Text(s), Self::Numeric),
            numeric @ Self::Numeric(_) => numeric,
        }
    }
}

/// `s` as an `i64` if it is written the way an `i64` displays: digits only,
/// no sign, no leading zeros. Overflowing digit strings stay text.
fn canonical_number(s: &str) -> Option<i64> {
    let canonical_digits = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s == "0" || !s.starts_with('0'));
    if canonical_digits { s.parse().ok() } else { None }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(ProductId::parse("0").unwrap(), ProductId::Numeric(0));
        assert_eq!(ProductId::parse(" 123 ").unwrap(), ProductId::Numeric(123));
    }

    #[test]
    fn test_parse_keeps_non_canonical_digits_as_text() {
        assert_eq!(ProductId::parse("007").unwrap(), ProductId::from("007"));
        assert_eq!(ProductId::parse("-5").unwrap(), ProductId::from("-5"));
        assert_eq!(
            ProductId::parse("99999999999999999999").unwrap(),
            ProductId::from("99999999999999999999")
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_long() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(ProductIdError::Empty));
        let long = "x".repeat(ProductId::MAX_LENGTH + 1);
        assert!(matches!(
            ProductId::parse(&long),
            Err(ProductIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_numeric_and_text_are_distinct_until_canonical() {
        assert_ne!(ProductId::Numeric(7), ProductId::from("7"));
        assert_eq!(ProductId::from("7").canonical(), ProductId::Numeric(7));
    }

    #[test]
    fn test_canonical_keeps_other_text() {
        for text in ["p1", "007", "-5", " 42", "", "99999999999999999999"] {
            assert_eq!(ProductId::from(text).canonical(), ProductId::from(text));
        }
        assert_eq!(ProductId::Numeric(-3).canonical(), ProductId::Numeric(-3));
    }

    #[test]
    fn test_serde_untagged() {
        let numeric: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric, ProductId::Numeric(42));

        let text: ProductId = serde_json::from_str("\"p1\"").unwrap();
        assert_eq!(text, ProductId::from("p1"));

        assert_eq!(serde_json::to_string(&ProductId::Numeric(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ProductId::from("a")).unwrap(), "\"a\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::Numeric(9).to_string(), "9");
        assert_eq!(ProductId::from("shoe-1").to_string(), "shoe-1");
    }
}
