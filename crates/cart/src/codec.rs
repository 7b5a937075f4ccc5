//! Saved-cart wire format.
//!
//! # Format
//!
//! Current (version 1):
//!
//! ```json
//! {"version": 1, "savedAt": "2026-10-19T12:00:00Z", "items": [{"id": "p1", ...}]}
//! ```
//!
//! Legacy (version 0): a bare JSON array of items, prices as numbers.
//!
//! Decoding is defensive. Entries that fail to parse are skipped, ids are
//! canonicalized (`"42"` reads as `42`) and duplicates merged, and anything
//! that is not one of the two shapes is an error the caller recovers from by
//! starting empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopfront_core::CartItem;
use thiserror::Error;

use crate::reducer::{CartAction, Outcome, reduce};

/// Envelope version written by [`encode`].
pub const CURRENT_VERSION: u64 = 1;

/// Errors decoding a saved cart. Always recovered by the caller.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value is not JSON.
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The JSON is neither a legacy array nor a versioned envelope.
    #[error("Unexpected shape: {0}")]
    Shape(&'static str),

    /// The envelope was written by a newer release.
    #[error("Unsupported cart format version {0}")]
    UnsupportedVersion(u64),
}

/// Which shape a saved value had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredFormat {
    /// Bare array, no version tag.
    Legacy,
    /// Versioned envelope.
    Versioned(u64),
}

impl StoredFormat {
    /// Whether re-saving would change the shape on disk.
    #[must_use]
    pub const fn is_outdated(self) -> bool {
        match self {
            Self::Legacy => true,
            Self::Versioned(v) => v < CURRENT_VERSION,
        }
    }
}

/// Result of decoding a saved cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Recovered items, unique by id, in saved order.
    pub items: Vec<CartItem>,
    /// Shape the value was stored in.
    pub format: StoredFormat,
    /// When the envelope was written, if recorded.
    pub saved_at: Option<DateTime<Utc>>,
    /// Entries dropped because they did not parse.
    pub skipped: usize,
    /// Entries folded into an earlier line with the same id.
    pub merged: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    version: u64,
    saved_at: DateTime<Utc>,
    items: &'a [CartItem],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeHeader {
    version: u64,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// Serialize items in the current envelope.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(items: &[CartItem], saved_at: DateTime<Utc>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: CURRENT_VERSION,
        saved_at,
        items,
    })
}

/// Decode a saved value of either shape.
///
/// # Errors
///
/// Returns [`CodecError`] if the value is not JSON, has an unknown shape, or
/// carries a version newer than [`CURRENT_VERSION`].
pub fn decode(raw: &str) -> Result<Decoded, CodecError> {
    let value: Value = serde_json::from_str(raw)?;

    match value {
        Value::Array(entries) => Ok(decode_entries(entries, StoredFormat::Legacy, None)),
        Value::Object(mut map) => {
            let items = map.remove("items");
            let header: EnvelopeHeader = serde_json::from_value(Value::Object(map))
                .map_err(|_| CodecError::Shape("object without a numeric version"))?;

            if header.version > CURRENT_VERSION {
                return Err(CodecError::UnsupportedVersion(header.version));
            }

            match items {
                Some(Value::Array(entries)) => Ok(decode_entries(
                    entries,
                    StoredFormat::Versioned(header.version),
                    header.saved_at,
                )),
                Some(_) => Err(CodecError::Shape("items is not an array")),
                None => Err(CodecError::Shape("envelope without items")),
            }
        }
        _ => Err(CodecError::Shape("neither an array nor an envelope")),
    }
}

fn decode_entries(
    entries: Vec<Value>,
    format: StoredFormat,
    saved_at: Option<DateTime<Utc>>,
) -> Decoded {
    let mut items = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    let mut merged = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<CartItem>(entry) {
            Ok(mut item) => {
                item.id = item.id.canonical();
                if reduce(&mut items, CartAction::Add(item)) == Outcome::Merged {
                    merged += 1;
                }
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable saved cart entry");
                skipped += 1;
            }
        }
    }

    Decoded {
        items,
        format,
        saved_at,
        skipped,
        merged,
    }
}
