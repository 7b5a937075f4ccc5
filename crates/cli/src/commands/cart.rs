//! Saved cart commands.
//!
//! These work on the stored value directly, so they are meant to be run
//! while the storefront is stopped. A running storefront keeps its cart in
//! memory and overwrites the file on its next change.

use std::io::Write;

use shopfront_cart::codec::StoredFormat;
use shopfront_cart::{CartError, CartPersistence, CheckoutSummary, StorageError};
use shopfront_core::format_money;
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The saved cart could not be read or decoded.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The saved cart could not be written or removed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Writing command output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(format: StoredFormat) -> String {
    match format {
        StoredFormat::Legacy => "legacy (unversioned)".to_string(),
        StoredFormat::Versioned(version) => format!("v{version}"),
    }
}

/// Print the saved cart.
///
/// # Errors
///
/// Returns an error if the saved cart cannot be read or decoded.
pub fn show(
    persistence: &CartPersistence,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CartCommandError> {
    let Some(decoded) = persistence.read()? else {
        writeln!(out, "No saved cart under key '{}'", persistence.key())?;
        return Ok(());
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&decoded.items)?)?;
        return Ok(());
    }

    let format = decoded.format;
    let saved_at = decoded.saved_at;
    let summary = CheckoutSummary::new(decoded.items);

    for item in &summary.items {
        writeln!(
            out,
            "{:>4} x {} ({}) @ {} = {}",
            item.quantity,
            item.name,
            item.id,
            item.price,
            format_money(item.line_total())
        )?;
    }
    writeln!(out, "Items: {}", summary.item_count)?;
    writeln!(out, "Total: {}", summary.formatted_total)?;
    writeln!(out, "Format: {}", describe(format))?;
    if let Some(saved_at) = saved_at {
        writeln!(out, "Saved: {}", saved_at.to_rfc3339())?;
    }
    if format.is_outdated() {
        writeln!(out, "Run `sf-cli cart migrate` to upgrade the saved format.")?;
    }
    Ok(())
}

/// Delete the saved cart.
///
/// # Errors
///
/// Returns an error if the stored value cannot be removed.
pub fn clear(persistence: &CartPersistence, out: &mut impl Write) -> Result<(), CartCommandError> {
    persistence.clear()?;
    tracing::info!(key = %persistence.key(), "Saved cart cleared");
    writeln!(out, "Cleared saved cart '{}'", persistence.key())?;
    Ok(())
}

/// Rewrite the saved cart in the current format.
///
/// Legacy values and values that needed repair on load are written back as
/// a current envelope. An undecodable value is left untouched.
///
/// # Errors
///
/// Returns an error if the saved cart cannot be decoded or rewritten.
pub fn migrate(
    persistence: &CartPersistence,
    out: &mut impl Write,
) -> Result<(), CartCommandError> {
    let Some(decoded) = persistence.read()? else {
        writeln!(out, "No saved cart under key '{}'", persistence.key())?;
        return Ok(());
    };

    if !decoded.format.is_outdated() && decoded.skipped == 0 && decoded.merged == 0 {
        writeln!(out, "Saved cart is already current")?;
        return Ok(());
    }

    persistence.try_save(&decoded.items)?;
    tracing::info!(
        key = %persistence.key(),
        from = %describe(decoded.format),
        lines = decoded.items.len(),
        "Saved cart migrated"
    );
    writeln!(
        out,
        "Migrated {} line(s) from {} (dropped {}, merged {})",
        decoded.items.len(),
        describe(decoded.format),
        decoded.skipped,
        decoded.merged
    )?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use shopfront_cart::FileStorage;
    use shopfront_cart::codec::CURRENT_VERSION;

    use super::*;

    const LEGACY: &str = r#"[
        {"id": 1, "name": "Shoe", "price": 49.99, "quantity": 2},
        {"id": 1, "name": "Shoe", "price": 49.99, "quantity": 1},
        {"name": "no id"}
    ]"#;

    fn persistence(dir: &std::path::Path) -> CartPersistence {
        CartPersistence::new(FileStorage::new(dir), "cart")
    }

    fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<(), CartCommandError>) -> String {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_show_missing_cart() {
        let dir = tempfile::tempdir().unwrap();
        let p = persistence(dir.path());
        let text = output(|out| show(&p, false, out));
        assert!(text.contains("No saved cart under key 'cart'"));
    }

    #[test]
    fn test_show_legacy_cart() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cart.json"), LEGACY).unwrap();
        let p = persistence(dir.path());

        let text = output(|out| show(&p, false, out));
        assert!(text.contains("3 x Shoe (1) @ $49.99 = $149.97"));
        assert!(text.contains("Items: 3"));
        assert!(text.contains("Total: $149.97"));
        assert!(text.contains("Format: legacy"));
        assert!(text.contains("sf-cli cart migrate"));
    }

    #[test]
    fn test_show_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cart.json"), LEGACY).unwrap();
        let p = persistence(dir.path());

        let text = output(|out| show(&p, true, out));
        let lines: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(lines[0]["quantity"], 3);
        assert_eq!(lines[0]["price"], "49.99");
    }

    #[test]
    fn test_migrate_rewrites_legacy_cart() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cart.json"), LEGACY).unwrap();
        let p = persistence(dir.path());

        let text = output(|out| migrate(&p, out));
        assert!(text.contains("Migrated 1 line(s) from legacy"));
        assert!(text.contains("dropped 1, merged 1"));

        let decoded = p.read().unwrap().unwrap();
        assert_eq!(decoded.format, StoredFormat::Versioned(CURRENT_VERSION));
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.items[0].quantity, 3);

        let again = output(|out| migrate(&p, out));
        assert!(again.contains("already current"));
    }

    #[test]
    fn test_migrate_leaves_corrupt_cart_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cart.json"), "{not json").unwrap();
        let p = persistence(dir.path());

        let err = migrate(&p, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CartCommandError::Cart(CartError::Corrupt(_))));
        assert_eq!(
            fs::read_to_string(dir.path().join("cart.json")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn test_clear_removes_saved_cart() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cart.json"), LEGACY).unwrap();
        let p = persistence(dir.path());

        let text = output(|out| clear(&p, out));
        assert!(text.contains("Cleared saved cart 'cart'"));
        assert!(p.read().unwrap().is_none());

        // Clearing twice is fine
        clear(&p, &mut Vec::new()).unwrap();
    }
}
