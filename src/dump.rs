use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{PaymentListing, PaymentRecord};

/// Parse a JSON export of payment records.
/// Accepts the same shapes as the live listing: a bare array, or an object
/// with a `payments` or `data` array.
pub fn parse_payments_file(path: &Path) -> Result<Vec<PaymentRecord>> {
    tracing::info!("Parsing payments export: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payments export: {}", path.display()))?;

    let listing: PaymentListing =
        serde_json::from_str(&content).context("Failed to parse payments export JSON")?;

    let records = listing.into_records();
    tracing::info!("Parsed {} payment records", records.len());
    Ok(records)
}
