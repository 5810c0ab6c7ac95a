use anyhow::{Context, Result};

use crate::model::LineItem;

// The field names `description` and `quantity` are a contract with the
// store. `Ok(None)` for an empty item sequence is the mandatory guard
// before persistence: an order with no lines is not a supported outcome.
pub(super) fn encode_document(items: &[LineItem]) -> Result<Option<String>> {
    if items.is_empty() {
        return Ok(None);
    }

    let document =
        serde_json::to_string_pretty(items).context("failed to encode order document")?;
    Ok(Some(document))
}

pub(super) fn decode_document(document: &str) -> Result<Vec<LineItem>> {
    serde_json::from_str(document).context("order document is not a valid line item array")
}
