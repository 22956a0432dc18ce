#[cfg(test)]
#[path = "menu_parser_test.rs"]
mod tests;

use std::collections::HashMap;

use anyhow::bail;
use anyhow::Result;
use serde_json::Value;

use super::strip_code_fence;
use crate::domain::models::MenuError;
use crate::domain::models::MenuItem;

fn value_to_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => return Some(text.to_string()),
        Some(Value::Number(number)) => return Some(number.to_string()),
        _ => return None,
    }
}

fn parse_entry(entry: &Value) -> Option<MenuItem> {
    match entry {
        Value::String(name) => return Some(MenuItem::new(name)),
        Value::Object(record) => {
            let name = record.get("name")?.as_str()?;
            let description = value_to_text(record.get("description"));
            let price = value_to_text(record.get("price"));

            return Some(MenuItem::with_details(
                name,
                description.as_deref(),
                price.as_deref(),
            ));
        }
        _ => return None,
    }
}

/// Turns the extractor's raw text response into menu items, in menu order.
/// Accepts an array of dish names, an array of `{name, description, price}`
/// records, or a mix of both, optionally wrapped in a markdown code fence.
pub fn parse_menu_items(raw: &str) -> Result<Vec<MenuItem>> {
    let json_str = strip_code_fence(raw);

    let parsed = match serde_json::from_str::<Value>(json_str) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!(error = ?err, text = raw, "Failed to parse menu response");
            bail!(MenuError::UnparseableMenu);
        }
    };

    let entries = match parsed.as_array() {
        Some(entries) => entries,
        None => {
            tracing::error!(text = raw, "Menu response is not an array");
            bail!(MenuError::UnparseableMenu);
        }
    };

    let items = entries
        .iter()
        .filter_map(|entry| {
            let item = parse_entry(entry);
            if item.is_none() {
                tracing::warn!(entry = %entry, "Skipping menu entry without a name");
            }

            return item;
        })
        .collect::<Vec<MenuItem>>();

    return Ok(items);
}

/// Enforces one item per dish name. Blank names are dropped. When a name
/// repeats, the later record wins but keeps the position of the first.
pub fn dedupe_items(items: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<MenuItem> = vec![];

    for mut item in items {
        item.name = item.name.trim().to_string();
        if item.name.is_empty() {
            continue;
        }

        if let Some(idx) = positions.get(&item.name) {
            tracing::debug!(name = item.name, "Duplicate dish name, keeping latest");
            deduped[*idx] = item;
            continue;
        }

        positions.insert(item.name.to_string(), deduped.len());
        deduped.push(item);
    }

    return deduped;
}
