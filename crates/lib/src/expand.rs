//! # Virtual Row Expansion
//!
//! The core of the crate: turning one invoice row whose line items are
//! packed into parallel array fields into N independent virtual rows, one
//! per purchased product or service, with per-item totals recomputed from
//! the parsed unit price and quantity.
//!
//! Expansion is deterministic: rows are processed in their original order
//! and items within a row appear in ascending `ITEM_INDEX` order.

use crate::constants::{
    ITEMS_DESCRIPTION, ITEMS_QUANTITY, ITEMS_UNIT_PRICE, ITEM_ARRAY_COLUMNS, ITEM_COLUMNS,
};
use crate::parse::{parse_numeric_field, parse_text_field};
use crate::types::{ExpandedResultSet, ItemRecord, QueryResult};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Expands one raw invoice row into its virtual line items.
///
/// The item count is the maximum of the three parsed array lengths;
/// positions missing from a shorter sibling array default to an empty
/// description or zero price/quantity. The function is pure and total: it
/// never fails for malformed input, and an empty result means the row
/// carried no parseable item data (the caller decides the fallback).
pub fn expand_row(row: &HashMap<String, Value>) -> Vec<ItemRecord> {
    let null = Value::Null;
    let descriptions = parse_text_field(row.get(ITEMS_DESCRIPTION).unwrap_or(&null));
    let prices = parse_numeric_field(row.get(ITEMS_UNIT_PRICE).unwrap_or(&null));
    let quantities = parse_numeric_field(row.get(ITEMS_QUANTITY).unwrap_or(&null));

    let max_items = descriptions.len().max(prices.len()).max(quantities.len());
    if max_items == 0 {
        return Vec::new();
    }

    let invoice_fields = invoice_fields_of(row);

    (0..max_items)
        .map(|i| {
            let unit_price = prices.get(i).copied().unwrap_or(0.0);
            let quantity = quantities.get(i).copied().unwrap_or(0.0);
            ItemRecord {
                item_index: i + 1,
                description: descriptions.get(i).cloned().unwrap_or_default(),
                unit_price,
                quantity,
                line_total: unit_price * quantity,
                invoice_fields: invoice_fields.clone(),
            }
        })
        .collect()
}

/// Applies `expand_row` across an entire result set and rebuilds the
/// column list.
///
/// The input passes through unchanged (`items_expanded == false`) when the
/// query failed, the data is empty, no packed item column is present
/// (which also makes expansion idempotent), or no row yields any item
/// content. Rows that parse to zero items but still carry some raw item
/// text are preserved as a single placeholder record rather than dropped.
pub fn expand_result_set(result: &QueryResult) -> ExpandedResultSet {
    if !result.success || result.data.is_empty() || !result.has_item_columns() {
        return passthrough(result);
    }

    let kept_columns: Vec<String> = result
        .columns
        .iter()
        .filter(|column| !ITEM_ARRAY_COLUMNS.contains(&column.as_str()))
        .cloned()
        .collect();
    let mut columns = kept_columns.clone();
    columns.extend(ITEM_COLUMNS.iter().map(|c| c.to_string()));

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for raw in &result.data {
        let row: HashMap<String, Value> = result
            .columns
            .iter()
            .cloned()
            .zip(raw.iter().cloned())
            .collect();

        let mut records = expand_row(&row);
        if records.is_empty() {
            if has_item_content(&row) {
                // Some item text exists even though nothing parsed; keep
                // the row visible instead of losing it entirely.
                records.push(placeholder_record(&row));
            } else {
                continue;
            }
        }

        for record in &records {
            rows.push(record_to_row(record, &kept_columns));
        }
    }

    if rows.is_empty() {
        debug!("no row produced any line items; returning result unexpanded");
        return passthrough(result);
    }

    let expanded_row_count = rows.len();
    debug!(
        original = result.data.len(),
        expanded = expanded_row_count,
        "expanded result set"
    );

    ExpandedResultSet {
        columns,
        rows,
        original_row_count: result.data.len(),
        expanded_row_count,
        total_line_items: expanded_row_count,
        items_expanded: true,
    }
}

fn passthrough(result: &QueryResult) -> ExpandedResultSet {
    ExpandedResultSet {
        columns: result.columns.clone(),
        rows: result.data.clone(),
        original_row_count: result.data.len(),
        expanded_row_count: result.data.len(),
        total_line_items: 0,
        items_expanded: false,
    }
}

fn invoice_fields_of(row: &HashMap<String, Value>) -> HashMap<String, Value> {
    row.iter()
        .filter(|(name, _)| !ITEM_ARRAY_COLUMNS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Whether any packed item field holds content worth preserving. An empty
/// JSON array literal (`[]`, `[ ]`) does not count.
fn has_item_content(row: &HashMap<String, Value>) -> bool {
    ITEM_ARRAY_COLUMNS.iter().any(|column| match row.get(*column) {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && !is_empty_array_literal(trimmed)
        }
        Some(Value::Array(elements)) => !elements.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    })
}

fn is_empty_array_literal(trimmed: &str) -> bool {
    trimmed.starts_with('[')
        && trimmed.ends_with(']')
        && trimmed[1..trimmed.len() - 1].trim().is_empty()
}

/// The degenerate fallback: one record carrying the unparsed description
/// text and zeroed numeric fields.
fn placeholder_record(row: &HashMap<String, Value>) -> ItemRecord {
    let description = match row.get(ITEMS_DESCRIPTION) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    ItemRecord {
        item_index: 1,
        description,
        unit_price: 0.0,
        quantity: 0.0,
        line_total: 0.0,
        invoice_fields: invoice_fields_of(row),
    }
}

fn record_to_row(record: &ItemRecord, kept_columns: &[String]) -> Vec<Value> {
    let mut row: Vec<Value> = kept_columns
        .iter()
        .map(|column| {
            record
                .invoice_fields
                .get(column)
                .cloned()
                .unwrap_or(Value::Null)
        })
        .collect();
    row.push(Value::from(record.item_index as u64));
    row.push(Value::String(record.description.clone()));
    row.push(json_number(record.unit_price));
    row.push(json_number(record.quantity));
    row.push(json_number(record.line_total));
    row
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
