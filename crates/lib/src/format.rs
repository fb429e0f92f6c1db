//! # Response Formatting
//!
//! Turns expanded result sets into the human-readable summary fragments
//! the host splices into its final answer, and computes the aggregate
//! statistics behind them. The formatter works purely over the in-memory
//! expanded rows; it never sees the database. Its output is handed onward
//! to the host's redaction layer, which filters sensitive identifiers.

use crate::constants::{
    ITEM_COLUMNS, ITEM_DESCRIPTION, ITEM_LINE_TOTAL, ITEM_QUANTITY, ITEM_UNIT_PRICE,
    PARENT_ID_COLUMNS,
};
use crate::expand::expand_result_set;
use crate::types::{ExpandedResultSet, ItemStatistics, QueryResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Returned when a result set could not be expanded into line items.
pub const NO_ITEM_INFORMATION: &str = "No detailed item information found for this request.";
/// Returned when no expanded row matches any requested product.
pub const NO_PRODUCT_INFORMATION: &str = "No information found for the requested product(s).";

/// How many of the most frequent descriptions a summary reports.
const TOP_DESCRIPTION_LIMIT: usize = 5;

/// Summarizes an expanded result set: item and invoice counts, total
/// value, average unit price, and the most frequent descriptions. Returns
/// the no-information sentinel when expansion was not applied.
pub fn format_item_response(set: &ExpandedResultSet, question: &str) -> String {
    if !set.items_expanded || set.rows.is_empty() {
        return NO_ITEM_INFORMATION.to_string();
    }

    let stats = statistics_for(set);
    let mut out = format!(
        "Found {} line items across {} invoices.\n",
        stats.total_line_items, stats.distinct_invoices
    );
    out.push_str(&format!(
        "Total value: ${:.2}. Average unit price: ${:.2}.\n",
        stats.total_value, stats.average_unit_price
    ));
    if !stats.top_descriptions.is_empty() {
        out.push_str("Most frequent items:\n");
        for (description, count) in &stats.top_descriptions {
            out.push_str(&format!("- {description} (x{count})\n"));
        }
    }

    debug!(question, "formatted item summary");
    out.trim_end().to_string()
}

/// Summarizes only the line items whose description contains one of the
/// requested products (case-insensitive), grouped by exact description.
/// Returns the no-information sentinel when nothing matches.
pub fn format_product_specific_response(
    set: &ExpandedResultSet,
    question: &str,
    products: &[String],
) -> String {
    if !set.items_expanded || set.rows.is_empty() || products.is_empty() {
        return NO_PRODUCT_INFORMATION.to_string();
    }

    let desc_idx = column_index(set, ITEM_DESCRIPTION);
    let price_idx = column_index(set, ITEM_UNIT_PRICE);
    let qty_idx = column_index(set, ITEM_QUANTITY);
    let total_idx = column_index(set, ITEM_LINE_TOTAL);
    let lowered_products: Vec<String> = products.iter().map(|p| p.to_lowercase()).collect();

    struct Group {
        quantity: f64,
        value: f64,
        price_sum: f64,
        count: usize,
        parents: HashSet<String>,
    }

    // BTreeMap keeps the per-product report order deterministic.
    let mut groups: BTreeMap<String, Group> = BTreeMap::new();
    for row in &set.rows {
        let description = cell_text(row, desc_idx);
        let lowered = description.to_lowercase();
        if !lowered_products.iter().any(|p| lowered.contains(p)) {
            continue;
        }
        let group = groups.entry(description).or_insert_with(|| Group {
            quantity: 0.0,
            value: 0.0,
            price_sum: 0.0,
            count: 0,
            parents: HashSet::new(),
        });
        group.quantity += cell_number(row, qty_idx);
        group.value += cell_number(row, total_idx);
        group.price_sum += cell_number(row, price_idx);
        group.count += 1;
        group.parents.insert(parent_key(set, row));
    }

    if groups.is_empty() {
        return NO_PRODUCT_INFORMATION.to_string();
    }

    let mut out = String::new();
    for (description, group) in &groups {
        out.push_str(&format!(
            "{description}: {} units across {} invoices, total ${:.2}, average unit price ${:.2}\n",
            group.quantity,
            group.parents.len(),
            group.value,
            group.price_sum / group.count as f64,
        ));
    }

    debug!(question, matched = groups.len(), "formatted product summary");
    out.trim_end().to_string()
}

/// Computes aggregate statistics over a result set, expanding it first
/// when the packed item columns are still present. Returns zeroed
/// statistics when there is nothing to expand.
pub fn get_item_statistics(result: &QueryResult) -> ItemStatistics {
    let expanded = expand_result_set(result);
    statistics_for(&expanded)
}

/// The statistics behind `format_item_response`, computed directly from an
/// already-expanded set.
pub fn statistics_for(set: &ExpandedResultSet) -> ItemStatistics {
    if !set.items_expanded || set.rows.is_empty() {
        return ItemStatistics::default();
    }

    let desc_idx = column_index(set, ITEM_DESCRIPTION);
    let price_idx = column_index(set, ITEM_UNIT_PRICE);
    let qty_idx = column_index(set, ITEM_QUANTITY);
    let total_idx = column_index(set, ITEM_LINE_TOTAL);

    let mut parents: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total_value = 0.0;
    let mut price_sum = 0.0;
    let mut quantity_sum = 0.0;

    for row in &set.rows {
        parents.insert(parent_key(set, row));
        total_value += cell_number(row, total_idx);
        price_sum += cell_number(row, price_idx);
        quantity_sum += cell_number(row, qty_idx);
        let description = cell_text(row, desc_idx);
        if !description.is_empty() {
            *counts.entry(description).or_insert(0) += 1;
        }
    }

    let row_count = set.rows.len();
    let divisor = row_count as f64;

    ItemStatistics {
        total_line_items: row_count,
        distinct_invoices: parents.len(),
        total_value,
        average_unit_price: price_sum / divisor,
        average_quantity: quantity_sum / divisor,
        top_descriptions: top_descriptions(counts),
    }
}

/// Frequency ranking, highest count first; ties break alphabetically so
/// the report is stable across runs.
fn top_descriptions(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_DESCRIPTION_LIMIT);
    entries
}

/// Identity of a row's parent invoice: the first known identifier column,
/// falling back to the full tuple of invoice-level fields (siblings from
/// the same parent row share them verbatim).
fn parent_key(set: &ExpandedResultSet, row: &[Value]) -> String {
    if let Some(idx) = PARENT_ID_COLUMNS
        .iter()
        .find_map(|column| column_index(set, column))
    {
        return cell_text(row, Some(idx));
    }
    let invoice_field_count = set.columns.len().saturating_sub(ITEM_COLUMNS.len());
    row.iter()
        .take(invoice_field_count)
        .map(value_text)
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

fn column_index(set: &ExpandedResultSet, name: &str) -> Option<usize> {
    set.columns.iter().position(|column| column == name)
}

fn cell_text(row: &[Value], index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(value_text)
        .unwrap_or_default()
}

fn cell_number(row: &[Value], index: Option<usize>) -> f64 {
    match index.and_then(|i| row.get(i)) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
