//! # Core Data Types
//!
//! The shapes exchanged with the host application: the raw query result
//! handed over by the database layer, the virtual line-item records and
//! expanded result sets produced by this crate, and the question analysis
//! consumed by the host's prompt builder. Everything that crosses the
//! boundary derives `Serialize`/`Deserialize` so hosts can pass it through
//! their own API layers unchanged.

use crate::constants::{EXTRACTOR_CACHE_CAPACITY, ITEM_ARRAY_COLUMNS};
use crate::errors::ProcessError;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// The result-set shape handed over by the database layer.
///
/// The core never executes queries itself; it receives already-fetched rows
/// in this shape and treats `success == false` or empty `data` as a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub success: bool,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Builds a `QueryResult` from a raw JSON value.
    ///
    /// This allows for easy integration with hosts that hand the database
    /// response over as untyped JSON.
    pub fn from_value(value: Value) -> Result<Self, ProcessError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns true if any of the packed item-array columns is present.
    pub fn has_item_columns(&self) -> bool {
        self.columns
            .iter()
            .any(|column| ITEM_ARRAY_COLUMNS.contains(&column.as_str()))
    }
}

/// One virtual line item derived from a multi-item invoice row.
///
/// A record is a pure function output of its parent row: it is created fresh
/// on every expansion call and never mutated or cached afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    /// 1-based position within the parent row's packed arrays.
    pub item_index: usize,
    pub description: String,
    pub unit_price: f64,
    pub quantity: f64,
    /// Always recomputed as `unit_price * quantity`, never trusted from
    /// source data.
    pub line_total: f64,
    /// Every non-item-array field of the parent row, copied verbatim.
    pub invoice_fields: HashMap<String, Value>,
}

/// A tabular result set whose multi-item rows have been expanded into one
/// row per line item.
///
/// `columns` replaces the three packed item-array columns with the five
/// per-item columns, keeping all other original columns in their original
/// relative order. When `items_expanded` is false the set is an unchanged
/// passthrough of the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandedResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub original_row_count: usize,
    pub expanded_row_count: usize,
    pub total_line_items: usize,
    pub items_expanded: bool,
}

/// The intent behind an item-level question, used to shape SQL hints.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    ProductPricing,
    QuantityInquiry,
    ProductListing,
    CostBreakdown,
    PriceAnalysis,
    #[default]
    GeneralItemQuery,
}

/// SQL construction hints handed to the host's prompt builder.
///
/// These are plain strings meant to be spliced into a prompt; none of them
/// is executable SQL on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlHints {
    pub select_hint: String,
    pub where_hint: String,
    pub order_hint: String,
    pub special_hint: String,
}

/// The full classification of one user question, recomputed on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub is_item_query: bool,
    pub is_product_query: bool,
    pub extracted_products: Vec<String>,
    pub query_intent: QueryIntent,
    pub required_columns: Vec<String>,
    pub sql_hints: SqlHints,
}

/// Aggregate statistics over the expanded line items of one result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemStatistics {
    pub total_line_items: usize,
    pub distinct_invoices: usize,
    pub total_value: f64,
    pub average_unit_price: f64,
    pub average_quantity: f64,
    /// The most frequent descriptions with their occurrence counts, capped
    /// at five entries.
    pub top_descriptions: Vec<(String, usize)>,
}

/// The item processing service.
///
/// Every method is a pure function of its inputs; the only held state is a
/// bounded memoization cache for product extraction, which is safe to share
/// across threads. Construction is cheap and no teardown is needed.
pub struct ItemProcessor {
    pub(crate) extraction_cache: Cache<String, Vec<String>>,
}

impl ItemProcessor {
    /// Creates a new processor with an empty extraction cache.
    pub fn new() -> Self {
        Self {
            extraction_cache: Cache::builder()
                .max_capacity(EXTRACTOR_CACHE_CAPACITY)
                .build(),
        }
    }
}

impl Default for ItemProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ItemProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemProcessor")
            .field("cached_questions", &self.extraction_cache.entry_count())
            .finish()
    }
}
