//! # Shared Constants
//!
//! This module provides a centralized location for the column and table
//! names used by the expansion, SQL, and formatting modules. Using these
//! constants helps to avoid "magic strings" and keeps the generated SQL
//! consistent with the post-expansion column shape.

/// The invoice table every generated query runs against.
pub const INVOICE_TABLE: &str = "VENDOR_INVOICES";

/// The column holding the packed line-item descriptions.
pub const ITEMS_DESCRIPTION: &str = "ITEMS_DESCRIPTION";
/// The column holding the packed per-item unit prices.
pub const ITEMS_UNIT_PRICE: &str = "ITEMS_UNIT_PRICE";
/// The column holding the packed per-item quantities.
pub const ITEMS_QUANTITY: &str = "ITEMS_QUANTITY";

/// The three packed columns removed from a result set during expansion.
pub const ITEM_ARRAY_COLUMNS: [&str; 3] =
    [ITEMS_DESCRIPTION, ITEMS_UNIT_PRICE, ITEMS_QUANTITY];

/// 1-based position of a virtual row within its parent's packed arrays.
pub const ITEM_INDEX: &str = "ITEM_INDEX";
pub const ITEM_DESCRIPTION: &str = "ITEM_DESCRIPTION";
pub const ITEM_UNIT_PRICE: &str = "ITEM_UNIT_PRICE";
pub const ITEM_QUANTITY: &str = "ITEM_QUANTITY";
/// Always recomputed during expansion, never read from source data.
pub const ITEM_LINE_TOTAL: &str = "ITEM_LINE_TOTAL";

/// The columns appended to an expanded result set, in output order.
pub const ITEM_COLUMNS: [&str; 5] = [
    ITEM_INDEX,
    ITEM_DESCRIPTION,
    ITEM_UNIT_PRICE,
    ITEM_QUANTITY,
    ITEM_LINE_TOTAL,
];

/// Identifier columns checked, in order, when telling parent invoices apart.
pub const PARENT_ID_COLUMNS: [&str; 4] = ["CASE_ID", "BILL_ID", "VENDOR_ID", "CUSTOMER_ID"];

/// The tenant filter column that must appear in every generated query.
pub const SCOPE_COLUMN: &str = "VENDOR_ID";
/// The date column used for recency ordering.
pub const INVOICE_DATE_COLUMN: &str = "INVOICE_DATE";
/// The identifier used as the ordering tie-breaker.
pub const INVOICE_ID_COLUMN: &str = "CASE_ID";

/// Row cap applied to the product-specific query.
pub const PRODUCT_SQL_ROW_LIMIT: usize = 100;

/// Maximum number of distinct questions memoized by the product extractor.
pub const EXTRACTOR_CACHE_CAPACITY: u64 = 256;

/// Maximum number of product candidates returned per question.
pub const MAX_EXTRACTED_PRODUCTS: usize = 5;
