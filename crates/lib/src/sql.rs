//! # SQL Hint Construction
//!
//! Centralizes every piece of SQL text the core produces: per-intent
//! column suggestions, LIKE-based product filters, ordering preferences,
//! and the one fully-formed query this crate emits itself. Isolating the
//! SQL strings here keeps the classification logic free of database
//! syntax.

use crate::constants::{
    INVOICE_DATE_COLUMN, INVOICE_ID_COLUMN, INVOICE_TABLE, ITEMS_DESCRIPTION, ITEMS_QUANTITY,
    ITEMS_UNIT_PRICE, PRODUCT_SQL_ROW_LIMIT, SCOPE_COLUMN,
};
use crate::errors::ProcessError;
use crate::types::{QueryIntent, SqlHints};
use tracing::debug;

/// Suggested SELECT columns per intent, shared by the hint builder and
/// `QueryAnalysis::required_columns` so the host's prompt and its
/// post-filter agree on column sets.
pub(crate) fn intent_columns(intent: QueryIntent) -> Vec<&'static str> {
    match intent {
        QueryIntent::QuantityInquiry => vec![ITEMS_DESCRIPTION, ITEMS_QUANTITY],
        QueryIntent::ProductListing => vec![
            ITEMS_DESCRIPTION,
            ITEMS_UNIT_PRICE,
            ITEMS_QUANTITY,
            INVOICE_DATE_COLUMN,
        ],
        QueryIntent::ProductPricing
        | QueryIntent::CostBreakdown
        | QueryIntent::PriceAnalysis
        | QueryIntent::GeneralItemQuery => {
            vec![ITEMS_DESCRIPTION, ITEMS_UNIT_PRICE, ITEMS_QUANTITY]
        }
    }
}

/// Builds the SQL construction hints for one classified question.
///
/// The hints are prompt fragments, not executable SQL: the host splices
/// them into its query-generation prompt. The where hint is empty when no
/// products were extracted.
pub fn build_sql_hints(question: &str, intent: QueryIntent, products: &[String]) -> SqlHints {
    let lowered = question.to_lowercase();

    let select_hint = format!(
        "Include the columns {} in the SELECT clause.",
        intent_columns(intent).join(", ")
    );

    let special_hint = match intent {
        QueryIntent::PriceAnalysis => {
            "Include every item-level column so per-item price extremes can be computed after expansion."
                .to_string()
        }
        QueryIntent::CostBreakdown => {
            "Fetch all invoice rows for the scope so the per-item cost breakdown is complete."
                .to_string()
        }
        _ => String::new(),
    };

    let order_hint = if lowered.contains("oldest") || lowered.contains("first") {
        format!("ORDER BY {INVOICE_DATE_COLUMN} ASC")
    } else if intent == QueryIntent::PriceAnalysis
        && (lowered.contains("expensive") || lowered.contains("highest"))
    {
        format!("ORDER BY {ITEMS_UNIT_PRICE} DESC")
    } else if intent == QueryIntent::PriceAnalysis
        && (lowered.contains("cheapest") || lowered.contains("lowest"))
    {
        format!("ORDER BY {ITEMS_UNIT_PRICE} ASC")
    } else {
        format!("ORDER BY {INVOICE_DATE_COLUMN} DESC")
    };

    SqlHints {
        select_hint,
        where_hint: build_product_filter(products),
        order_hint,
        special_hint,
    }
}

/// Builds a complete, executable, scope-filtered query for the extracted
/// products. This is the only function in the crate that returns direct
/// SQL rather than a hint.
///
/// Errors only on caller contract violations: an empty scope identifier or
/// an empty product list.
pub fn generate_product_specific_sql(
    scope_id: &str,
    products: &[String],
) -> Result<String, ProcessError> {
    if scope_id.trim().is_empty() {
        return Err(ProcessError::MissingScopeId);
    }
    if products.is_empty() {
        return Err(ProcessError::NoProducts);
    }

    let columns = [
        INVOICE_ID_COLUMN,
        SCOPE_COLUMN,
        INVOICE_DATE_COLUMN,
        ITEMS_DESCRIPTION,
        ITEMS_UNIT_PRICE,
        ITEMS_QUANTITY,
    ]
    .join(", ");
    let filter = build_product_filter(products);

    let sql = format!(
        "SELECT {columns} FROM {INVOICE_TABLE} \
         WHERE {SCOPE_COLUMN} = '{scope}' AND ({filter}) \
         ORDER BY {INVOICE_DATE_COLUMN} DESC, {INVOICE_ID_COLUMN} DESC \
         LIMIT {PRODUCT_SQL_ROW_LIMIT}",
        scope = escape_single_quotes(scope_id),
    );
    debug!(%sql, "generated product-specific query");
    Ok(sql)
}

/// OR-joined case-insensitive LIKE fragments, one per product; empty when
/// no products were extracted.
fn build_product_filter(products: &[String]) -> String {
    products
        .iter()
        .map(|product| {
            format!(
                "LOWER({ITEMS_DESCRIPTION}) LIKE LOWER('%{}%')",
                escape_single_quotes(product)
            )
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Doubles single quotes so product names are safe to interpolate.
fn escape_single_quotes(raw: &str) -> String {
    raw.replace('\'', "''")
}
