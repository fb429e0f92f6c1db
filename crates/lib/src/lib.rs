//! # Natural Language to Line Items
//!
//! This crate provides the core processing engine for answering natural
//! language questions about vendor invoices whose line items are packed
//! into parallel array fields (descriptions, unit prices, quantities)
//! encoded as JSON arrays, native arrays, or delimited strings.
//!
//! The pipeline has two independent halves. On the question side,
//! [`ItemProcessor::analyze`] classifies a free-text question, extracts
//! candidate product names, and produces SQL construction hints for the
//! host's query generator. On the data side, [`expand_result_set`] turns
//! each fetched multi-item invoice row into one virtual row per line item
//! with recomputed totals, and the formatting functions summarize the
//! expanded rows for the final answer.
//!
//! The crate performs no I/O of its own: the host executes the SQL and
//! calls back in with the fetched `{success, columns, data}` result.

pub mod classify;
pub mod constants;
pub mod errors;
pub mod expand;
pub mod extract;
pub mod format;
pub mod parse;
pub mod sql;
pub mod types;

pub use errors::ProcessError;
pub use expand::{expand_result_set, expand_row};
pub use format::{
    format_item_response, format_product_specific_response, get_item_statistics,
    NO_ITEM_INFORMATION, NO_PRODUCT_INFORMATION,
};
pub use sql::{build_sql_hints, generate_product_specific_sql};
pub use types::{
    ExpandedResultSet, ItemProcessor, ItemRecord, ItemStatistics, QueryAnalysis, QueryIntent,
    QueryResult, SqlHints,
};

use tracing::debug;

impl ItemProcessor {
    /// Runs the full classification pipeline over one question.
    ///
    /// The returned analysis carries everything the host needs upstream of
    /// query execution: the item/product classification, the extracted
    /// product names, the intent, the columns the generated query should
    /// select, and the SQL construction hints.
    pub fn analyze(&self, question: &str) -> QueryAnalysis {
        let extracted_products = self.extract_products(question);
        let is_product_query = self.is_specific_product_query(question);
        let is_item_query = self.is_item_query(question);
        let query_intent = self.classify_intent(question);

        let required_columns = sql::intent_columns(query_intent)
            .into_iter()
            .map(String::from)
            .collect();
        let sql_hints = build_sql_hints(question, query_intent, &extracted_products);

        debug!(
            is_item_query,
            is_product_query,
            ?query_intent,
            products = extracted_products.len(),
            "analyzed question"
        );

        QueryAnalysis {
            is_item_query,
            is_product_query,
            extracted_products,
            query_intent,
            required_columns,
            sql_hints,
        }
    }
}
