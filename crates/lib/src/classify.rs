//! # Question Classification
//!
//! Ordered keyword and pattern tables that decide whether a question
//! targets individual line items, whether it names specific products, and
//! which intent should shape the SQL hints. The tables are literal data
//! rather than branching code so the precedence rules can be tested in
//! isolation. Pricing checks run before listing checks because their
//! vocabularies overlap.

use crate::types::{ItemProcessor, QueryIntent};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Phrases that mark a question as item-level.
const ITEM_PHRASES: &[&str] = &[
    "items",
    "products",
    "services",
    "line items",
    "line item",
    "breakdown",
    "itemized",
    "itemised",
    "unit price",
    "per item",
    "each item",
    "what's on the invoice",
    "whats on the invoice",
    "what is on the invoice",
    "purchased",
    "bought",
];

/// Quantity-implying patterns that also mark a question as item-level.
static QUANTITY_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"how many .*(items|products|services)",
        r"count .*(items|products|services)",
        r"number of .*(items|products|services)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Lexical patterns that mark a question as product-specific even when the
/// extractor finds no concrete candidate.
static PRODUCT_QUERY_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"price of\s+\S",
        r"cost of\s+\S",
        r"how much .*(is|for|does)",
        r#""[^"]{3,}""#,
        r"'[^']{3,}'",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

const PRICING_PHRASES: &[&str] = &[
    "price of",
    "cost of",
    "how much is",
    "how much for",
    "how much does",
    "unit price",
    "price for",
    "pricing",
];

const QUANTITY_PHRASES: &[&str] = &[
    "how many",
    "quantity",
    "quantities",
    "count of",
    "number of",
    "units of",
];

const LISTING_PHRASES: &[&str] = &[
    "what items",
    "what products",
    "what services",
    "which items",
    "show me",
    "list",
    "what did",
];

const BREAKDOWN_PHRASES: &[&str] = &[
    "breakdown",
    "break down",
    "itemized",
    "itemised",
    "split by item",
    "per line",
];

const SUPERLATIVE_PHRASES: &[&str] = &[
    "most expensive",
    "least expensive",
    "cheapest",
    "priciest",
    "highest",
    "lowest",
];

/// Ordered intent rules; the first table containing a phrase of the
/// lower-cased question wins. The order is deliberate and load-bearing.
const INTENT_RULES: &[(&[&str], QueryIntent)] = &[
    (PRICING_PHRASES, QueryIntent::ProductPricing),
    (QUANTITY_PHRASES, QueryIntent::QuantityInquiry),
    (LISTING_PHRASES, QueryIntent::ProductListing),
    (BREAKDOWN_PHRASES, QueryIntent::CostBreakdown),
    (SUPERLATIVE_PHRASES, QueryIntent::PriceAnalysis),
];

impl ItemProcessor {
    /// Returns true when the question asks about individual line items
    /// rather than whole invoices.
    pub fn is_item_query(&self, question: &str) -> bool {
        let lowered = question.to_lowercase();
        if ITEM_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
            return true;
        }
        if QUANTITY_REGEXES.iter().any(|re| re.is_match(&lowered)) {
            return true;
        }
        self.is_specific_product_query(question)
    }

    /// Returns true when the question targets one or more named products,
    /// either via a successful extraction or a lexical pattern hit.
    pub fn is_specific_product_query(&self, question: &str) -> bool {
        if !self.extract_products(question).is_empty() {
            return true;
        }
        let lowered = question.to_lowercase();
        PRODUCT_QUERY_REGEXES.iter().any(|re| re.is_match(&lowered))
    }

    /// Picks the question's intent via the ordered rule tables, defaulting
    /// to a general item query when nothing matches.
    pub fn classify_intent(&self, question: &str) -> QueryIntent {
        let lowered = question.to_lowercase();
        for (phrases, intent) in INTENT_RULES {
            if phrases.iter().any(|phrase| lowered.contains(phrase)) {
                debug!(?intent, "intent rule matched");
                return *intent;
            }
        }
        QueryIntent::GeneralItemQuery
    }
}
