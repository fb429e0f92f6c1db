//! # Heuristic Product Extraction
//!
//! Pulls candidate product and service names out of free text using quoted
//! spans, a fixed set of regex templates, and a vocabulary of known service
//! terms. Extraction is heuristic by design; precision comes from the
//! subsumption pass, which keeps only the longest, most specific
//! candidates and caps the output at five.

use crate::constants::MAX_EXTRACTED_PRODUCTS;
use crate::types::ItemProcessor;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Tokens removed from template captures before a candidate is considered.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "of", "for", "on", "in", "do", "does", "did",
    "to", "we", "i", "my", "our", "you", "your", "show", "find", "get", "give", "me", "much",
    "many", "how", "what", "have", "has", "had", "and", "or", "per", "each", "all", "any",
    "this", "that", "it", "its",
];

/// Quoted spans are kept verbatim and take priority over everything else.
static QUOTED_SPANS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r#""([^"]+)""#, r"'([^']+)'"]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect()
});

/// Templates matched against the lower-cased question. Captures are
/// stop-word-filtered before they become candidates.
static PRODUCT_TEMPLATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"price of ([^?,.!]+)",
        r"cost of ([^?,.!]+)",
        r"spend(?:ing)? on ([^?,.!]+)",
        r"spent on ([^?,.!]+)",
        r"pay(?:ing)? for ([^?,.!]+)",
        r"how much (?:is|was|does|do) ([^?,.!]+)",
        r"([a-z]+(?:\s+[a-z]+){0,3})\s+(?:cost|price|pricing)\b",
        r"\b((?:office\s+)?(?:chair|desk|table|cabinet)s?)\b",
        r"\b([a-z]+\s+(?:report|software|subscription|supplies|paper)s?)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Known product and service vocabulary, matched by plain containment.
const SERVICE_TERMS: &[&str] = &[
    "cloud storage",
    "web hosting",
    "hosting",
    "technical support",
    "support",
    "license",
    "licensing",
    "training",
    "consulting",
    "maintenance",
    "backup",
    "security",
    "ssl",
    "domain",
    "server",
    "software",
    "subscription",
];

impl ItemProcessor {
    /// Extracts up to five candidate product names from a question,
    /// longest and most specific first.
    ///
    /// Results are memoized per distinct question in the processor's
    /// bounded cache; extraction is a pure function of its input, so
    /// entries never need invalidation.
    pub fn extract_products(&self, question: &str) -> Vec<String> {
        let key = question.trim().to_lowercase();
        if let Some(cached) = self.extraction_cache.get(&key) {
            debug!("product extraction cache hit");
            return cached;
        }
        let products = extract_products_uncached(question);
        self.extraction_cache.insert(key, products.clone());
        products
    }
}

fn extract_products_uncached(question: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for re in QUOTED_SPANS.iter() {
        for caps in re.captures_iter(question) {
            let span = caps[1].trim();
            if span.chars().count() >= 3 {
                candidates.push(span.to_string());
            }
        }
    }

    let lowered = question.to_lowercase();
    for re in PRODUCT_TEMPLATES.iter() {
        for caps in re.captures_iter(&lowered) {
            if let Some(candidate) = filter_stop_words(caps[1].trim()) {
                candidates.push(candidate);
            }
        }
    }

    for term in SERVICE_TERMS {
        if lowered.contains(term) {
            candidates.push((*term).to_string());
        }
    }

    let products = dedupe_by_subsumption(candidates);
    debug!(count = products.len(), "extracted product candidates");
    products
}

/// Drops stop-word tokens from a capture; `None` when fewer than three
/// characters survive.
fn filter_stop_words(capture: &str) -> Option<String> {
    let kept: Vec<&str> = capture
        .split_whitespace()
        .filter(|token| {
            let normalized: String = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            !normalized.is_empty() && !STOP_WORDS.contains(&normalized.as_str())
        })
        .collect();
    let joined = kept.join(" ");
    (joined.chars().count() >= 3).then_some(joined)
}

/// Keeps the longest, most specific candidates: the list is sorted by
/// length descending and a candidate is dropped when it is already a
/// case-insensitive substring of a kept one, so "chair" never survives
/// alongside "office chair". Equal lengths keep their source priority
/// (quoted spans before templates before vocabulary).
fn dedupe_by_subsumption(mut candidates: Vec<String>) -> Vec<String> {
    candidates.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let mut kept: Vec<String> = Vec::new();
    for candidate in candidates {
        let lowered = candidate.to_lowercase();
        if kept
            .iter()
            .any(|existing| existing.to_lowercase().contains(&lowered))
        {
            continue;
        }
        kept.push(candidate);
        if kept.len() == MAX_EXTRACTED_PRODUCTS {
            break;
        }
    }
    kept
}
