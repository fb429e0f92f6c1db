//! # Packed Field Parsing
//!
//! Invoice rows pack their line items into parallel array fields whose
//! encoding varies by upstream source: JSON array literals, native arrays,
//! delimited strings, bare scalars, or nothing at all. This module
//! normalizes any of those encodings into homogeneous ordered lists.
//!
//! Both parsers are total. Malformed input degrades to empty lists or
//! zero values and is logged at debug level, so a single bad field never
//! takes down the expansion of an entire result set.

use serde_json::Value;
use tracing::debug;

/// Candidate delimiters for non-JSON strings. Two-character forms come
/// first so they win ties against their single-character prefixes.
const DELIMITERS: [&str; 7] = ["||", ";;", ",", ";", "|", "\n", "\t"];

/// Normalizes one packed text field into an ordered list of strings.
///
/// Native arrays are stringified element-wise; strings are tried as JSON
/// arrays first and fall back to delimiter splitting. Elements that are
/// empty after trimming are dropped.
pub fn parse_text_field(value: &Value) -> Vec<String> {
    match value {
        Value::Array(elements) => stringify_elements(elements),
        Value::String(s) => parse_packed_str(s),
        _ => Vec::new(),
    }
}

/// Normalizes one packed numeric field into an ordered list of floats.
///
/// Unparseable elements become `0.0` instead of being dropped so that
/// positions stay aligned with the sibling description array. Currency
/// symbols and grouping characters are stripped before conversion.
pub fn parse_numeric_field(value: &Value) -> Vec<f64> {
    match value {
        Value::Number(n) => vec![n.as_f64().unwrap_or(0.0)],
        Value::Array(elements) => elements.iter().map(element_to_f64).collect(),
        Value::String(s) => parse_packed_str(s)
            .iter()
            .map(|piece| clean_numeric(piece))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses one packed string: strict JSON array first, then delimiter
/// detection. A JSON parse failure falls through to delimiter parsing on
/// the bracket-stripped payload rather than raising.
fn parse_packed_str(s: &str) -> Vec<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut payload = trimmed;
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(elements) => return stringify_elements(&elements),
            Err(e) => {
                debug!("JSON array parse failed, falling back to delimiters: {e}");
                payload = trimmed[1..trimmed.len() - 1].trim();
            }
        }
    }

    let delimiter = detect_delimiter(payload);
    payload
        .split(delimiter)
        .map(|piece| piece.trim().trim_matches(['"', '\'']).trim())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Picks the delimiter with the highest occurrence count, defaulting to a
/// comma. Ties go to the earlier candidate in `DELIMITERS`.
fn detect_delimiter(s: &str) -> &'static str {
    let mut best = ",";
    let mut best_count = 0;
    for candidate in DELIMITERS {
        let count = s.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Stringifies the non-null elements of a native array, dropping any that
/// are empty after trimming. Mixed-type arrays normalize uniformly.
fn stringify_elements(elements: &[Value]) -> Vec<String> {
    elements
        .iter()
        .filter(|element| !element.is_null())
        .map(element_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn element_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn element_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => clean_numeric(s),
        _ => 0.0,
    }
}

/// Strips everything except digits, `.` and `-` (currency symbols,
/// thousands separators), then converts. Anything that still fails to
/// parse counts as `0.0`.
fn clean_numeric(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}
