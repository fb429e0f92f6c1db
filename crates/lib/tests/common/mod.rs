#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the integration tests: tracing setup and builders
//! for the raw result-set shape the database layer hands over.

use anyitem::QueryResult;
use serde_json::Value;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

/// Builds a successful `QueryResult` from column names and row values.
pub fn result_with(columns: &[&str], data: Vec<Vec<Value>>) -> QueryResult {
    QueryResult {
        success: true,
        columns: columns.iter().map(|c| c.to_string()).collect(),
        data,
    }
}
