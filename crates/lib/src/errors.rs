use thiserror::Error;

/// Custom error types for the item processing pipeline.
///
/// Malformed row data never surfaces here: the parsing and expansion paths
/// degrade to empty or zero-valued defaults instead. These variants cover
/// caller contract violations only.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Scope identifier is missing")]
    MissingScopeId,
    #[error("No product filters were provided")]
    NoProducts,
    #[error("Failed to deserialize query result: {0}")]
    ResultDeserialization(#[from] serde_json::Error),
}
