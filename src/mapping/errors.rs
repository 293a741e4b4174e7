//! # Mapping Error Types
//!
//! Errors raised while loading aggregate definitions and turning them into
//! property paths. They describe configuration problems, never runtime data.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MappingError {
    #[error("No aggregate definition found for `{name}`")]
    UnknownAggregate { name: String },
    #[error("Duplicate property `{property}` in entity mapped to table '{table}'")]
    DuplicateProperty { property: String, table: String },
    #[error("Reference `{reference}` is a {collection} and needs a key_column")]
    MissingKeyColumn {
        reference: String,
        collection: String,
    },
    #[error("Failed to read mapping file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse mapping: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid mapping: {message}")]
    InvalidConfig { message: String },
}

impl MappingError {
    /// Create an InvalidConfig error naming the aggregate it was raised for
    pub fn invalid_with_context(message: impl Into<String>, aggregate: impl Into<String>) -> Self {
        MappingError::InvalidConfig {
            message: format!("{}\n  Aggregate: {}", message.into(), aggregate.into()),
        }
    }
}
