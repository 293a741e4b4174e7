use thiserror::Error;

use crate::mapping::IdType;
use crate::sql_generation::{AliasError, SqlGenerationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("Cannot use {value} as an identifier of type {id_type}")]
    Unsupported { value: String, id_type: IdType },

    #[error("Invalid {id_type} identifier '{value}': {reason}")]
    Invalid {
        value: String,
        id_type: IdType,
        reason: String,
    },
}

/// Failure reported by the database collaborator
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionError {
    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    #[error(transparent)]
    Alias(#[from] AliasError),

    #[error("Row has no column '{column}' for path `{path}`")]
    MissingColumn { column: String, path: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReaderError {
    #[error(transparent)]
    Generation(#[from] SqlGenerationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Expected {expected} row for identifier lookup, got {actual}")]
    AmbiguousSingleResult { expected: usize, actual: usize },
}
