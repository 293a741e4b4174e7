use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::errors::{ExecutionError, ExtractionError};
use crate::mapping::AggregateMapping;
use crate::sql_generation::PathToColumnMapping;

/// Named parameters bound to a generated statement
pub type QueryParameters = HashMap<String, Value>;

/// A result row keyed by output column name
pub type JsonRow = Map<String, Value>;

/// Runs generated SQL against a database
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    type Row: Send;

    async fn query(
        &self,
        sql: &str,
        parameters: &QueryParameters,
    ) -> Result<Vec<Self::Row>, ExecutionError>;
}

/// Turns the rows of one statement back into aggregates
pub trait ResultSetExtractor<R>: Send + Sync {
    type Output: Send;

    fn extract(
        &self,
        rows: Vec<R>,
        columns: &dyn PathToColumnMapping,
    ) -> Result<Vec<Self::Output>, ExtractionError>;
}

/// Extracts one JSON object per row, keyed by property name.
///
/// Covers the scalar properties of the root entity, which is everything a
/// generated statement currently selects.
#[derive(Clone)]
pub struct JsonRowExtractor {
    mapping: Arc<dyn AggregateMapping>,
}

impl JsonRowExtractor {
    pub fn new(mapping: Arc<dyn AggregateMapping>) -> Self {
        JsonRowExtractor { mapping }
    }
}

impl ResultSetExtractor<JsonRow> for JsonRowExtractor {
    type Output = Map<String, Value>;

    fn extract(
        &self,
        rows: Vec<JsonRow>,
        columns: &dyn PathToColumnMapping,
    ) -> Result<Vec<Self::Output>, ExtractionError> {
        let properties = self
            .mapping
            .persistent_paths()
            .iter()
            .filter(|path| !path.is_entity() && path.is_top_level())
            .map(|path| -> Result<_, ExtractionError> { Ok((path, columns.column(path)?)) })
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|mut row| {
                let mut aggregate = Map::new();
                for (path, column) in &properties {
                    let value = row.remove(column).ok_or_else(|| {
                        ExtractionError::MissingColumn {
                            column: column.clone(),
                            path: path.to_string(),
                        }
                    })?;
                    aggregate.insert(path.to_string(), value);
                }
                Ok(aggregate)
            })
            .collect()
    }
}
