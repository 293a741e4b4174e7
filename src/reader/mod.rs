//! Loads aggregates with one statement per call.
//!
//! The reader asks its composer for SQL, binds the identifier parameters,
//! runs the statement through a [`QueryExecutor`] and hands the rows together
//! with the alias-based column mapping to a [`ResultSetExtractor`].

pub mod conversion;
pub mod errors;
pub mod executor;

use std::sync::Arc;

use serde_json::Value;

pub use conversion::{DefaultIdentifierConverter, IdentifierConverter};
pub use errors::{ConversionError, ExecutionError, ExtractionError, ReaderError};
pub use executor::{JsonRow, JsonRowExtractor, QueryExecutor, QueryParameters, ResultSetExtractor};

use crate::sql_generation::{QueryComposer, SqlGenerationError, IDS_PARAMETER, ID_PARAMETER};

pub struct AggregateReader<E, X> {
    composer: QueryComposer,
    executor: E,
    extractor: X,
    converter: Arc<dyn IdentifierConverter>,
    log_sql: bool,
}

impl<E, X> AggregateReader<E, X>
where
    E: QueryExecutor,
    X: ResultSetExtractor<E::Row>,
{
    pub fn new(composer: QueryComposer, executor: E, extractor: X) -> Self {
        AggregateReader {
            composer,
            executor,
            extractor,
            converter: Arc::new(DefaultIdentifierConverter),
            log_sql: false,
        }
    }

    pub fn with_converter(mut self, converter: Arc<dyn IdentifierConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Log every executed statement at info level
    pub fn with_sql_logging(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    pub fn composer(&self) -> &QueryComposer {
        &self.composer
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub async fn find_all(&self) -> Result<Vec<X::Output>, ReaderError> {
        let sql = self.composer.find_all()?;
        self.run(&sql, QueryParameters::new()).await
    }

    /// Load the aggregate with the given identifier.
    ///
    /// More than one matching row is an error, never truncated to the first.
    pub async fn find_by_id(&self, id: &Value) -> Result<Option<X::Output>, ReaderError> {
        let sql = self.composer.find_by_id()?;
        let mut parameters = QueryParameters::new();
        parameters.insert(ID_PARAMETER.to_string(), self.convert_id(id)?);

        let rows = self.execute(&sql, &parameters).await?;
        if rows.len() > 1 {
            log::warn!(
                "Identifier lookup of '{}' matched {} rows",
                self.composer.mapping().name(),
                rows.len()
            );
            return Err(ReaderError::AmbiguousSingleResult {
                expected: 1,
                actual: rows.len(),
            });
        }

        let mut aggregates = self.extract(rows)?;
        Ok(aggregates.pop())
    }

    pub async fn find_all_by_id(&self, ids: &[Value]) -> Result<Vec<X::Output>, ReaderError> {
        let sql = self.composer.find_all_by_id()?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let converted = ids
            .iter()
            .map(|id| self.convert_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        let mut parameters = QueryParameters::new();
        parameters.insert(IDS_PARAMETER.to_string(), Value::Array(converted));

        self.run(&sql, parameters).await
    }

    fn convert_id(&self, id: &Value) -> Result<Value, ReaderError> {
        let mapping = self.composer.mapping();
        let id_property = mapping
            .id_property()
            .ok_or_else(|| SqlGenerationError::MissingIdProperty(mapping.name().to_string()))?;
        Ok(self.converter.convert(id, id_property.id_type)?)
    }

    async fn run(
        &self,
        sql: &str,
        parameters: QueryParameters,
    ) -> Result<Vec<X::Output>, ReaderError> {
        let rows = self.execute(sql, &parameters).await?;
        self.extract(rows)
    }

    async fn execute(
        &self,
        sql: &str,
        parameters: &QueryParameters,
    ) -> Result<Vec<E::Row>, ReaderError> {
        if self.log_sql {
            log::info!("Executing: {}", sql);
        }
        let rows = self.executor.query(sql, parameters).await?;
        log::debug!("Statement returned {} rows", rows.len());
        Ok(rows)
    }

    fn extract(&self, rows: Vec<E::Row>) -> Result<Vec<X::Output>, ReaderError> {
        let columns = self.composer.column_mapping();
        Ok(self.extractor.extract(rows, &columns)?)
    }
}
