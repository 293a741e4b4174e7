//! Reader round trips against an in-memory executor
use std::sync::{Arc, Mutex};

use aggregate_sql::mapping::AggregateSchemaConfig;
use aggregate_sql::reader::{
    AggregateReader, ExecutionError, JsonRow, JsonRowExtractor, QueryExecutor, QueryParameters,
    ReaderError,
};
use aggregate_sql::sql_generation::{PostgresDialect, QueryComposer};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::sql_assert::parse_aggregate_query;

/// Answers every statement with the rows of a fixed table, filtered by the
/// bound `id` / `ids` parameters and keyed by the aliases of the statement.
struct InMemoryTable {
    rows: Vec<(i64, &'static str)>,
    statements: Mutex<Vec<String>>,
}

#[async_trait]
impl QueryExecutor for InMemoryTable {
    type Row = JsonRow;

    async fn query(
        &self,
        sql: &str,
        parameters: &QueryParameters,
    ) -> Result<Vec<JsonRow>, ExecutionError> {
        self.statements.lock().unwrap().push(sql.to_string());
        let aliases = parse_aggregate_query(sql).outer_projection;

        let wanted: Option<Vec<Value>> = match (parameters.get("id"), parameters.get("ids")) {
            (Some(id), _) => Some(vec![id.clone()]),
            (None, Some(Value::Array(ids))) => Some(ids.clone()),
            _ => None,
        };

        Ok(self
            .rows
            .iter()
            .filter(|(id, _)| wanted.as_ref().is_none_or(|ids| ids.contains(&json!(id))))
            .map(|(id, name)| {
                let mut row = JsonRow::new();
                row.insert(aliases[0].clone(), json!(1));
                row.insert(aliases[1].clone(), json!(id));
                row.insert(aliases[2].clone(), json!(name));
                row
            })
            .collect())
    }
}

fn reader(rows: Vec<(i64, &'static str)>) -> AggregateReader<InMemoryTable, JsonRowExtractor> {
    let yaml = r#"
aggregates:
  - name: SimpleEntity
    table: simple_entity
    id:
      property: id
    properties:
      - name: name
"#;
    let schema = Arc::new(
        AggregateSchemaConfig::from_yaml_str(yaml)
            .unwrap()
            .aggregate("SimpleEntity")
            .unwrap(),
    );
    let composer = QueryComposer::new(schema.clone(), Arc::new(PostgresDialect));
    let executor = InMemoryTable {
        rows,
        statements: Mutex::new(Vec::new()),
    };
    AggregateReader::new(composer, executor, JsonRowExtractor::new(schema)).with_sql_logging(true)
}

#[tokio::test]
async fn test_find_all_reads_every_row() {
    let reader = reader(vec![(1, "Alice"), (2, "Bob")]);
    let all = reader.find_all().await.unwrap();

    assert_eq!(
        all.into_iter().map(Value::Object).collect::<Vec<_>>(),
        vec![
            json!({"id": 1, "name": "Alice"}),
            json!({"id": 2, "name": "Bob"}),
        ]
    );
}

#[tokio::test]
async fn test_find_by_id() {
    let reader = reader(vec![(1, "Alice"), (2, "Bob")]);

    let bob = reader.find_by_id(&json!(2)).await.unwrap().unwrap();
    assert_eq!(bob["name"], json!("Bob"));
    assert!(reader.find_by_id(&json!("3")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_id_ambiguous() {
    let reader = reader(vec![(1, "Alice"), (1, "Alicia")]);

    assert_eq!(
        reader.find_by_id(&json!(1)).await,
        Err(ReaderError::AmbiguousSingleResult {
            expected: 1,
            actual: 2
        })
    );
}

#[tokio::test]
async fn test_find_all_by_id() {
    let reader = reader(vec![(1, "Alice"), (2, "Bob"), (3, "Carol")]);

    let found = reader.find_all_by_id(&[json!(3), json!("1")]).await.unwrap();
    let names: Vec<&Value> = found.iter().map(|a| &a["name"]).collect();
    assert_eq!(names, vec![&json!("Alice"), &json!("Carol")]);
}

#[tokio::test]
async fn test_invalid_identifier() {
    let reader = reader(vec![(1, "Alice")]);
    let err = reader.find_by_id(&json!("one")).await.unwrap_err();
    assert!(matches!(err, ReaderError::Conversion(_)));
}

#[tokio::test]
async fn test_statements_reuse_aliases() {
    let reader = reader(vec![(1, "Alice")]);
    reader.find_all().await.unwrap();
    reader.find_by_id(&json!(1)).await.unwrap();
    reader.find_all_by_id(&[json!(1)]).await.unwrap();

    let statements = reader_statements(&reader);
    assert_eq!(statements.len(), 3);
    let projections: Vec<_> = statements
        .iter()
        .map(|sql| parse_aggregate_query(sql).outer_projection)
        .collect();
    assert!(projections.windows(2).all(|w| w[0] == w[1]));
}

fn reader_statements(reader: &AggregateReader<InMemoryTable, JsonRowExtractor>) -> Vec<String> {
    reader.executor().statements.lock().unwrap().clone()
}
