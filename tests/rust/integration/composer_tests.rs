//! End-to-end SQL generation for aggregates loaded from YAML.
use std::sync::Arc;

use aggregate_sql::mapping::{AggregateMapping, AggregateSchemaConfig, PropertyPath};
use aggregate_sql::sql_generation::{
    AliasError, ClickHouseDialect, PathToColumnMapping, PostgresDialect, QueryComposer,
};
use sqlparser::ast::{BinaryOperator, Expr as SqlExpr};
use test_case::test_case;

use super::sql_assert::{condition_count, parse_aggregate_query};

const SIMPLE_ENTITY_YAML: &str = r#"
aggregates:
  - name: SimpleEntity
    table: simple_entity
    id:
      property: id
    properties:
      - name: name
"#;

fn simple_entity_composer() -> QueryComposer {
    let config = AggregateSchemaConfig::from_yaml_str(SIMPLE_ENTITY_YAML).unwrap();
    let schema = config.aggregate("SimpleEntity").unwrap();
    QueryComposer::new(Arc::new(schema), Arc::new(PostgresDialect))
}

#[derive(Debug, Clone, Copy)]
enum EntryPoint {
    All,
    ById,
    ByIds,
}

fn generate(composer: &QueryComposer, entry: EntryPoint) -> String {
    match entry {
        EntryPoint::All => composer.find_all(),
        EntryPoint::ById => composer.find_by_id(),
        EntryPoint::ByIds => composer.find_all_by_id(),
    }
    .unwrap()
}

#[test]
fn test_find_all_simple_entity() {
    let composer = simple_entity_composer();
    let sql = composer.find_all().unwrap();
    let query = parse_aggregate_query(&sql);

    assert_eq!(
        query.outer_projection,
        vec!["rn_simple_entity_1", "c_id_2", "c_name_3"]
    );
    assert_eq!(
        query.inner_projection,
        vec![
            "1 AS rn_simple_entity_1",
            "\"simple_entity\".\"id\" AS c_id_2",
            "\"simple_entity\".\"name\" AS c_name_3",
        ]
    );
    assert_eq!(query.inner_table, "\"simple_entity\"");
    assert_eq!(query.view_alias, "t_simple_entity_4");
    assert!(query.inner_selection.is_none());
}

#[test_case(EntryPoint::All ; "all rows")]
#[test_case(EntryPoint::ById ; "by id")]
#[test_case(EntryPoint::ByIds ; "by id set")]
fn test_projection_parity(entry: EntryPoint) {
    let composer = simple_entity_composer();
    let query = parse_aggregate_query(&generate(&composer, entry));

    assert_eq!(query.outer_projection, query.inner_aliases);
    assert_eq!(query.outer_projection.len(), 3);
}

#[test]
fn test_entry_points_share_aliases() {
    let composer = simple_entity_composer();
    let by_ids = parse_aggregate_query(&composer.find_all_by_id().unwrap());
    let all = parse_aggregate_query(&composer.find_all().unwrap());
    let by_id = parse_aggregate_query(&composer.find_by_id().unwrap());

    assert_eq!(all.outer_projection, by_id.outer_projection);
    assert_eq!(all.outer_projection, by_ids.outer_projection);
    assert_eq!(all.view_alias, by_id.view_alias);
    assert_eq!(all.view_alias, by_ids.view_alias);
}

#[test]
fn test_predicate_presence() {
    let composer = simple_entity_composer();

    let all = parse_aggregate_query(&composer.find_all().unwrap());
    assert_eq!(condition_count(&all.inner_selection), 0);

    let by_id = parse_aggregate_query(&composer.find_by_id().unwrap());
    assert_eq!(condition_count(&by_id.inner_selection), 1);
    match by_id.inner_selection.as_ref().unwrap() {
        SqlExpr::BinaryOp {
            op: BinaryOperator::Eq,
            left,
            right,
        } => {
            assert_eq!(left.to_string(), "\"simple_entity\".\"id\"");
            assert_eq!(right.to_string(), ":id");
        }
        other => panic!("unexpected WHERE expression: {other:?}"),
    }

    let by_ids = parse_aggregate_query(&composer.find_all_by_id().unwrap());
    assert_eq!(condition_count(&by_ids.inner_selection), 1);
    match by_ids.inner_selection.as_ref().unwrap() {
        SqlExpr::InList {
            expr,
            list,
            negated,
        } => {
            assert!(!negated);
            assert_eq!(expr.to_string(), "\"simple_entity\".\"id\"");
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].to_string(), ":ids");
        }
        other => panic!("unexpected WHERE expression: {other:?}"),
    }
}

#[test]
fn test_aggregate_without_scalars() {
    let yaml = r#"
aggregates:
  - name: Marker
    table: marker
"#;
    let config = AggregateSchemaConfig::from_yaml_str(yaml).unwrap();
    let composer = QueryComposer::new(
        Arc::new(config.aggregate("Marker").unwrap()),
        Arc::new(PostgresDialect),
    );

    let query = parse_aggregate_query(&composer.find_all().unwrap());
    assert_eq!(query.outer_projection, vec!["rn_marker_1"]);
    assert_eq!(query.inner_projection, vec!["1 AS rn_marker_1"]);
    assert_eq!(query.view_alias, "t_marker_2");
}

#[test]
fn test_column_names_are_sanitized_and_disambiguated() {
    let yaml = r#"
aggregates:
  - name: Person
    table: Person-Record
    properties:
      - name: first
        column: Name
      - name: second
        column: "name!"
"#;
    let config = AggregateSchemaConfig::from_yaml_str(yaml).unwrap();
    let composer = QueryComposer::new(
        Arc::new(config.aggregate("Person").unwrap()),
        Arc::new(PostgresDialect),
    );

    let sql = composer.find_all().unwrap();
    let query = parse_aggregate_query(&sql);
    assert_eq!(
        query.outer_projection,
        vec!["rn_personrecord_1", "c_name_2", "c_name_3"]
    );
    assert_eq!(query.inner_table, "\"Person-Record\"");
    assert_eq!(query.view_alias, "t_personrecord_4");
}

#[test]
fn test_column_mapping_finds_projected_paths() {
    let composer = simple_entity_composer();
    let query = parse_aggregate_query(&composer.find_by_id().unwrap());

    let columns = composer.column_mapping();
    for path in composer.mapping().persistent_paths() {
        let alias = columns.column(path).unwrap();
        assert!(query.outer_projection.contains(&alias));
    }
}

#[test]
fn test_column_mapping_missing_alias() {
    let composer = simple_entity_composer();
    let unknown = PropertyPath::root("simple_entity").scalar("nickname", "nickname");

    assert_eq!(
        composer.column_mapping().column(&unknown),
        Err(AliasError::MissingAlias {
            path: "nickname".to_string()
        })
    );
}

#[test]
fn test_nested_references_stay_out_of_projection() {
    let yaml = r#"
aggregates:
  - name: PurchaseOrder
    table: purchase_order
    id:
      property: id
      column: order_id
    properties:
      - name: customer
    references:
      - name: items
        table: order_item
        collection: list
        key_column: item_index
        properties:
          - name: product
"#;
    let config = AggregateSchemaConfig::from_yaml_str(yaml).unwrap();
    let composer = QueryComposer::new(
        Arc::new(config.aggregate("PurchaseOrder").unwrap()),
        Arc::new(PostgresDialect),
    );

    let query = parse_aggregate_query(&composer.find_by_id().unwrap());
    assert_eq!(
        query.outer_projection,
        vec!["rn_purchase_order_1", "c_order_id_2", "c_customer_3"]
    );
    assert_eq!(query.inner_table, "\"purchase_order\"");
}

#[test]
fn test_clickhouse_rendering() {
    let config = AggregateSchemaConfig::from_yaml_str(SIMPLE_ENTITY_YAML).unwrap();
    let composer = QueryComposer::new(
        Arc::new(config.aggregate("SimpleEntity").unwrap()),
        Arc::new(ClickHouseDialect),
    );

    assert_eq!(
        composer.find_by_id().unwrap(),
        "SELECT rn_simple_entity_1, c_id_2, c_name_3 FROM (SELECT 1 AS rn_simple_entity_1, \
         `simple_entity`.`id` AS c_id_2, `simple_entity`.`name` AS c_name_3 \
         FROM `simple_entity` WHERE `simple_entity`.`id` = $id) AS t_simple_entity_4"
    );
}

#[test]
fn test_concurrent_generation_converges() {
    let composer = Arc::new(simple_entity_composer());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let composer = Arc::clone(&composer);
            std::thread::spawn(move || match i % 3 {
                0 => composer.find_all().unwrap(),
                1 => composer.find_by_id().unwrap(),
                _ => composer.find_all_by_id().unwrap(),
            })
        })
        .collect();

    let projections: std::collections::HashSet<Vec<String>> = handles
        .into_iter()
        .map(|h| parse_aggregate_query(&h.join().unwrap()).outer_projection)
        .collect();
    assert_eq!(projections.len(), 1);
    assert_eq!(composer.alias_registry().len(), 4);
}
