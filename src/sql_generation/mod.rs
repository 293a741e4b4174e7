//! SQL generation for single-statement aggregate loading.
//!
//! The composer turns an aggregate mapping into a statement tree, naming every
//! projected value through the alias registry, and renders it for a dialect.

pub mod alias_registry;
pub mod column_mapping;
pub mod composer;
pub mod dialect;
pub mod errors;
pub mod render_expr;
pub mod statement;
pub mod to_sql;

pub use alias_registry::{sanitize, AliasRegistry};
pub use column_mapping::{AliasColumnMapping, PathToColumnMapping};
pub use composer::{QueryComposer, IDS_PARAMETER, ID_PARAMETER};
pub use dialect::{ClickHouseDialect, Dialect, DialectKind, PostgresDialect};
pub use errors::{AliasError, RenderError, SqlGenerationError};
pub use statement::Relation;
pub use to_sql::{render_statement, ToSql};
