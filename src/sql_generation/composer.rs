//! Builds the single-statement SELECT that loads an aggregate.
//!
//! All three entry points share [`QueryComposer::build`]; they differ only in
//! the predicate attached to the inner selection.

use std::sync::Arc;

use super::alias_registry::AliasRegistry;
use super::column_mapping::AliasColumnMapping;
use super::dialect::Dialect;
use super::errors::SqlGenerationError;
use super::render_expr::{Literal, RenderExpr};
use super::statement::{Relation, SelectItem};
use super::to_sql::render_statement;
use crate::mapping::{AggregateMapping, PropertyPath};

/// Bind parameter carrying the identifier of `find_by_id`
pub const ID_PARAMETER: &str = "id";

/// Bind parameter carrying the identifier collection of `find_all_by_id`
pub const IDS_PARAMETER: &str = "ids";

/// Generates SQL for one aggregate type.
///
/// Owns the alias registry of that type, so aliases stay the same across
/// repeated calls. Safe to share between threads.
#[derive(Clone)]
pub struct QueryComposer {
    mapping: Arc<dyn AggregateMapping>,
    dialect: Arc<dyn Dialect>,
    aliases: Arc<AliasRegistry>,
}

/// One column of the inner selection and its re-projection outside
struct ProjectedColumn {
    expression: RenderExpr,
    alias: String,
}

impl QueryComposer {
    pub fn new(mapping: Arc<dyn AggregateMapping>, dialect: Arc<dyn Dialect>) -> Self {
        QueryComposer {
            mapping,
            dialect,
            aliases: Arc::new(AliasRegistry::new()),
        }
    }

    pub fn mapping(&self) -> &dyn AggregateMapping {
        self.mapping.as_ref()
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn alias_registry(&self) -> &Arc<AliasRegistry> {
        &self.aliases
    }

    /// Read-only column lookup for whoever turns rows back into aggregates
    pub fn column_mapping(&self) -> AliasColumnMapping {
        AliasColumnMapping::new(Arc::clone(&self.aliases))
    }

    /// Every row of the root table
    pub fn find_all(&self) -> Result<String, SqlGenerationError> {
        self.render(self.build(None))
    }

    /// The row whose identifier equals the `:id` parameter
    pub fn find_by_id(&self) -> Result<String, SqlGenerationError> {
        let predicate = RenderExpr::equal(
            self.id_column()?,
            RenderExpr::parameter(ID_PARAMETER),
        );
        self.render(self.build(Some(predicate)))
    }

    /// Rows whose identifier is contained in the `:ids` collection parameter
    pub fn find_all_by_id(&self) -> Result<String, SqlGenerationError> {
        let predicate = RenderExpr::is_in(
            self.id_column()?,
            vec![RenderExpr::parameter(IDS_PARAMETER)],
        );
        self.render(self.build(Some(predicate)))
    }

    /// Compose the statement tree, with `predicate` as the inner WHERE clause.
    pub fn build(&self, predicate: Option<RenderExpr>) -> Relation {
        let root = self.mapping.root_path();
        let table = root.table_name();

        let row_sequence = self.aliases.assign_row_sequence(root);
        let columns = self.projected_columns();
        let table_alias = self.aliases.assign(root);

        let mut inner_items = Vec::with_capacity(columns.len() + 1);
        let mut outer_items = Vec::with_capacity(columns.len() + 1);

        inner_items.push(SelectItem::aliased(
            RenderExpr::Literal(Literal::Integer(1)),
            row_sequence.clone(),
        ));
        outer_items.push(SelectItem::bare(RenderExpr::alias(row_sequence)));

        for column in columns {
            inner_items.push(SelectItem::aliased(column.expression, column.alias.clone()));
            outer_items.push(SelectItem::bare(RenderExpr::alias(column.alias)));
        }

        log::debug!(
            "Composing '{}' over table '{}' as {} with {} columns (filtered: {})",
            self.mapping.name(),
            table,
            table_alias,
            outer_items.len(),
            predicate.is_some()
        );

        Relation::table(table)
            .filter_opt(predicate)
            .project(inner_items)
            .named(table_alias)
            .project(outer_items)
    }

    fn projected_columns(&self) -> Vec<ProjectedColumn> {
        self.mapping
            .persistent_paths()
            .iter()
            .filter(|path| self.is_projected(path))
            .filter_map(|path| {
                let column = path.column_name()?;
                Some(ProjectedColumn {
                    expression: RenderExpr::column(path.table_name(), column),
                    alias: self.aliases.assign(path),
                })
            })
            .collect()
    }

    // Only scalars stored on the root table are selected for now. Nested
    // entities need joined sub-relations keyed by their row-sequence aliases.
    fn is_projected(&self, path: &PropertyPath) -> bool {
        if path.is_entity() {
            return false;
        }
        if !path.is_top_level() {
            log::debug!(
                "Path `{}` of '{}' lives in nested table '{}' and is not projected",
                path,
                self.mapping.name(),
                path.table_name()
            );
            return false;
        }
        true
    }

    fn id_column(&self) -> Result<RenderExpr, SqlGenerationError> {
        let id = self
            .mapping
            .id_property()
            .ok_or_else(|| SqlGenerationError::MissingIdProperty(self.mapping.name().to_string()))?;
        Ok(RenderExpr::column(self.mapping.table_name(), id.column()))
    }

    fn render(&self, statement: Relation) -> Result<String, SqlGenerationError> {
        Ok(render_statement(&statement, self.dialect.as_ref())?)
    }
}

impl std::fmt::Debug for QueryComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryComposer")
            .field("aggregate", &self.mapping.name())
            .field("dialect", &self.dialect.name())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}
