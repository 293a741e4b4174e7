//! Statement tree for generated SELECTs.
//!
//! A statement is built by stacking relations: a base table, optionally
//! filtered, projected into a select list, and possibly named so it can serve
//! as the source of an enclosing projection:
//!
//! ```text
//! Projected(outer items)
//!   └─ Named(t_simple_entity_4)
//!        └─ Projected(inner items)
//!             └─ Filtered("simple_entity"."id" = :id)
//!                  └─ Table(simple_entity)
//! ```
//!
//! Joined nested collections slot in as further named sub-relations without
//! touching the outer projection.

use serde::{Deserialize, Serialize};

use super::render_expr::{ColumnAlias, RenderExpr, TableAlias};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SelectItem {
    pub expression: RenderExpr,
    pub col_alias: Option<ColumnAlias>,
}

impl SelectItem {
    pub fn aliased(expression: RenderExpr, alias: impl Into<String>) -> Self {
        SelectItem {
            expression,
            col_alias: Some(ColumnAlias(alias.into())),
        }
    }

    pub fn bare(expression: RenderExpr) -> Self {
        SelectItem {
            expression,
            col_alias: None,
        }
    }

    /// Name this item is addressable by in an enclosing query
    pub fn output_name(&self) -> Option<&str> {
        match (&self.col_alias, &self.expression) {
            (Some(alias), _) => Some(alias.0.as_str()),
            (None, RenderExpr::ColumnAlias(alias)) => Some(alias.0.as_str()),
            (None, RenderExpr::PropertyAccessExp(access)) => Some(access.column.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct SelectItems {
    pub items: Vec<SelectItem>,
}

impl SelectItems {
    pub fn output_names(&self) -> Vec<&str> {
        self.items.iter().filter_map(|i| i.output_name()).collect()
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Relation {
    Table(TableRef),
    Filtered {
        input: Box<Relation>,
        condition: RenderExpr,
    },
    /// Sub-relation usable as a FROM source under `alias`
    Named {
        input: Box<Relation>,
        alias: TableAlias,
    },
    Projected {
        input: Box<Relation>,
        select: SelectItems,
    },
}

impl Relation {
    pub fn table(name: impl Into<String>) -> Self {
        Relation::Table(TableRef { name: name.into() })
    }

    pub fn filter(self, condition: RenderExpr) -> Self {
        Relation::Filtered {
            input: Box::new(self),
            condition,
        }
    }

    /// Attach a condition only when one is given
    pub fn filter_opt(self, condition: Option<RenderExpr>) -> Self {
        match condition {
            Some(condition) => self.filter(condition),
            None => self,
        }
    }

    pub fn named(self, alias: impl Into<String>) -> Self {
        Relation::Named {
            input: Box::new(self),
            alias: TableAlias(alias.into()),
        }
    }

    pub fn project(self, items: Vec<SelectItem>) -> Self {
        Relation::Projected {
            input: Box::new(self),
            select: SelectItems { items },
        }
    }

    /// Select list of a projected relation
    pub fn select_items(&self) -> Option<&SelectItems> {
        match self {
            Relation::Projected { select, .. } => Some(select),
            _ => None,
        }
    }

    /// Directly wrapped relation, `None` for a base table
    pub fn input(&self) -> Option<&Relation> {
        match self {
            Relation::Table(_) => None,
            Relation::Filtered { input, .. }
            | Relation::Named { input, .. }
            | Relation::Projected { input, .. } => Some(input.as_ref()),
        }
    }

    /// First filter condition found walking down from this relation,
    /// stopping at named sub-relations
    pub fn condition(&self) -> Option<&RenderExpr> {
        match self {
            Relation::Filtered { condition, .. } => Some(condition),
            Relation::Named { .. } | Relation::Table(_) => None,
            Relation::Projected { input, .. } => input.condition(),
        }
    }

    /// Named sub-relations reachable from this relation, outermost first
    pub fn inline_views(&self) -> Vec<(&TableAlias, &Relation)> {
        let mut views = Vec::new();
        let mut current = Some(self);
        while let Some(relation) = current {
            if let Relation::Named { input, alias } = relation {
                views.push((alias, input.as_ref()));
            }
            current = relation.input();
        }
        views
    }

    /// Base table at the bottom of the relation stack
    pub fn base_table(&self) -> Option<&TableRef> {
        match self {
            Relation::Table(table) => Some(table),
            other => other.input().and_then(|input| input.base_table()),
        }
    }
}
