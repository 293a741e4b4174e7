//! Property paths from an aggregate root to every reachable property.
//!
//! A path is identified by its step sequence alone: two paths with the same
//! steps are equal and hash alike, whatever metadata they carry. The alias
//! registry relies on that to memoize names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Whether a path names a table or a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    /// Names a table (the root, or a nested entity / collection element)
    Entity,
    /// Names a single column
    Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyPath {
    steps: Vec<String>,
    kind: PathKind,
    /// Table of the entity itself (entity paths) or of the owning entity (scalar paths)
    table_name: String,
    column_name: Option<String>,
    /// Column holding the list index or map key when the path is a collection element
    key_column: Option<String>,
}

impl PropertyPath {
    /// The empty path, naming the aggregate root
    pub fn root(table_name: impl Into<String>) -> Self {
        PropertyPath {
            steps: Vec::new(),
            kind: PathKind::Entity,
            table_name: table_name.into(),
            column_name: None,
            key_column: None,
        }
    }

    /// Extend an entity path by a scalar property stored in `column`
    pub fn scalar(&self, property: impl Into<String>, column: impl Into<String>) -> Self {
        debug_assert!(self.is_entity(), "scalar steps extend entity paths only");
        let mut steps = self.steps.clone();
        steps.push(property.into());
        PropertyPath {
            steps,
            kind: PathKind::Scalar,
            table_name: self.table_name.clone(),
            column_name: Some(column.into()),
            key_column: None,
        }
    }

    /// Extend an entity path by a nested entity stored in `table`.
    ///
    /// `key_column` is set for list and map elements.
    pub fn entity(
        &self,
        property: impl Into<String>,
        table: impl Into<String>,
        key_column: Option<String>,
    ) -> Self {
        debug_assert!(self.is_entity(), "entity steps extend entity paths only");
        let mut steps = self.steps.clone();
        steps.push(property.into());
        PropertyPath {
            steps,
            kind: PathKind::Entity,
            table_name: table.into(),
            column_name: None,
            key_column,
        }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn is_entity(&self) -> bool {
        self.kind == PathKind::Entity
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// True for properties declared directly on the root entity
    pub fn is_top_level(&self) -> bool {
        self.steps.len() == 1
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    pub fn key_column(&self) -> Option<&str> {
        self.key_column.as_deref()
    }

    /// Table name for entity paths, column name for scalar paths
    pub fn natural_name(&self) -> &str {
        match self.kind {
            PathKind::Entity => self.table_name.as_str(),
            PathKind::Scalar => self.column_name.as_deref().unwrap_or(&self.table_name),
        }
    }
}

impl PartialEq for PropertyPath {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl Eq for PropertyPath {}

impl Hash for PropertyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.steps.hash(state);
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            write!(f, "<root {}>", self.table_name)
        } else {
            write!(f, "{}", self.steps.join("."))
        }
    }
}
