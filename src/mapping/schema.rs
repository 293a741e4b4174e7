use super::config::{AggregateDefinition, ReferenceDefinition};
use super::errors::MappingError;
use super::path::PropertyPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an aggregate identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdType {
    #[default]
    Int64,
    UInt64,
    String,
    Uuid,
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdType::Int64 => "Int64",
            IdType::UInt64 => "UInt64",
            IdType::String => "String",
            IdType::Uuid => "Uuid",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdProperty {
    pub path: PropertyPath,
    pub id_type: IdType,
}

impl IdProperty {
    pub fn column(&self) -> &str {
        self.path.natural_name()
    }
}

/// What the SQL generator needs to know about an aggregate root type
pub trait AggregateMapping: Send + Sync {
    /// Aggregate type name, used in diagnostics
    fn name(&self) -> &str;

    fn root_path(&self) -> &PropertyPath;

    /// Every path reachable from the root, in traversal order
    fn persistent_paths(&self) -> &[PropertyPath];

    fn id_property(&self) -> Option<&IdProperty>;

    fn table_name(&self) -> &str {
        self.root_path().table_name()
    }
}

/// Path tree of one aggregate, built from its YAML definition
#[derive(Debug, Clone)]
pub struct AggregateSchema {
    name: String,
    root: PropertyPath,
    paths: Vec<PropertyPath>,
    id: Option<IdProperty>,
}

impl AggregateSchema {
    pub fn new(
        name: impl Into<String>,
        root: PropertyPath,
        paths: Vec<PropertyPath>,
        id: Option<IdProperty>,
    ) -> Self {
        AggregateSchema {
            name: name.into(),
            root,
            paths,
            id,
        }
    }

    pub fn from_definition(definition: &AggregateDefinition) -> Result<Self, MappingError> {
        definition.validate()?;

        let root = PropertyPath::root(&definition.table);
        let mut paths = Vec::new();

        let id = definition.id.as_ref().map(|id| {
            let column = id.column.as_deref().unwrap_or(&id.property);
            let path = root.scalar(&id.property, column);
            paths.push(path.clone());
            IdProperty {
                path,
                id_type: id.id_type,
            }
        });

        for property in &definition.properties {
            paths.push(root.scalar(&property.name, property.column()));
        }
        for reference in &definition.references {
            collect_reference_paths(&root, reference, &mut paths);
        }

        log::debug!(
            "Aggregate '{}' maps to {} paths rooted at table '{}'",
            definition.name,
            paths.len(),
            definition.table
        );

        Ok(AggregateSchema::new(&definition.name, root, paths, id))
    }
}

fn collect_reference_paths(
    parent: &PropertyPath,
    reference: &ReferenceDefinition,
    paths: &mut Vec<PropertyPath>,
) {
    let key_column = if reference.collection.is_keyed() {
        reference.key_column.clone()
    } else {
        None
    };
    let entity = parent.entity(&reference.name, &reference.table, key_column);
    paths.push(entity.clone());

    for property in &reference.properties {
        paths.push(entity.scalar(&property.name, property.column()));
    }
    for nested in &reference.references {
        collect_reference_paths(&entity, nested, paths);
    }
}

impl AggregateMapping for AggregateSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn root_path(&self) -> &PropertyPath {
        &self.root
    }

    fn persistent_paths(&self) -> &[PropertyPath] {
        &self.paths
    }

    fn id_property(&self) -> Option<&IdProperty> {
        self.id.as_ref()
    }
}
