//! Aggregate mapping configuration.
//!
//! Aggregates are declared in YAML with the following structure:
//!
//! ```yaml
//! name: shop                     # Optional configuration name
//! aggregates:
//!   - name: PurchaseOrder        # Aggregate root type
//!     table: purchase_order      # Root table
//!     id:
//!       property: id
//!       column: order_id         # Defaults to the property name
//!       type: Int64
//!     properties:
//!       - name: customer
//!       - name: placed_at
//!         column: placed_ts
//!     references:
//!       - name: items            # Nested entity or collection
//!         table: order_item
//!         collection: list       # none | set | list | map
//!         key_column: item_index # Required for list and map
//!         properties:
//!           - name: product
//! ```

use super::errors::MappingError;
use super::schema::{AggregateSchema, IdType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Configuration holding every aggregate a reader can load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSchemaConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub aggregates: Vec<AggregateDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDefinition {
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub id: Option<IdDefinition>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(default)]
    pub references: Vec<ReferenceDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdDefinition {
    pub property: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(rename = "type", default)]
    pub id_type: IdType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(default)]
    pub column: Option<String>,
}

impl PropertyDefinition {
    pub fn column(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

/// How a nested entity is held by its parent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Single nested entity
    #[default]
    None,
    Set,
    List,
    Map,
}

impl CollectionKind {
    /// Lists and maps are qualified by an index or key column
    pub fn is_keyed(&self) -> bool {
        matches!(self, CollectionKind::List | CollectionKind::Map)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDefinition {
    pub name: String,
    pub table: String,
    #[serde(default)]
    pub collection: CollectionKind,
    #[serde(default)]
    pub key_column: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(default)]
    pub references: Vec<ReferenceDefinition>,
}

impl AggregateSchemaConfig {
    /// Load aggregate mappings from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let contents = fs::read_to_string(path).map_err(|e| MappingError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse aggregate mappings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MappingError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| MappingError::ConfigParseError {
                error: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MappingError> {
        if self.aggregates.is_empty() {
            return Err(MappingError::InvalidConfig {
                message: "Mapping must contain at least one aggregate".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for aggregate in &self.aggregates {
            if !seen.insert(&aggregate.name) {
                return Err(MappingError::InvalidConfig {
                    message: format!("Duplicate aggregate name: {}", aggregate.name),
                });
            }
            aggregate.validate()?;
        }
        Ok(())
    }

    pub fn aggregate_names(&self) -> Vec<&str> {
        self.aggregates.iter().map(|a| a.name.as_str()).collect()
    }

    /// Build the path tree for one aggregate
    pub fn aggregate(&self, name: &str) -> Result<AggregateSchema, MappingError> {
        let definition = self
            .aggregates
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| MappingError::UnknownAggregate {
                name: name.to_string(),
            })?;
        AggregateSchema::from_definition(definition)
    }
}

impl AggregateDefinition {
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.table.trim().is_empty() {
            return Err(MappingError::invalid_with_context(
                "Aggregate table name cannot be empty",
                &self.name,
            ));
        }

        let mut names: Vec<&str> = Vec::new();
        if let Some(id) = &self.id {
            names.push(&id.property);
        }
        names.extend(self.properties.iter().map(|p| p.name.as_str()));
        names.extend(self.references.iter().map(|r| r.name.as_str()));
        check_unique(&names, &self.table)?;

        for reference in &self.references {
            reference.validate()?;
        }
        Ok(())
    }
}

impl ReferenceDefinition {
    fn validate(&self) -> Result<(), MappingError> {
        if self.table.trim().is_empty() {
            return Err(MappingError::InvalidConfig {
                message: format!("Reference `{}` has an empty table name", self.name),
            });
        }
        if self.collection.is_keyed() && self.key_column.is_none() {
            return Err(MappingError::MissingKeyColumn {
                reference: self.name.clone(),
                collection: format!("{:?}", self.collection).to_lowercase(),
            });
        }

        let mut names: Vec<&str> = self.properties.iter().map(|p| p.name.as_str()).collect();
        names.extend(self.references.iter().map(|r| r.name.as_str()));
        check_unique(&names, &self.table)?;

        for nested in &self.references {
            nested.validate()?;
        }
        Ok(())
    }
}

fn check_unique(names: &[&str], table: &str) -> Result<(), MappingError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(*name) {
            return Err(MappingError::DuplicateProperty {
                property: name.to_string(),
                table: table.to_string(),
            });
        }
    }
    Ok(())
}
