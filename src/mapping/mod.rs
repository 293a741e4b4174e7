//! Aggregate mapping metadata.
//!
//! Turns aggregate definitions (YAML) into the tree of property paths the SQL
//! generator consumes. The generator itself only sees the [`AggregateMapping`]
//! trait, so any other metadata source can stand in for the YAML catalog.

pub mod config;
pub mod errors;
pub mod path;
pub mod schema;

pub use config::{AggregateSchemaConfig, CollectionKind};
pub use errors::MappingError;
pub use path::{PathKind, PropertyPath};
pub use schema::{AggregateMapping, AggregateSchema, IdProperty, IdType};
