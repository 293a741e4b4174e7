//! Read-only view of the alias registry for result extraction.
//!
//! Extractors locate each value in a returned row by alias, never by position.

use std::sync::Arc;

use super::alias_registry::AliasRegistry;
use super::errors::AliasError;
use crate::mapping::PropertyPath;

pub trait PathToColumnMapping: Send + Sync {
    /// Output column holding the value of a scalar path
    fn column(&self, path: &PropertyPath) -> Result<String, AliasError>;

    /// Output column holding the list index or map key of a collection element
    fn key_column(&self, path: &PropertyPath) -> Option<String>;
}

/// Column mapping backed by the composer's alias registry
#[derive(Debug, Clone)]
pub struct AliasColumnMapping {
    registry: Arc<AliasRegistry>,
}

impl AliasColumnMapping {
    pub fn new(registry: Arc<AliasRegistry>) -> Self {
        AliasColumnMapping { registry }
    }
}

impl PathToColumnMapping for AliasColumnMapping {
    fn column(&self, path: &PropertyPath) -> Result<String, AliasError> {
        self.registry.lookup(path)
    }

    fn key_column(&self, path: &PropertyPath) -> Option<String> {
        self.registry.key_alias(path)
    }
}
