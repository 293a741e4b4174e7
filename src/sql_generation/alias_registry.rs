//! Alias registry for single-query aggregate loading.
//!
//! Every path that shows up in generated SQL gets a name derived from its
//! table or column name, stripped to word characters, lower-cased, prefixed by
//! role and suffixed with a per-registry counter:
//!
//! - `t_simple_entity_4`: table alias of an entity path
//! - `c_name_3`: column alias of a scalar path
//! - `k_item_index_5`: key column of a list/map element
//! - `rn_simple_entity_1`: row-sequence column of an entity path
//!
//! The counter makes names unique even when two natural names sanitize to the
//! same string. Names are memoized per (role, path), so asking twice returns
//! the same string and consumes no counter value.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;

use super::errors::AliasError;
use crate::mapping::PropertyPath;

/// Anything outside `[0-9A-Za-z_]` is dropped from natural names
static NON_WORD_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_]").expect("static regex is valid"));

/// Cache namespaces. The same path can hold one alias per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AliasRole {
    /// `t_` or `c_` depending on the path classification
    Path,
    RowSequence,
    Key,
}

#[derive(Debug, Default)]
struct RegistryState {
    aliases: HashMap<(AliasRole, PropertyPath), String>,
    counter: u64,
}

/// Assigns and remembers the aliases of one aggregate's statements
#[derive(Debug, Default)]
pub struct AliasRegistry {
    state: Mutex<RegistryState>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table alias for entity paths, column alias for scalar paths
    pub fn assign(&self, path: &PropertyPath) -> String {
        let prefix = if path.is_entity() { "t_" } else { "c_" };
        self.assign_in(AliasRole::Path, path, prefix, path.natural_name())
    }

    /// Alias of the synthetic row-sequence column of an entity path
    pub fn assign_row_sequence(&self, path: &PropertyPath) -> String {
        self.assign_in(AliasRole::RowSequence, path, "rn_", path.natural_name())
    }

    /// Alias of the key column of a list or map element.
    ///
    /// Returns `None` when the path is not qualified by a collection key.
    pub fn assign_key(&self, path: &PropertyPath) -> Option<String> {
        let key_column = path.key_column()?;
        Some(self.assign_in(AliasRole::Key, path, "k_", key_column))
    }

    /// Previously assigned table or column alias, without assigning one
    pub fn lookup(&self, path: &PropertyPath) -> Result<String, AliasError> {
        self.cached(AliasRole::Path, path)
            .ok_or_else(|| AliasError::MissingAlias {
                path: path.to_string(),
            })
    }

    pub fn key_alias(&self, path: &PropertyPath) -> Option<String> {
        self.cached(AliasRole::Key, path)
    }

    /// Number of aliases handed out so far
    pub fn len(&self) -> usize {
        self.lock().aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, role: AliasRole, path: &PropertyPath) -> Option<String> {
        self.lock().aliases.get(&(role, path.clone())).cloned()
    }

    // Lookup, counter increment and insert happen under one lock.
    fn assign_in(
        &self,
        role: AliasRole,
        path: &PropertyPath,
        prefix: &str,
        natural_name: &str,
    ) -> String {
        let mut state = self.lock();
        if let Some(alias) = state.aliases.get(&(role, path.clone())) {
            return alias.clone();
        }

        state.counter += 1;
        let alias = format!("{prefix}{}_{}", sanitize(natural_name), state.counter);
        log::debug!("Assigned alias '{}' to path `{}` ({:?})", alias, path, role);
        state.aliases.insert((role, path.clone()), alias.clone());
        alias
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Strip every non-word character and lower-case the rest
pub fn sanitize(name: &str) -> String {
    NON_WORD_CHARACTERS.replace_all(name, "").to_lowercase()
}
