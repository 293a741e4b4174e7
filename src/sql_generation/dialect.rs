//! SQL dialects.
//!
//! A dialect decides how identifiers are quoted and how named parameters are
//! written. The statement tree itself is dialect-free.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::errors::RenderError;

pub trait Dialect: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn identifier_quote(&self) -> char;

    /// Bind marker for a named parameter, e.g. `:id`
    fn bind_marker(&self, name: &str) -> String;

    fn quote_identifier(&self, identifier: &str) -> Result<String, RenderError> {
        let quote = self.identifier_quote();
        if identifier.is_empty() || identifier.contains(quote) {
            return Err(RenderError::IllegalIdentifier {
                identifier: identifier.to_string(),
                dialect: self.name(),
            });
        }
        Ok(format!("{quote}{identifier}{quote}"))
    }

    /// Keyword placed between an inline view and its alias
    fn inline_view_alias_keyword(&self) -> Option<&'static str> {
        None
    }
}

/// PostgreSQL with JDBC-style named parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn identifier_quote(&self) -> char {
        '"'
    }

    fn bind_marker(&self, name: &str) -> String {
        format!(":{name}")
    }
}

/// ClickHouse, using the `$param` placeholders substituted before execution
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickHouseDialect;

impl Dialect for ClickHouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn bind_marker(&self, name: &str) -> String {
        format!("${name}")
    }

    fn inline_view_alias_keyword(&self) -> Option<&'static str> {
        Some("AS")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Postgres,
    ClickHouse,
}

impl DialectKind {
    pub fn dialect(&self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::Postgres => Arc::new(PostgresDialect),
            DialectKind::ClickHouse => Arc::new(ClickHouseDialect),
        }
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DialectKind::Postgres),
            "clickhouse" => Ok(DialectKind::ClickHouse),
            other => Err(format!(
                "unknown dialect '{other}' (expected postgres or clickhouse)"
            )),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialectKind::Postgres => write!(f, "postgres"),
            DialectKind::ClickHouse => write!(f, "clickhouse"),
        }
    }
}
