use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::sql_generation::DialectKind;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Generator configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Target SQL dialect
    #[serde(default)]
    pub dialect: DialectKind,

    /// Aggregate schema YAML file
    #[serde(default)]
    #[validate(custom(function = "validate_schema_path"))]
    pub schema_path: Option<PathBuf>,

    /// Whether executed statements are logged at info level
    #[serde(default)]
    pub log_sql: bool,
}

fn validate_schema_path(path: &PathBuf) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        let mut error = ValidationError::new("empty_schema_path");
        error.message = Some("Schema path cannot be empty".into());
        return Err(error);
    }
    Ok(())
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Postgres,
            schema_path: None,
            log_sql: false,
        }
    }
}

impl GeneratorConfig {
    /// Create configuration from environment variables with validation.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            dialect: parse_env_var("AGGSQL_DIALECT", "postgres")?,
            schema_path: env::var("AGGSQL_SCHEMA").ok().map(PathBuf::from),
            log_sql: parse_env_var("AGGSQL_LOG_SQL", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with CLI values; only settings given on the command line override
    pub fn merge(&mut self, other: CliConfig) {
        if let Some(dialect) = other.dialect {
            self.dialect = dialect;
        }
        if other.schema_path.is_some() {
            self.schema_path = other.schema_path;
        }
        self.log_sql |= other.log_sql;
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    /// `None` when the dialect was not given on the command line
    pub dialect: Option<DialectKind>,
    pub schema_path: Option<PathBuf>,
    pub log_sql: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Parse {
        field: key.to_string(),
        source: e.to_string().into(),
        value,
    })
}
