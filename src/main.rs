use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use aggregate_sql::config::{CliConfig, GeneratorConfig};
use aggregate_sql::mapping::AggregateSchemaConfig;
use aggregate_sql::sql_generation::{DialectKind, QueryComposer};

/// aggsql - print the single-statement SQL that loads an aggregate
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Aggregate name as declared in the schema file
    aggregate: Option<String>,

    /// Which statement to print
    #[arg(long, value_enum, default_value_t = Statement::All)]
    query: Statement,

    /// Aggregate schema YAML file (falls back to AGGSQL_SCHEMA)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Target dialect: postgres or clickhouse (falls back to AGGSQL_DIALECT)
    #[arg(long)]
    dialect: Option<DialectKind>,

    /// Generator settings YAML file, used instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,

    /// List the aggregates of the schema file and exit
    #[arg(long)]
    list: bool,

    /// Log generated statements at info level
    #[arg(long)]
    log_sql: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Statement {
    All,
    ById,
    ByIds,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        CliConfig {
            dialect: cli.dialect,
            schema_path: cli.schema.clone(),
            log_sql: cli.log_sql,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger - defaults to WARN level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GeneratorConfig::from_env().context("reading AGGSQL_* environment")?,
    };
    config.merge(CliConfig::from(&cli));

    let schema_path = config
        .schema_path
        .clone()
        .context("no schema file given (use --schema or AGGSQL_SCHEMA)")?;
    let schemas = AggregateSchemaConfig::from_yaml_file(&schema_path)
        .with_context(|| format!("loading schema {}", schema_path.display()))?;

    if cli.list {
        for name in schemas.aggregate_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let aggregate = cli
        .aggregate
        .as_deref()
        .context("no aggregate given (use --list to see the available ones)")?;
    let schema = schemas.aggregate(aggregate)?;

    let composer = QueryComposer::new(Arc::new(schema), config.dialect.dialect());
    let sql = match cli.query {
        Statement::All => composer.find_all()?,
        Statement::ById => composer.find_by_id()?,
        Statement::ByIds => composer.find_all_by_id()?,
    };

    if config.log_sql {
        log::info!("{} {:?} for '{}': {}", config.dialect, cli.query, aggregate, sql);
    }
    println!("{sql}");
    Ok(())
}
