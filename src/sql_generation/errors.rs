use thiserror::Error;

/// Failures while rendering a statement tree for a dialect
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    #[error("No Select items.")]
    MissingSelectItems,

    #[error("Identifier '{identifier}' cannot be quoted for {dialect}")]
    IllegalIdentifier {
        identifier: String,
        dialect: &'static str,
    },

    #[error("Unsupported construct for {dialect}: {construct}")]
    UnsupportedConstruct {
        dialect: &'static str,
        construct: String,
    },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AliasError {
    #[error("No alias was assigned for path `{path}`")]
    MissingAlias { path: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlGenerationError {
    #[error("Aggregate '{0}' has no id property")]
    MissingIdProperty(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}
