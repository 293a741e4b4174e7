use super::dialect::Dialect;
use super::errors::RenderError;
use super::render_expr::{Literal, Operator, OperatorApplication, PropertyAccess, RenderExpr};
use super::statement::{Relation, SelectItem, SelectItems};

pub trait ToSql {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError>;
}

/// Render a complete statement. The top relation must be a projection.
pub fn render_statement(
    statement: &Relation,
    dialect: &dyn Dialect,
) -> Result<String, RenderError> {
    let sql = statement.to_sql(dialect)?;
    log::debug!("Rendered {} SQL: {}", dialect.name(), sql);
    Ok(sql)
}

impl ToSql for Relation {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError> {
        match self {
            Relation::Projected { input, select } => {
                let mut sql = select.to_sql(dialect)?;
                sql.push_str(" FROM ");
                sql.push_str(&render_source(input, dialect)?);
                Ok(sql)
            }
            other => Err(RenderError::UnsupportedConstruct {
                dialect: dialect.name(),
                construct: format!("{} outside of a SELECT", relation_kind(other)),
            }),
        }
    }
}

/// Render a relation in FROM position (including a trailing WHERE)
fn render_source(relation: &Relation, dialect: &dyn Dialect) -> Result<String, RenderError> {
    match relation {
        Relation::Table(table) => dialect.quote_identifier(&table.name),
        Relation::Filtered { input, condition } => Ok(format!(
            "{} WHERE {}",
            render_source(input, dialect)?,
            condition.to_sql(dialect)?
        )),
        Relation::Named { input, alias } => {
            let source = match input.as_ref() {
                Relation::Table(table) => dialect.quote_identifier(&table.name)?,
                Relation::Projected { .. } => format!("({})", input.to_sql(dialect)?),
                other => {
                    return Err(RenderError::UnsupportedConstruct {
                        dialect: dialect.name(),
                        construct: format!("named {}", relation_kind(other)),
                    })
                }
            };
            Ok(match dialect.inline_view_alias_keyword() {
                Some(keyword) => format!("{source} {keyword} {}", alias.0),
                None => format!("{source} {}", alias.0),
            })
        }
        Relation::Projected { .. } => Err(RenderError::UnsupportedConstruct {
            dialect: dialect.name(),
            construct: "unnamed sub-select".to_string(),
        }),
    }
}

fn relation_kind(relation: &Relation) -> &'static str {
    match relation {
        Relation::Table(_) => "table",
        Relation::Filtered { .. } => "filtered relation",
        Relation::Named { .. } => "named relation",
        Relation::Projected { .. } => "projection",
    }
}

impl ToSql for SelectItems {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError> {
        if self.items.is_empty() {
            return Err(RenderError::MissingSelectItems);
        }

        let items = self
            .items
            .iter()
            .map(|item| item.to_sql(dialect))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("SELECT {}", items.join(", ")))
    }
}

impl ToSql for SelectItem {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError> {
        let expression = self.expression.to_sql(dialect)?;
        // Aliases are generated from word characters only and stay unquoted
        Ok(match &self.col_alias {
            Some(alias) => format!("{expression} AS {}", alias.0),
            None => expression,
        })
    }
}

impl ToSql for RenderExpr {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError> {
        match self {
            RenderExpr::Literal(literal) => Ok(literal.to_sql()),
            RenderExpr::ColumnAlias(alias) => Ok(alias.0.clone()),
            RenderExpr::PropertyAccessExp(access) => access.to_sql(dialect),
            RenderExpr::Parameter(name) => Ok(dialect.bind_marker(name)),
            RenderExpr::List(items) => {
                let rendered = items
                    .iter()
                    .map(|item| item.to_sql(dialect))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", rendered.join(", ")))
            }
            RenderExpr::OperatorApplicationExp(op) => op.to_sql(dialect),
        }
    }
}

impl ToSql for PropertyAccess {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError> {
        Ok(format!(
            "{}.{}",
            dialect.quote_identifier(&self.table_alias.0)?,
            dialect.quote_identifier(&self.column)?
        ))
    }
}

impl Literal {
    fn to_sql(&self) -> String {
        match self {
            Literal::Integer(i) => i.to_string(),
        }
    }
}

impl ToSql for OperatorApplication {
    fn to_sql(&self, dialect: &dyn Dialect) -> Result<String, RenderError> {
        fn op_str(o: Operator) -> &'static str {
            match o {
                Operator::Equal => "=",
                Operator::In => "IN",
            }
        }

        let rendered = self
            .operands
            .iter()
            .map(|operand| operand.to_sql(dialect))
            .collect::<Result<Vec<_>, _>>()?;
        let sql_op = op_str(self.operator);

        match rendered.as_slice() {
            [left, right] => Ok(format!("{left} {sql_op} {right}")),
            _ => Err(RenderError::UnsupportedConstruct {
                dialect: dialect.name(),
                construct: format!("{sql_op} with {} operands", rendered.len()),
            }),
        }
    }
}
