use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum RenderExpr {
    Literal(Literal),

    /// Output name of another select item, referenced bare
    ColumnAlias(ColumnAlias),

    /// Table-qualified column, e.g. `"simple_entity"."id"`
    PropertyAccessExp(PropertyAccess),

    /// Named bind parameter, rendered with the dialect's bind marker
    Parameter(String),

    List(Vec<RenderExpr>),

    OperatorApplicationExp(OperatorApplication),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct TableAlias(pub String);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct ColumnAlias(pub String);

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PropertyAccess {
    /// Table name or alias the column is qualified with
    pub table_alias: TableAlias,
    pub column: String,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    In,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OperatorApplication {
    pub operator: Operator,
    pub operands: Vec<RenderExpr>,
}

impl RenderExpr {
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        RenderExpr::PropertyAccessExp(PropertyAccess {
            table_alias: TableAlias(table.into()),
            column: column.into(),
        })
    }

    pub fn alias(alias: impl Into<String>) -> Self {
        RenderExpr::ColumnAlias(ColumnAlias(alias.into()))
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        RenderExpr::Parameter(name.into())
    }

    /// `left = right`
    pub fn equal(left: RenderExpr, right: RenderExpr) -> Self {
        RenderExpr::OperatorApplicationExp(OperatorApplication {
            operator: Operator::Equal,
            operands: vec![left, right],
        })
    }

    /// `expr IN (candidates...)`
    pub fn is_in(expr: RenderExpr, candidates: Vec<RenderExpr>) -> Self {
        RenderExpr::OperatorApplicationExp(OperatorApplication {
            operator: Operator::In,
            operands: vec![expr, RenderExpr::List(candidates)],
        })
    }

    /// Number of conditions in a predicate
    pub fn condition_count(&self) -> usize {
        match self {
            RenderExpr::OperatorApplicationExp(_) => 1,
            _ => 0,
        }
    }
}
