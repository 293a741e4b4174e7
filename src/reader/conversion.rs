//! Identifier coercion before binding.
//!
//! Callers hand identifiers over as JSON values. They are coerced to the
//! declared id type of the aggregate so the bound parameter matches the column.

use serde_json::Value;
use uuid::Uuid;

use super::errors::ConversionError;
use crate::mapping::IdType;

pub trait IdentifierConverter: Send + Sync {
    fn convert(&self, value: &Value, id_type: IdType) -> Result<Value, ConversionError>;
}

/// Accepts numbers or numeric strings for integer ids, any scalar for string
/// ids, and any UUID notation (normalized to lower-case hyphenated form).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdentifierConverter;

impl IdentifierConverter for DefaultIdentifierConverter {
    fn convert(&self, value: &Value, id_type: IdType) -> Result<Value, ConversionError> {
        match id_type {
            IdType::Int64 => to_i64(value).map(Value::from),
            IdType::UInt64 => to_u64(value).map(Value::from),
            IdType::String => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                _ => Err(unsupported(value, id_type)),
            },
            IdType::Uuid => match value {
                Value::String(s) => Uuid::parse_str(s)
                    .map(|uuid| Value::String(uuid.hyphenated().to_string()))
                    .map_err(|e| invalid(s, id_type, e.to_string())),
                _ => Err(unsupported(value, id_type)),
            },
        }
    }
}

fn to_i64(value: &Value) -> Result<i64, ConversionError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| invalid(&n.to_string(), IdType::Int64, "out of range")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(s, IdType::Int64, e.to_string())),
        _ => Err(unsupported(value, IdType::Int64)),
    }
}

fn to_u64(value: &Value) -> Result<u64, ConversionError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| invalid(&n.to_string(), IdType::UInt64, "negative or fractional")),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(s, IdType::UInt64, e.to_string())),
        _ => Err(unsupported(value, IdType::UInt64)),
    }
}

fn unsupported(value: &Value, id_type: IdType) -> ConversionError {
    ConversionError::Unsupported {
        value: value.to_string(),
        id_type,
    }
}

fn invalid(value: &str, id_type: IdType, reason: impl Into<String>) -> ConversionError {
    ConversionError::Invalid {
        value: value.to_string(),
        id_type,
        reason: reason.into(),
    }
}
