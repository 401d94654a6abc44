// src/convert/types.rs

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Boolean,
    DateTime,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown column type `{0}` (expected integer, float, text, boolean or datetime)")]
pub struct ParseColumnTypeError(pub String);

impl FromStr for ColumnType {
    type Err = ParseColumnTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integer" | "int" => Ok(ColumnType::Integer),
            "float" => Ok(ColumnType::Float),
            "text" | "string" => Ok(ColumnType::Text),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "datetime" | "date" => Ok(ColumnType::DateTime),
            _ => Err(ParseColumnTypeError(s.to_string())),
        }
    }
}

/// A field converted to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    /// An empty field in a non-text column
    Null,
}

/// One field that did not parse as its column's type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("row {row}, column `{column}`: `{value}` is not a valid {ty}")]
pub struct ConversionFailure {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub ty: ColumnType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_names() {
        assert_eq!("INT".parse::<ColumnType>(), Ok(ColumnType::Integer));
        assert_eq!(" bool ".parse::<ColumnType>(), Ok(ColumnType::Boolean));
        assert_eq!("datetime".parse::<ColumnType>(), Ok(ColumnType::DateTime));
        assert_eq!(
            "blob".parse::<ColumnType>(),
            Err(ParseColumnTypeError("blob".into()))
        );
        assert_eq!(ColumnType::Float.to_string(), "float");
    }

    #[test]
    fn column_type_from_yaml() {
        let ty: ColumnType = serde_yaml::from_str("boolean").expect("valid type");
        assert_eq!(ty, ColumnType::Boolean);
    }

    #[test]
    fn values_serialize_untagged() {
        let values = vec![
            Value::Integer(3),
            Value::Float(1.5),
            Value::Text("x".into()),
            Value::Boolean(false),
            Value::Null,
        ];
        assert_eq!(
            serde_json::to_string(&values).expect("serializable"),
            r#"[3,1.5,"x",false,null]"#
        );
    }
}
