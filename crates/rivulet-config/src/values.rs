//! Conversions between textual literals and connector payloads.
//!
//! Patch files and command-line overrides only speak a handful of payload
//! types: `f64` numbers, `bool` flags, `String` text and `Vec<f64>` lists.
//! Integers are widened to `f64` because the reference modules are numeric.

use std::fmt;

use rivulet_core::Value;
use serde::Serialize;

/// Converts a TOML value to a payload.
///
/// Returns a description of the problem for unsupported shapes (tables,
/// datetimes, mixed arrays).
pub fn value_from_toml(value: &toml::Value) -> Result<Value, String> {
    match value {
        toml::Value::Float(f) => Ok(Value::new(*f)),
        toml::Value::Integer(i) => Ok(Value::new(*i as f64)),
        toml::Value::Boolean(b) => Ok(Value::new(*b)),
        toml::Value::String(s) => Ok(Value::new(s.clone())),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                toml::Value::Float(f) => Ok(*f),
                toml::Value::Integer(i) => Ok(*i as f64),
                other => Err(format!("lists must hold numbers, found {}", other.type_str())),
            })
            .collect::<Result<Vec<f64>, String>>()
            .map(Value::new),
        other => Err(format!("unsupported {} value", other.type_str())),
    }
}

/// Parses a command-line literal.
///
/// Numbers become `f64`, `true`/`false` become `bool`, a bracketed
/// comma-separated list becomes `Vec<f64>`, anything else is kept as text.
pub fn parse_literal(text: &str) -> Value {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        return Value::new(n);
    }
    match trimmed {
        "true" => return Value::new(true),
        "false" => return Value::new(false),
        _ => {}
    }
    if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let items: Result<Vec<f64>, _> = inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<f64>)
            .collect();
        if let Ok(items) = items {
            return Value::new(items);
        }
    }
    Value::new(trimmed.to_string())
}

/// A payload rendered for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadingValue {
    /// `f64` payload.
    Number(f64),
    /// `u64` payload.
    Count(u64),
    /// `Vec<f64>` payload.
    List(Vec<f64>),
    /// `String` payload.
    Text(String),
    /// `bool` payload.
    Flag(bool),
    /// Any other payload, reported by type name.
    Opaque {
        /// Rust type name of the payload.
        opaque: &'static str,
    },
}

impl From<&Value> for ReadingValue {
    fn from(value: &Value) -> Self {
        if let Some(n) = value.downcast_ref::<f64>() {
            ReadingValue::Number(*n)
        } else if let Some(n) = value.downcast_ref::<u64>() {
            ReadingValue::Count(*n)
        } else if let Some(list) = value.downcast_ref::<Vec<f64>>() {
            ReadingValue::List(list.clone())
        } else if let Some(s) = value.downcast_ref::<String>() {
            ReadingValue::Text(s.clone())
        } else if let Some(b) = value.downcast_ref::<bool>() {
            ReadingValue::Flag(*b)
        } else {
            ReadingValue::Opaque {
                opaque: value.type_name(),
            }
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Number(n) => write!(f, "{n}"),
            ReadingValue::Count(n) => write!(f, "{n}"),
            ReadingValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            ReadingValue::Text(s) => write!(f, "{s:?}"),
            ReadingValue::Flag(b) => write!(f, "{b}"),
            ReadingValue::Opaque { opaque } => write!(f, "<{opaque}>"),
        }
    }
}

/// One output read back from a built patch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Connector reference as written in the patch (`module.Connector`).
    pub target: String,
    /// Payload read.
    pub value: ReadingValue,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_numbers_widen_to_f64() {
        let v = value_from_toml(&toml::Value::Integer(3)).unwrap();
        assert_eq!(v.cloned::<f64>(), Some(3.0));
        let v = value_from_toml(&toml::Value::Float(0.5)).unwrap();
        assert_eq!(v.cloned::<f64>(), Some(0.5));
    }

    #[test]
    fn toml_lists_must_be_numeric() {
        let list = toml::Value::Array(vec![toml::Value::Integer(1), toml::Value::Float(2.5)]);
        let v = value_from_toml(&list).unwrap();
        assert_eq!(v.cloned::<Vec<f64>>(), Some(vec![1.0, 2.5]));

        let mixed = toml::Value::Array(vec![toml::Value::String("x".into())]);
        let err = value_from_toml(&mixed).unwrap_err();
        assert!(err.contains("numbers"), "got: {err}");
    }

    #[test]
    fn toml_tables_are_rejected() {
        let table = toml::Value::Table(toml::map::Map::new());
        assert!(value_from_toml(&table).is_err());
    }

    #[test]
    fn literals() {
        assert_eq!(parse_literal("2.5").cloned::<f64>(), Some(2.5));
        assert_eq!(parse_literal(" -4 ").cloned::<f64>(), Some(-4.0));
        assert_eq!(parse_literal("true").cloned::<bool>(), Some(true));
        assert_eq!(
            parse_literal("[1, 2,3]").cloned::<Vec<f64>>(),
            Some(vec![1.0, 2.0, 3.0])
        );
        assert_eq!(parse_literal("[]").cloned::<Vec<f64>>(), Some(vec![]));
        assert_eq!(
            parse_literal("[a, b]").cloned::<String>(),
            Some("[a, b]".to_string())
        );
        assert_eq!(parse_literal("hello").cloned::<String>(), Some("hello".to_string()));
    }

    #[test]
    fn readings_render() {
        let reading = Reading {
            target: "sum.GetTerms".into(),
            value: ReadingValue::from(&Value::new(vec![1.0, 2.5])),
        };
        assert_eq!(reading.to_string(), "sum.GetTerms = [1, 2.5]");

        let opaque = ReadingValue::from(&Value::new(7_i32));
        assert_eq!(opaque.to_string(), "<i32>");
        assert_eq!(ReadingValue::from(&Value::new(3_u64)), ReadingValue::Count(3));
    }

    #[test]
    fn readings_serialize_untagged() {
        let reading = Reading {
            target: "acc.GetCount".into(),
            value: ReadingValue::Count(2),
        };
        let json = serde_json::to_string(&reading).unwrap();
        assert_eq!(json, r#"{"target":"acc.GetCount","value":2}"#);
    }
}
