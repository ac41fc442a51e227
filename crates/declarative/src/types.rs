//! Core types for declarative resource management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A raw or validated attribute value
///
/// Deserializes untagged, so TOML and JSON manifests map directly onto it.
/// Floats are not supported; numeric attributes are integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    String(String),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// View this value as a sequence of elements
    ///
    /// A scalar becomes a one-element slice, mirroring how array-shaped
    /// fields accept a single value.
    pub fn elements(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Short name of the variant, for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Record(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Whether a resource should exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsureState {
    #[default]
    Present,
    Absent,
}

impl EnsureState {
    /// Parse a declared `ensure` value
    pub fn parse(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

impl fmt::Display for EnsureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// What part an attribute plays in reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// Names the resource; exactly one per type
    IdentityKey,
    /// Compared against observed state and converged
    MutableProperty,
    /// Only used at creation time and for dependency hints
    ImmutableParameter,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityKey => write!(f, "identity"),
            Self::MutableProperty => write!(f, "property"),
            Self::ImmutableParameter => write!(f, "parameter"),
        }
    }
}

/// Cardinality of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Scalar,
    OrderedList,
    UnorderedSet,
}

impl ValueShape {
    pub fn is_array(&self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::OrderedList => write!(f, "list"),
            Self::UnorderedSet => write!(f, "set"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Integer(10).to_string(), "10");
        assert_eq!(Value::from("sg-1").to_string(), "sg-1");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");

        let mut record = BTreeMap::new();
        record.insert("device_name".to_string(), Value::from("xvdf"));
        record.insert("volume_size".to_string(), Value::Integer(10));
        assert_eq!(
            Value::Record(record).to_string(),
            "{device_name: xvdf, volume_size: 10}"
        );
    }

    #[test]
    fn test_value_elements() {
        let scalar = Value::from("sg-1");
        assert_eq!(scalar.elements(), &[Value::from("sg-1")]);

        let list = Value::from(vec!["sg-1", "sg-2"]);
        assert_eq!(list.elements().len(), 2);
    }

    #[test]
    fn test_value_deserialize_untagged() {
        let value: Value =
            serde_json::from_str(r#"{"device_name": "xvdf", "volume_size": 10, "encrypted": true}"#)
                .unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record["device_name"], Value::from("xvdf"));
        assert_eq!(record["volume_size"], Value::Integer(10));
        assert_eq!(record["encrypted"], Value::Bool(true));
    }

    #[test]
    fn test_ensure_parse() {
        assert_eq!(
            EnsureState::parse(&Value::from("present")),
            Some(EnsureState::Present)
        );
        assert_eq!(
            EnsureState::parse(&Value::from("absent")),
            Some(EnsureState::Absent)
        );
        assert_eq!(EnsureState::parse(&Value::from("running")), None);
        assert_eq!(EnsureState::parse(&Value::from(true)), None);
    }
}
