//! Node handles and typed property values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Property holding a node's primary type.
pub const PN_PRIMARY_TYPE: &str = "jcr:primaryType";
/// Primary type assumed when a node declares none.
pub const NT_UNSTRUCTURED: &str = "nt:unstructured";

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    Strings(Vec<String>),
}

impl PropertyValue {
    /// Boolean view of the value. Strings `"true"`/`"false"` are coerced the
    /// way a JCR value map coerces them; anything else is `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Long(n) => write!(f, "{}", n),
            Self::Double(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
            Self::Strings(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A snapshot of one repository node: its path, primary type and properties.
///
/// Handles are cheap to build and carry no link back to the repository, so a
/// handle taken before a mutation keeps describing the node as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    path: String,
    primary_type: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl ContentNode {
    pub fn new(
        path: impl Into<String>,
        primary_type: impl Into<String>,
        properties: BTreeMap<String, PropertyValue>,
    ) -> Self {
        Self {
            path: path.into(),
            primary_type: primary_type.into(),
            properties,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The final path segment.
    pub fn name(&self) -> &str {
        crate::path::name(&self.path)
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Read a boolean property, falling back to `default` when it is absent
    /// or not boolean.
    pub fn bool_property(&self, key: &str, default: bool) -> bool {
        self.property(key)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(default)
    }

    /// Read a property as display text, falling back to `default`.
    pub fn string_property(&self, key: &str, default: &str) -> String {
        self.property(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| default.to_string())
    }
}
