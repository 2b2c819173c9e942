//! CMIS property values and property bags.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The data type of a property as declared by its definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Free-form string.
    String,
    /// Opaque identifier string.
    Id,
    /// Signed 64-bit integer.
    Integer,
    /// Floating-point decimal.
    Decimal,
    /// Boolean.
    Boolean,
    /// UTC timestamp.
    DateTime,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Id => write!(f, "id"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
            Self::Boolean => write!(f, "boolean"),
            Self::DateTime => write!(f, "datetime"),
        }
    }
}

/// A single CMIS property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    /// Free-form string.
    String(String),
    /// Opaque identifier string.
    Id(String),
    /// Signed 64-bit integer.
    Integer(i64),
    /// Floating-point decimal.
    Decimal(f64),
    /// Boolean.
    Boolean(bool),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
}

impl PropertyValue {
    /// The declared kind this value satisfies.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::String(_) => PropertyKind::String,
            Self::Id(_) => PropertyKind::Id,
            Self::Integer(_) => PropertyKind::Integer,
            Self::Decimal(_) => PropertyKind::Decimal,
            Self::Boolean(_) => PropertyKind::Boolean,
            Self::DateTime(_) => PropertyKind::DateTime,
        }
    }

    /// Return the string content for `String` and `Id` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Id(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Id(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::DateTime(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// A property id together with its (possibly multi-valued) values.
///
/// An instance with zero values is "explicitly empty", a caller-visible
/// state distinct from the property being absent from the bag. Unset is
/// propagated via omission, never via an empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyData {
    /// The protocol-defined property id.
    pub id: String,
    /// Ordered values.
    pub values: Vec<PropertyValue>,
}

impl PropertyData {
    /// Create a single-valued property.
    pub fn single(id: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            id: id.into(),
            values: vec![value],
        }
    }

    /// Create a multi-valued property.
    pub fn multi(id: impl Into<String>, values: Vec<PropertyValue>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    /// Create an explicitly empty property (present, no values).
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Vec::new(),
        }
    }

    /// Whether the property holds no value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&PropertyValue> {
        self.values.first()
    }

    /// The first value as a string, for `String` and `Id` properties.
    pub fn first_string(&self) -> Option<&str> {
        self.first().and_then(PropertyValue::as_str)
    }
}

/// A property bag keyed by property id.
///
/// Iteration order is the lexicographic order of property ids, so
/// validation failures are deterministic for any given input set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    entries: BTreeMap<String, PropertyData>,
}

impl Properties {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value for the same id.
    pub fn insert(&mut self, property: PropertyData) {
        self.entries.insert(property.id.clone(), property);
    }

    /// Builder-style insert of a single string property.
    pub fn with_string(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        let id = id.into();
        self.insert(PropertyData::single(
            id,
            PropertyValue::String(value.into()),
        ));
        self
    }

    /// Builder-style insert of a single id property.
    pub fn with_id(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        let id = id.into();
        self.insert(PropertyData::single(id, PropertyValue::Id(value.into())));
        self
    }

    /// Builder-style insert of a single integer property.
    pub fn with_integer(mut self, id: impl Into<String>, value: i64) -> Self {
        let id = id.into();
        self.insert(PropertyData::single(id, PropertyValue::Integer(value)));
        self
    }

    /// Builder-style insert of a single boolean property.
    pub fn with_boolean(mut self, id: impl Into<String>, value: bool) -> Self {
        let id = id.into();
        self.insert(PropertyData::single(id, PropertyValue::Boolean(value)));
        self
    }

    /// Look up a property by id.
    pub fn get(&self, id: &str) -> Option<&PropertyData> {
        self.entries.get(id)
    }

    /// Remove a property by id.
    pub fn remove(&mut self, id: &str) -> Option<PropertyData> {
        self.entries.remove(id)
    }

    /// Whether a property with the given id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The first string value of a property, if present.
    pub fn string_value(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(PropertyData::first_string)
    }

    /// Iterate over the properties in id order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyData> {
        self.entries.values()
    }

    /// Number of properties in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
