//! Type and property definitions.
//!
//! Definitions are immutable schema: they are loaded once when the
//! repository is initialized and never mutated at runtime.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::property::{PropertyKind, PropertyValue};

/// The CMIS base type an object type derives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    /// cmis:folder and its subtypes.
    Folder,
    /// cmis:document and its subtypes.
    Document,
}

impl BaseType {
    /// The protocol-defined id of the base type itself.
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::Folder => "cmis:folder",
            Self::Document => "cmis:document",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_id())
    }
}

/// When a property may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Updatability {
    /// Never writable by a caller; the repository synthesizes the value.
    ReadOnly,
    /// Writable at creation and on update.
    ReadWrite,
    /// Writable only when the object is created.
    OnCreate,
}

/// Single- or multi-valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// At most one value.
    Single,
    /// An ordered list of values.
    Multi,
}

/// Schema for one property of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// The protocol-defined property id. Lookups are case-sensitive and
    /// keyed by this id, never by display name.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// The value data type.
    pub kind: PropertyKind,
    /// Single- or multi-valued.
    pub cardinality: Cardinality,
    /// When the property may be written.
    pub updatability: Updatability,
    /// Whether a value must be present after creation.
    pub required: bool,
    /// Default values supplied when a required property is omitted.
    pub default_value: Option<Vec<PropertyValue>>,
}

impl PropertyDefinition {
    /// A single-valued, read-write, optional property with no default.
    pub fn new(id: impl Into<String>, kind: PropertyKind) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            kind,
            cardinality: Cardinality::Single,
            updatability: Updatability::ReadWrite,
            required: false,
            default_value: None,
        }
    }

    /// Mark the property read-only.
    pub fn readonly(mut self) -> Self {
        self.updatability = Updatability::ReadOnly;
        self
    }

    /// Mark the property writable only at creation time.
    pub fn on_create(mut self) -> Self {
        self.updatability = Updatability::OnCreate;
        self
    }

    /// Mark the property required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the property multi-valued.
    pub fn multi(mut self) -> Self {
        self.cardinality = Cardinality::Multi;
        self
    }

    /// Attach a default value.
    pub fn with_default(mut self, values: Vec<PropertyValue>) -> Self {
        self.default_value = Some(values);
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

/// Immutable schema for an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// The protocol-defined type id.
    pub id: String,
    /// The base type this type derives from.
    pub base: BaseType,
    /// Human-readable name.
    pub display_name: String,
    /// Free-form description.
    pub description: String,
    /// Whether documents of this type participate in versioning.
    /// Always `false` for folder types.
    pub versionable: bool,
    /// Property schema keyed by property id.
    pub property_definitions: BTreeMap<String, PropertyDefinition>,
}

impl TypeDefinition {
    /// Create a definition with no properties.
    pub fn new(id: impl Into<String>, base: BaseType) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            base,
            description: String::new(),
            versionable: false,
            property_definitions: BTreeMap::new(),
        }
    }

    /// Builder-style property registration.
    pub fn with_property(mut self, def: PropertyDefinition) -> Self {
        self.property_definitions.insert(def.id.clone(), def);
        self
    }

    /// Mark documents of this type versionable.
    pub fn versionable(mut self, versionable: bool) -> Self {
        self.versionable = versionable;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Look up one property definition by id (case-sensitive).
    pub fn property(&self, id: &str) -> Option<&PropertyDefinition> {
        self.property_definitions.get(id)
    }
}
