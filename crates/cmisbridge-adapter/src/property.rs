//! Property compilation: CMIS property sets to native attribute writes and
//! back.
//!
//! Compilation validates everything *before* the first store write, so a
//! constraint failure leaves the node untouched. The all-or-nothing
//! guarantee does not depend on store-side rollback.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::{AttributeValue, NodeRecord};
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{
    BaseType, Properties, PropertyData, PropertyValue, Updatability, VersionState,
};

use crate::convert;
use crate::type_manager::TypeManager;

/// A validated batch of native attribute writes.
pub type AttributeWrites = Vec<(String, AttributeValue)>;

/// Whether a compilation serves object creation or a later update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompileMode {
    /// Creation: on-create properties are writable and required
    /// properties are backfilled from definition defaults.
    Create,
    /// Update or copy-overlay: only read-write properties may be set and
    /// no backfill runs.
    Update,
}

/// Versioning facts needed to synthesize document properties.
#[derive(Debug, Clone)]
pub struct VersionFacts {
    /// Current state of the version series.
    pub state: VersionState,
    /// Label of the addressed version, if any.
    pub label: Option<String>,
    /// Comment attached to the addressed version.
    pub checkin_comment: Option<String>,
    /// Whether the addressed version is the latest one.
    pub is_latest: bool,
}

/// Content facts needed to synthesize document properties.
#[derive(Debug, Clone)]
pub struct ContentFacts {
    /// Stream length in bytes.
    pub length: u64,
    /// MIME type, if known.
    pub mime_type: Option<String>,
}

/// Everything the extraction direction needs besides the raw attributes.
#[derive(Debug, Clone)]
pub struct ExtractFacts<'a> {
    /// The wrapped node.
    pub node: &'a NodeRecord,
    /// Protocol-visible object id.
    pub object_id: String,
    /// Resolved type id.
    pub type_id: &'a str,
    /// CMIS logical path (folders only).
    pub cmis_path: Option<String>,
    /// Parent object id; absent for the root.
    pub parent_object_id: Option<String>,
    /// Versioning facts (documents only).
    pub version: Option<VersionFacts>,
    /// Content facts (documents only).
    pub content: Option<ContentFacts>,
}

/// Validates and converts CMIS property sets against the type schema.
#[derive(Debug, Clone)]
pub struct PropertyCompiler {
    types: Arc<TypeManager>,
}

impl PropertyCompiler {
    /// Create a compiler over the shared type registry.
    pub fn new(types: Arc<TypeManager>) -> Self {
        Self { types }
    }

    /// Compile a creation-time property set: apply the supplied
    /// properties, then backfill required properties from definition
    /// defaults. Required properties with neither a value nor a default
    /// fail the whole compilation.
    pub fn compile_create(
        &self,
        type_id: &str,
        properties: &Properties,
    ) -> CmisResult<AttributeWrites> {
        self.compile(type_id, properties, CompileMode::Create)
    }

    /// Compile an update-time property set: supplied properties only,
    /// read-write updatability required, no backfill.
    pub fn compile_update(
        &self,
        type_id: &str,
        properties: &Properties,
    ) -> CmisResult<AttributeWrites> {
        self.compile(type_id, properties, CompileMode::Update)
    }

    fn compile(
        &self,
        type_id: &str,
        properties: &Properties,
        mode: CompileMode,
    ) -> CmisResult<AttributeWrites> {
        let type_def = self.types.resolve(type_id)?;

        let mut writes = AttributeWrites::new();
        let mut added: BTreeSet<&str> = BTreeSet::new();

        // First pass: validate and convert every supplied property,
        // failing fast on the first violation.
        for prop in properties.iter() {
            let def = type_def.property(&prop.id).ok_or_else(|| {
                CmisError::constraint(format!("Property '{}' is unknown!", prop.id))
            })?;

            // The type id selects the type; it is consumed, not written.
            if def.id == property_ids::OBJECT_TYPE_ID {
                added.insert(def.id.as_str());
                continue;
            }

            match (mode, def.updatability) {
                (_, Updatability::ReadOnly) => {
                    return Err(CmisError::constraint(format!(
                        "Property '{}' is readonly!",
                        prop.id
                    )));
                }
                (CompileMode::Update, Updatability::OnCreate) => {
                    return Err(CmisError::constraint(format!(
                        "Property '{}' can only be set at creation time!",
                        prop.id
                    )));
                }
                _ => {}
            }

            // Unset is propagated via omission, never via an empty value.
            if prop.is_empty() {
                return Err(CmisError::constraint(format!(
                    "Property '{}' must not be empty!",
                    prop.id
                )));
            }

            writes.push((
                convert::attribute_key(&def.id),
                convert::to_attribute(def, &prop.values)?,
            ));
            added.insert(def.id.as_str());
        }

        // Second pass (creation only): backfill required properties that
        // carry a definition default; a required property with no default
        // fails the whole compilation.
        if mode == CompileMode::Create {
            for def in type_def.property_definitions.values() {
                if added.contains(def.id.as_str()) || def.updatability == Updatability::ReadOnly
                {
                    continue;
                }
                if let Some(default) = &def.default_value {
                    writes.push((
                        convert::attribute_key(&def.id),
                        convert::to_attribute(def, default)?,
                    ));
                } else if def.required {
                    return Err(CmisError::constraint(format!(
                        "Property '{}' is required!",
                        def.id
                    )));
                }
            }
        }

        Ok(writes)
    }

    /// Extract a CMIS property set from a node: synthesized system
    /// properties first, then stored attributes converted back per their
    /// definitions. A stored value contradicting its definition is a
    /// repository-data error, never silently wrong data.
    pub fn extract(
        &self,
        facts: &ExtractFacts<'_>,
        attributes: &BTreeMap<String, AttributeValue>,
        filter: Option<&BTreeSet<String>>,
    ) -> CmisResult<Properties> {
        let type_def = self.types.resolve(facts.type_id)?;
        let mut result = Properties::new();

        add(&mut result, filter, id_prop(property_ids::OBJECT_ID, &facts.object_id));
        add(
            &mut result,
            filter,
            id_prop(property_ids::OBJECT_TYPE_ID, facts.type_id),
        );
        add(
            &mut result,
            filter,
            id_prop(property_ids::BASE_TYPE_ID, type_def.base.type_id()),
        );
        add(
            &mut result,
            filter,
            PropertyData::single(
                property_ids::NAME,
                PropertyValue::String(facts.node.name.clone()),
            ),
        );
        add(
            &mut result,
            filter,
            PropertyData::single(
                property_ids::CREATION_DATE,
                PropertyValue::DateTime(facts.node.created_at),
            ),
        );
        add(
            &mut result,
            filter,
            PropertyData::single(
                property_ids::LAST_MODIFICATION_DATE,
                PropertyValue::DateTime(facts.node.modified_at),
            ),
        );

        if type_def.base == BaseType::Folder {
            if let Some(path) = &facts.cmis_path {
                add(
                    &mut result,
                    filter,
                    PropertyData::single(
                        property_ids::PATH,
                        PropertyValue::String(path.clone()),
                    ),
                );
            }
            if let Some(parent) = &facts.parent_object_id {
                add(&mut result, filter, id_prop(property_ids::PARENT_ID, parent));
            }
        }

        if let Some(version) = &facts.version {
            add(
                &mut result,
                filter,
                PropertyData::single(
                    property_ids::IS_VERSION_SERIES_CHECKED_OUT,
                    PropertyValue::Boolean(version.state == VersionState::CheckedOut),
                ),
            );
            add(
                &mut result,
                filter,
                PropertyData::single(
                    property_ids::IS_LATEST_VERSION,
                    PropertyValue::Boolean(version.is_latest),
                ),
            );
            if let Some(label) = &version.label {
                add(
                    &mut result,
                    filter,
                    PropertyData::single(
                        property_ids::VERSION_LABEL,
                        PropertyValue::String(label.clone()),
                    ),
                );
            }
            if let Some(comment) = &version.checkin_comment {
                add(
                    &mut result,
                    filter,
                    PropertyData::single(
                        property_ids::CHECKIN_COMMENT,
                        PropertyValue::String(comment.clone()),
                    ),
                );
            }
        }

        if let Some(content) = &facts.content {
            add(
                &mut result,
                filter,
                PropertyData::single(
                    property_ids::CONTENT_STREAM_LENGTH,
                    PropertyValue::Integer(content.length as i64),
                ),
            );
            add(
                &mut result,
                filter,
                PropertyData::single(
                    property_ids::CONTENT_STREAM_FILE_NAME,
                    PropertyValue::String(facts.node.name.clone()),
                ),
            );
            if let Some(mime) = &content.mime_type {
                add(
                    &mut result,
                    filter,
                    PropertyData::single(
                        property_ids::CONTENT_STREAM_MIME_TYPE,
                        PropertyValue::String(mime.clone()),
                    ),
                );
            }
        }

        // Stored attributes, keyed back by definition. Synthesized values
        // win; native attributes with no matching definition are store
        // internals and stay invisible.
        for def in type_def.property_definitions.values() {
            if result.contains(&def.id) {
                continue;
            }
            if let Some(attribute) = attributes.get(&convert::attribute_key(&def.id)) {
                let values = convert::to_property_values(def, attribute)?;
                add(&mut result, filter, PropertyData::multi(def.id.clone(), values));
            }
        }

        Ok(result)
    }
}

fn id_prop(id: &str, value: &str) -> PropertyData {
    PropertyData::single(id, PropertyValue::Id(value.to_string()))
}

fn add(result: &mut Properties, filter: Option<&BTreeSet<String>>, property: PropertyData) {
    let accepted = match filter {
        Some(ids) => ids.contains(&property.id),
        None => true,
    };
    if accepted {
        result.insert(property);
    }
}
