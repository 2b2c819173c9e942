//! Type registry.
//!
//! Resolves a type id to its immutable definition. The registry is built
//! once at repository initialization and never mutated afterwards; it is
//! shared across concurrent requests without synchronization.

use std::collections::BTreeMap;

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{
    BaseType, PropertyDefinition, PropertyKind, TypeDefinition,
};

/// Registry of all object types known to the repository.
#[derive(Debug)]
pub struct TypeManager {
    types: BTreeMap<String, TypeDefinition>,
}

impl TypeManager {
    /// Create a registry holding the built-in base types.
    pub fn new() -> Self {
        let mut manager = Self {
            types: BTreeMap::new(),
        };
        manager
            .types
            .insert(BaseType::Folder.type_id().to_string(), folder_definition());
        manager.types.insert(
            BaseType::Document.type_id().to_string(),
            document_definition(),
        );
        manager
    }

    /// Register a custom type. The base's property set is inherited;
    /// explicitly declared properties win over inherited ones.
    pub fn register(&mut self, definition: TypeDefinition) -> CmisResult<()> {
        if self.types.contains_key(&definition.id) {
            return Err(CmisError::constraint(format!(
                "Type '{}' is already registered",
                definition.id
            )));
        }
        if definition.versionable && definition.base != BaseType::Document {
            return Err(CmisError::constraint(format!(
                "Type '{}' is not a document type and cannot be versionable",
                definition.id
            )));
        }
        let mut definition = definition;
        for inherited in base_property_set(definition.base) {
            definition
                .property_definitions
                .entry(inherited.id.clone())
                .or_insert(inherited);
        }
        self.types.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Resolve a type id to its definition. Lookups are case-sensitive and
    /// keyed by the protocol-defined type id.
    pub fn resolve(&self, type_id: &str) -> CmisResult<&TypeDefinition> {
        self.types.get(type_id).ok_or_else(|| {
            CmisError::type_not_found(format!("Type '{type_id}' is unknown!"))
        })
    }

    /// All registered definitions in id order.
    pub fn definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// The registered subtypes of a base type, the base definition excluded.
    pub fn subtypes_of(&self, base: BaseType) -> Vec<&TypeDefinition> {
        self.types
            .values()
            .filter(|def| def.base == base && def.id != base.type_id())
            .collect()
    }
}

impl Default for TypeManager {
    fn default() -> Self {
        Self::new()
    }
}

/// System properties shared by every object type.
fn base_property_set(base: BaseType) -> Vec<PropertyDefinition> {
    let mut defs = vec![
        PropertyDefinition::new(property_ids::OBJECT_ID, PropertyKind::Id)
            .with_display_name("Object Id")
            .readonly(),
        PropertyDefinition::new(property_ids::OBJECT_TYPE_ID, PropertyKind::Id)
            .with_display_name("Type Id")
            .on_create()
            .required(),
        PropertyDefinition::new(property_ids::BASE_TYPE_ID, PropertyKind::Id)
            .with_display_name("Base Type Id")
            .readonly(),
        PropertyDefinition::new(property_ids::NAME, PropertyKind::String)
            .with_display_name("Name")
            .required(),
        PropertyDefinition::new(property_ids::CREATED_BY, PropertyKind::String)
            .with_display_name("Created By")
            .readonly(),
        PropertyDefinition::new(property_ids::CREATION_DATE, PropertyKind::DateTime)
            .with_display_name("Creation Date")
            .readonly(),
        PropertyDefinition::new(property_ids::LAST_MODIFIED_BY, PropertyKind::String)
            .with_display_name("Last Modified By")
            .readonly(),
        PropertyDefinition::new(
            property_ids::LAST_MODIFICATION_DATE,
            PropertyKind::DateTime,
        )
        .with_display_name("Last Modification Date")
        .readonly(),
    ];
    match base {
        BaseType::Folder => {
            defs.push(
                PropertyDefinition::new(property_ids::PATH, PropertyKind::String)
                    .with_display_name("Path")
                    .readonly(),
            );
            defs.push(
                PropertyDefinition::new(property_ids::PARENT_ID, PropertyKind::Id)
                    .with_display_name("Parent Id")
                    .readonly(),
            );
        }
        BaseType::Document => {
            defs.push(
                PropertyDefinition::new(property_ids::IS_LATEST_VERSION, PropertyKind::Boolean)
                    .with_display_name("Is Latest Version")
                    .readonly(),
            );
            defs.push(
                PropertyDefinition::new(property_ids::VERSION_LABEL, PropertyKind::String)
                    .with_display_name("Version Label")
                    .readonly(),
            );
            defs.push(
                PropertyDefinition::new(
                    property_ids::IS_VERSION_SERIES_CHECKED_OUT,
                    PropertyKind::Boolean,
                )
                .with_display_name("Is Version Series Checked Out")
                .readonly(),
            );
            defs.push(
                PropertyDefinition::new(property_ids::CHECKIN_COMMENT, PropertyKind::String)
                    .with_display_name("Checkin Comment")
                    .readonly(),
            );
            defs.push(
                PropertyDefinition::new(
                    property_ids::CONTENT_STREAM_LENGTH,
                    PropertyKind::Integer,
                )
                .with_display_name("Content Stream Length")
                .readonly(),
            );
            defs.push(
                PropertyDefinition::new(
                    property_ids::CONTENT_STREAM_MIME_TYPE,
                    PropertyKind::String,
                )
                .with_display_name("Content Stream MIME Type")
                .readonly(),
            );
            defs.push(
                PropertyDefinition::new(
                    property_ids::CONTENT_STREAM_FILE_NAME,
                    PropertyKind::String,
                )
                .with_display_name("Content Stream File Name")
                .readonly(),
            );
        }
    }
    defs
}

fn folder_definition() -> TypeDefinition {
    let mut def = TypeDefinition::new(BaseType::Folder.type_id(), BaseType::Folder)
        .with_display_name("Folder")
        .with_description("CMIS folder base type");
    for prop in base_property_set(BaseType::Folder) {
        def = def.with_property(prop);
    }
    def
}

fn document_definition() -> TypeDefinition {
    let mut def = TypeDefinition::new(BaseType::Document.type_id(), BaseType::Document)
        .with_display_name("Document")
        .with_description("CMIS document base type")
        .versionable(true);
    for prop in base_property_set(BaseType::Document) {
        def = def.with_property(prop);
    }
    def
}
