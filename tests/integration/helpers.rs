//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use cmisbridge_adapter::{FolderAdapter, Repository, TypeManager};
use cmisbridge_core::config::RepositoryConfig;
use cmisbridge_core::types::{
    BaseType, Properties, PropertyDefinition, PropertyKind, PropertyValue, TypeDefinition,
};
use cmisbridge_store::MemoryStore;

/// Build a repository over a fresh in-memory store with the test types
/// registered.
pub async fn build_repository() -> Repository {
    let mut types = TypeManager::new();
    types
        .register(
            TypeDefinition::new("bridge:report", BaseType::Document)
                .with_display_name("Report")
                .versionable(true)
                .with_property(
                    PropertyDefinition::new("bridge:author", PropertyKind::String).required(),
                )
                .with_property(
                    PropertyDefinition::new("bridge:status", PropertyKind::String)
                        .required()
                        .with_default(vec![PropertyValue::String("draft".to_string())]),
                )
                .with_property(PropertyDefinition::new(
                    "bridge:pageCount",
                    PropertyKind::Integer,
                ))
                .with_property(
                    PropertyDefinition::new("bridge:reviewed", PropertyKind::Boolean).readonly(),
                ),
        )
        .expect("register bridge:report");
    types
        .register(TypeDefinition::new("bridge:note", BaseType::Document))
        .expect("register bridge:note");
    types
        .register(
            TypeDefinition::new("bridge:case", BaseType::Folder).with_property(
                PropertyDefinition::new("bridge:label", PropertyKind::String),
            ),
        )
        .expect("register bridge:case");

    Repository::new(
        Arc::new(MemoryStore::new()),
        types,
        &RepositoryConfig::default(),
    )
    .expect("build repository")
}

/// The repository root folder.
pub async fn root(repo: &Repository) -> FolderAdapter {
    repo.root_folder().await.expect("root folder")
}

/// A minimal valid property bag for `bridge:report` documents.
pub fn report_properties(author: &str) -> Properties {
    Properties::new().with_string("bridge:author", author)
}
