//! Traits implemented by pluggable collaborators.

pub mod store;

pub use store::{AttributeValue, ContentData, ContentStore, NodeKind, NodeRecord, VersionRecord};
