//! Shared CMIS object-model types.

pub mod actions;
pub mod id;
pub mod object_id;
pub mod property;
pub mod property_ids;
pub mod typedef;
pub mod versioning;

pub use actions::{Action, AllowableActions};
pub use id::NodeId;
pub use object_id::{ObjectId, ROOT_OBJECT_ID};
pub use property::{Properties, PropertyData, PropertyKind, PropertyValue};
pub use typedef::{BaseType, Cardinality, PropertyDefinition, TypeDefinition, Updatability};
pub use versioning::{VersionState, VersioningState};
