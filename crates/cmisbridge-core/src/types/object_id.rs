//! Protocol-visible object ids.
//!
//! Object ids are derived from native node identities, optionally composed
//! with a version-label marker. The repository root always reports the
//! reserved [`ROOT_OBJECT_ID`]: the store's root node id is an
//! implementation artifact that must not leak into the protocol-visible id
//! space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CmisError;
use crate::types::id::NodeId;

/// The reserved, store-independent id of the repository root folder.
pub const ROOT_OBJECT_ID: &str = "[root]";

/// Separator between a node id and a version-label marker.
const VERSION_SEPARATOR: char = ';';

/// A protocol-visible object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ObjectId {
    /// The repository root folder.
    Root,
    /// A live node (folder, document, or PWC).
    Node(NodeId),
    /// A specific version of a document, addressed by version label.
    Version(NodeId, String),
}

impl ObjectId {
    /// The native node identity behind this object id, if the id does not
    /// denote the root.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::Root => None,
            Self::Node(id) | Self::Version(id, _) => Some(id),
        }
    }

    /// The version-label marker, if this id addresses a single version.
    pub fn version_label(&self) -> Option<&str> {
        match self {
            Self::Version(_, label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "{ROOT_OBJECT_ID}"),
            Self::Node(id) => write!(f, "{id}"),
            Self::Version(id, label) => write!(f, "{id}{VERSION_SEPARATOR}{label}"),
        }
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}

impl FromStr for ObjectId {
    type Err = CmisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ROOT_OBJECT_ID {
            return Ok(Self::Root);
        }
        let (node_part, label) = match s.split_once(VERSION_SEPARATOR) {
            Some((node, label)) if !label.is_empty() => (node, Some(label)),
            Some(_) => {
                return Err(CmisError::invalid_argument(format!(
                    "Object id '{s}' has an empty version marker"
                )));
            }
            None => (s, None),
        };
        let node = NodeId::from_str(node_part).map_err(|e| {
            CmisError::with_source(
                crate::error::ErrorKind::InvalidArgument,
                format!("Object id '{s}' is not a valid id"),
                e,
            )
        })?;
        Ok(match label {
            Some(label) => Self::Version(node, label.to_string()),
            None => Self::Node(node),
        })
    }
}

impl TryFrom<String> for ObjectId {
    type Error = CmisError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
