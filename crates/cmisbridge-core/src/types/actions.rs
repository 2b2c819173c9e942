//! Allowable actions: the capability set an object exposes to a caller.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single capability an object may expose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Read the property set.
    CanGetProperties,
    /// Update writable properties.
    CanUpdateProperties,
    /// Delete the object.
    CanDelete,
    /// Re-file the object under another folder.
    CanMoveObject,
    /// Resolve the parent folder of a folder.
    CanGetFolderParent,
    /// Resolve the parents of a fileable object.
    CanGetObjectParents,
    /// Enumerate direct children.
    CanGetChildren,
    /// Enumerate all descendants.
    CanGetDescendants,
    /// Enumerate the folder subtree.
    CanGetFolderTree,
    /// Create a child document.
    CanCreateDocument,
    /// Create a child folder.
    CanCreateFolder,
    /// Delete the whole subtree.
    CanDeleteTree,
    /// Check out the document.
    CanCheckOut,
    /// Check in the private working copy.
    CanCheckIn,
    /// Cancel an in-progress check-out.
    CanCancelCheckOut,
    /// Enumerate the version history.
    CanGetAllVersions,
    /// Read the content stream.
    CanGetContentStream,
    /// Replace the content stream.
    CanSetContentStream,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // camelCase protocol spelling, same as the serde rename.
        let s = match self {
            Self::CanGetProperties => "canGetProperties",
            Self::CanUpdateProperties => "canUpdateProperties",
            Self::CanDelete => "canDelete",
            Self::CanMoveObject => "canMoveObject",
            Self::CanGetFolderParent => "canGetFolderParent",
            Self::CanGetObjectParents => "canGetObjectParents",
            Self::CanGetChildren => "canGetChildren",
            Self::CanGetDescendants => "canGetDescendants",
            Self::CanGetFolderTree => "canGetFolderTree",
            Self::CanCreateDocument => "canCreateDocument",
            Self::CanCreateFolder => "canCreateFolder",
            Self::CanDeleteTree => "canDeleteTree",
            Self::CanCheckOut => "canCheckOut",
            Self::CanCheckIn => "canCheckIn",
            Self::CanCancelCheckOut => "canCancelCheckOut",
            Self::CanGetAllVersions => "canGetAllVersions",
            Self::CanGetContentStream => "canGetContentStream",
            Self::CanSetContentStream => "canSetContentStream",
        };
        write!(f, "{s}")
    }
}

/// The set of actions an object exposes, computed per object state and type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowableActions {
    actions: BTreeSet<Action>,
}

impl AllowableActions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable one action.
    pub fn set(&mut self, action: Action, enabled: bool) {
        if enabled {
            self.actions.insert(action);
        } else {
            self.actions.remove(&action);
        }
    }

    /// Whether the action is enabled.
    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Iterate over the enabled actions in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Number of enabled actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is enabled.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
