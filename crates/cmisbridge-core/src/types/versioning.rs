//! Versioning enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Creation-time directive controlling the initial version-history shape
/// of a new document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningState {
    /// No versioning; the document maps to a single node with no history.
    None,
    /// Create and immediately check in as a major version.
    Major,
    /// Create and immediately check in as a minor version.
    Minor,
    /// Create and leave checked out; the new document is the PWC.
    CheckedOut,
}

impl fmt::Display for VersioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::CheckedOut => write!(f, "checkedout"),
        }
    }
}

/// The versioning state a document is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionState {
    /// Non-versionable; no state machine applies.
    Unversioned,
    /// Stable version, no private working copy exists.
    CheckedIn,
    /// A private working copy exists and is owned by the series.
    CheckedOut,
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unversioned => write!(f, "unversioned"),
            Self::CheckedIn => write!(f, "checked-in"),
            Self::CheckedOut => write!(f, "checked-out"),
        }
    }
}
