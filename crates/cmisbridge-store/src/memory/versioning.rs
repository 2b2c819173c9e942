//! Native versioning primitive for the in-memory store.
//!
//! A versionable node owns one history. Check-in freezes the live node
//! state (attributes and content) into a snapshot; cancel restores the
//! latest snapshot. The live node itself is the private working copy while
//! the history is checked out.

use std::collections::BTreeMap;

use chrono::Utc;

use cmisbridge_core::traits::{AttributeValue, ContentData, VersionRecord};

/// A frozen version: record plus the node state captured at check-in.
#[derive(Debug, Clone)]
pub(crate) struct VersionSnapshot {
    pub record: VersionRecord,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub content: Option<ContentData>,
}

/// The version history owned by one versionable node.
#[derive(Debug, Clone)]
pub(crate) struct VersionHistory {
    /// Checked-in versions, oldest first.
    pub versions: Vec<VersionSnapshot>,
    /// Whether the live node is currently the private working copy.
    pub checked_out: bool,
    major: u32,
    minor: u32,
}

impl VersionHistory {
    /// History for a freshly created versionable node: no versions yet,
    /// the live node is the initial private working copy.
    pub fn new_checked_out() -> Self {
        Self {
            versions: Vec::new(),
            checked_out: true,
            major: 0,
            minor: 0,
        }
    }

    /// History for a node that enters versioning in a stable state, e.g.
    /// the target of a subtree copy.
    pub fn new_checked_in() -> Self {
        Self {
            checked_out: false,
            ..Self::new_checked_out()
        }
    }

    /// Freeze the given node state as the next version.
    pub fn commit(
        &mut self,
        comment: Option<&str>,
        major: bool,
        created_by: &str,
        attributes: BTreeMap<String, AttributeValue>,
        content: Option<ContentData>,
    ) -> VersionRecord {
        if major {
            self.major += 1;
            self.minor = 0;
        } else {
            self.minor += 1;
        }
        let record = VersionRecord {
            label: format!("{}.{}", self.major, self.minor),
            major,
            comment: comment.map(String::from),
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        };
        self.versions.push(VersionSnapshot {
            record: record.clone(),
            attributes,
            content,
        });
        self.checked_out = false;
        record
    }

    /// The snapshot to restore on cancel, if one exists.
    pub fn latest(&self) -> Option<&VersionSnapshot> {
        self.versions.last()
    }
}
