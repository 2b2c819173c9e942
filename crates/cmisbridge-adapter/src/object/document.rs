//! Document adapter: the check-out/check-in/cancel state machine over the
//! store's native versioning primitive.

use std::ops::Deref;

use tracing::info;

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::{AttributeValue, ContentData, VersionRecord};
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{Properties, VersionState};

use crate::convert;
use crate::object::{CmisObject, ObjectKind};

/// What a cancelled check-out resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The prior stable version was restored; PWC edits are discarded.
    Restored,
    /// The series existed only as a never-checked-in working copy, so the
    /// whole document was removed.
    SeriesDeleted,
}

/// Adapter over a document node.
#[derive(Debug, Clone)]
pub struct DocumentAdapter {
    object: CmisObject,
}

impl Deref for DocumentAdapter {
    type Target = CmisObject;

    fn deref(&self) -> &Self::Target {
        &self.object
    }
}

impl DocumentAdapter {
    pub(crate) fn new(object: CmisObject) -> Self {
        Self { object }
    }

    /// The underlying base adapter.
    pub fn as_object(&self) -> &CmisObject {
        &self.object
    }

    /// Unwrap into the base adapter.
    pub fn into_object(self) -> CmisObject {
        self.object
    }

    /// Current state of the version series.
    pub async fn state(&self) -> CmisResult<VersionState> {
        self.object.version_state().await
    }

    /// Check the document out, making the live node the private working
    /// copy. At most one PWC exists per version series.
    pub async fn checkout(&self) -> CmisResult<()> {
        match self.state().await? {
            VersionState::Unversioned => Err(CmisError::versioning(format!(
                "Document '{}' is not versionable",
                self.object_id()
            ))),
            VersionState::CheckedOut => Err(CmisError::versioning(format!(
                "Document '{}' is already checked out",
                self.object_id()
            ))),
            VersionState::CheckedIn => {
                self.repo.store.checkout(self.id()).await?;
                self.repo.store.save().await?;
                info!(object = %self.object_id(), "Checked out");
                Ok(())
            }
        }
    }

    /// Check the private working copy in, producing a new version. A
    /// property overlay, when supplied, is compiled with update semantics
    /// before the commit.
    pub async fn checkin(
        &self,
        comment: Option<&str>,
        properties: Option<&Properties>,
        major: bool,
    ) -> CmisResult<VersionRecord> {
        if self.state().await? != VersionState::CheckedOut {
            return Err(CmisError::versioning(format!(
                "Document '{}' is not checked out",
                self.object_id()
            )));
        }

        if let Some(props) = properties {
            if !props.is_empty() {
                let type_id = self.type_id().await?;
                let mut writes = self.repo.compiler.compile_update(&type_id, props)?;
                writes.push((
                    convert::attribute_key(property_ids::LAST_MODIFIED_BY),
                    AttributeValue::String(self.repo.ctx.user.clone()),
                ));
                self.repo.store.set_attributes(self.id(), writes).await?;
            }
        }

        let record = self
            .repo
            .store
            .checkin(self.id(), comment, major, &self.repo.ctx.user)
            .await?;
        self.repo.store.save().await?;
        info!(object = %self.object_id(), label = %record.label, "Checked in");
        Ok(record)
    }

    /// Cancel an in-progress check-out, discarding the working copy's
    /// edits. A series that was never checked in has no stable version to
    /// restore, so the whole document is removed instead.
    pub async fn cancel_checkout(&self) -> CmisResult<CancelOutcome> {
        if self.state().await? != VersionState::CheckedOut {
            return Err(CmisError::versioning(format!(
                "Document '{}' is not checked out",
                self.object_id()
            )));
        }
        let outcome = if self.repo.store.version_count(self.id()).await? == 0 {
            self.repo.store.remove_node(self.id()).await?;
            CancelOutcome::SeriesDeleted
        } else {
            self.repo.store.cancel_checkout(self.id()).await?;
            CancelOutcome::Restored
        };
        self.repo.store.save().await?;
        info!(object = %self.object_id(), ?outcome, "Cancelled checkout");
        Ok(outcome)
    }

    /// The ordered version history, oldest first.
    pub async fn versions(&self) -> CmisResult<Vec<VersionRecord>> {
        self.repo.store.versions(self.id()).await
    }

    /// Read the bound content stream.
    pub async fn content(&self) -> CmisResult<ContentData> {
        self.repo.store.content(self.id()).await
    }

    /// Replace the content stream. A checked-in versionable document must
    /// be checked out first.
    pub async fn set_content(&self, content: ContentData) -> CmisResult<()> {
        if self.state().await? == VersionState::CheckedIn {
            return Err(CmisError::versioning(format!(
                "Document '{}' must be checked out before its content can change",
                self.object_id()
            )));
        }
        self.repo.store.set_content(self.id(), content).await?;
        self.repo.store.save().await?;
        Ok(())
    }
}

/// Document-variant delete.
///
/// Deleting the PWC cancels the check-out (removing the document entirely
/// when the series was never checked in). Deleting a version-addressed
/// object without the all-versions flag removes just that version.
/// Everything else removes the node, and with it the whole series.
pub(crate) async fn delete_document(
    object: &CmisObject,
    all_versions: bool,
    is_pwc: bool,
) -> CmisResult<()> {
    debug_assert_eq!(object.kind(), ObjectKind::Document);
    if is_pwc {
        if object.version_state().await? != VersionState::CheckedOut {
            return Err(CmisError::versioning(format!(
                "Object '{}' is not a private working copy",
                object.object_id()
            )));
        }
        if object.repo.store.version_count(object.id()).await? == 0 {
            object.repo.store.remove_node(object.id()).await?;
        } else {
            object.repo.store.cancel_checkout(object.id()).await?;
        }
        object.repo.store.save().await?;
        info!(object = %object.object_id(), "Deleted private working copy");
        return Ok(());
    }

    if !all_versions {
        if let Some(label) = &object.version_label {
            object.repo.store.remove_version(object.id(), label).await?;
            object.repo.store.save().await?;
            info!(object = %object.object_id(), label, "Deleted single version");
            return Ok(());
        }
    }

    object.base_delete().await
}
