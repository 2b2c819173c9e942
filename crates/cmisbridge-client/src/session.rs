//! Client session.

use std::sync::Arc;

use cmisbridge_core::result::CmisResult;
use cmisbridge_core::types::ROOT_OBJECT_ID;

use crate::binding::Binding;
use crate::object::ClientObject;

/// A client session bound to one repository through a binding.
#[derive(Debug, Clone)]
pub struct Session {
    binding: Arc<dyn Binding>,
}

impl Session {
    /// Open a session over the given binding.
    pub fn new(binding: Arc<dyn Binding>) -> Self {
        Self { binding }
    }

    /// The id of the connected repository.
    pub fn repository_id(&self) -> &str {
        self.binding.repository_id()
    }

    /// The underlying binding.
    pub fn binding(&self) -> &Arc<dyn Binding> {
        &self.binding
    }

    /// Fetch an object by its protocol-visible id.
    pub async fn object(&self, object_id: &str) -> CmisResult<ClientObject> {
        let envelope = self.binding.object_by_id(object_id).await?;
        Ok(ClientObject::new(self.clone(), envelope))
    }

    /// The repository root folder.
    pub async fn root(&self) -> CmisResult<ClientObject> {
        self.object(ROOT_OBJECT_ID).await
    }

    /// The visible children of a folder.
    pub async fn children(&self, folder_id: &str) -> CmisResult<Vec<ClientObject>> {
        let envelopes = self.binding.children(folder_id).await?;
        Ok(envelopes
            .into_iter()
            .map(|envelope| ClientObject::new(self.clone(), envelope))
            .collect())
    }
}
