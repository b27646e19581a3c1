// Principal operations

use std::sync::Arc;

use uuid::Uuid;

use crate::client::ClientCore;
use crate::error::Result;
use crate::models::Principal;

/// Operations over the principal resource.
pub struct PrincipalOperations {
    core: Arc<ClientCore>,
}

impl PrincipalOperations {
    pub(crate) fn new(core: Arc<ClientCore>) -> Self {
        Self { core }
    }

    /// Fetch one principal by id.
    pub async fn retrieve_principal(&self, id: Uuid) -> Result<Principal> {
        self.core.get_json(&format!("/principals/{id}"), &[]).await
    }
}
