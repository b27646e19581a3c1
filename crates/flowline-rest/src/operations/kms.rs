// Key-management operations
//
// Workers fetch their payload-encryption keys here once at startup; the codec
// itself never talks to this endpoint.

use std::sync::Arc;

use crate::client::ClientCore;
use crate::error::Result;
use crate::models::KmsKey;

/// Operations over the key-management resource.
pub struct KmsOperations {
    core: Arc<ClientCore>,
}

impl KmsOperations {
    pub(crate) fn new(core: Arc<ClientCore>) -> Self {
        Self { core }
    }

    /// Fetch the key material for one key id.
    pub async fn retrieve_kms_key(&self, key_id: &str) -> Result<KmsKey> {
        self.core
            .get_json(&format!("/kms/keys/{key_id}"), &[])
            .await
    }
}
