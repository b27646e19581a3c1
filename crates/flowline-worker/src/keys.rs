// Encryption key prefetch
//
// Key material lives in the backend's KMS. The worker fetches every
// configured key once at startup and hands the codec an immutable in-memory
// store, so the encode/decode hot path never waits on the network. Key
// rotation is a restart concern.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;

use flowline_codec::{InMemorySecretStore, SecretKey};
use flowline_rest::RestClient;

use crate::config::EncryptionProperties;

/// Fetch every configured key and build the store the encryption codec reads
/// from. Returns `None` when encryption is not configured.
pub async fn load_secret_store(
    client: &RestClient,
    encryption: &EncryptionProperties,
) -> Result<Option<InMemorySecretStore>> {
    let Some(default_key_id) = &encryption.default_key_id else {
        return Ok(None);
    };

    let mut keys = HashMap::with_capacity(encryption.key_ids.len());
    for key_id in &encryption.key_ids {
        let kms_key = client
            .kms()
            .retrieve_kms_key(key_id)
            .await
            .with_context(|| format!("fetching encryption key '{key_id}'"))?;
        let secret = SecretKey::new(kms_key.value)
            .with_context(|| format!("key '{key_id}' has unusable material"))?;
        keys.insert(kms_key.id, secret);
    }
    info!(
        count = keys.len(),
        default_key_id = %default_key_id,
        "Loaded encryption keys"
    );

    let store = InMemorySecretStore::new(default_key_id.clone(), keys)
        .context("building the secret store")?;
    Ok(Some(store))
}
