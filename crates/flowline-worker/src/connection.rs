// Worker assembly
// Decision: One connection object owns the REST client and the codec chain;
// the execution runtime takes both from here at registration time

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use flowline_codec::{CodecChain, EncryptionCodec};
use flowline_rest::RestClient;

use crate::activities::RestTaskActivities;
use crate::config::WorkerProperties;
use crate::keys::load_secret_store;

/// Assembled worker-side plumbing: REST client, payload codec chain and the
/// activity facades built over them.
pub struct WorkerConnection {
    properties: WorkerProperties,
    rest_client: RestClient,
    payload_codec: Arc<CodecChain>,
}

impl WorkerConnection {
    /// Build the connection: construct the client, prefetch encryption keys
    /// and assemble the codec chain.
    pub async fn connect(properties: WorkerProperties) -> Result<Self> {
        let rest_client = RestClient::builder()
            .endpoint(&properties.endpoint)
            .application_id(&properties.application_id)
            .token(&properties.token)
            .build()
            .context("building the REST client")?;

        let payload_codec = match load_secret_store(&rest_client, &properties.encryption).await? {
            Some(store) => {
                info!("Payload encryption enabled");
                CodecChain::new(vec![Arc::new(EncryptionCodec::new(Arc::new(store)))])
            }
            None => {
                warn!("Payload encryption disabled; payloads cross the boundary in plain form");
                CodecChain::empty()
            }
        };

        Ok(Self {
            properties,
            rest_client,
            payload_codec: Arc::new(payload_codec),
        })
    }

    pub fn properties(&self) -> &WorkerProperties {
        &self.properties
    }

    pub fn rest_client(&self) -> &RestClient {
        &self.rest_client
    }

    /// Codec chain to hand to the execution runtime. Shared, immutable.
    pub fn payload_codec(&self) -> Arc<CodecChain> {
        Arc::clone(&self.payload_codec)
    }

    /// REST-backed task activities ready for registration with the runtime.
    pub fn task_activities(&self) -> RestTaskActivities {
        RestTaskActivities::new(self.rest_client.clone())
    }
}

impl fmt::Debug for WorkerConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Properties redact the token themselves; the REST client is elided
        f.debug_struct("WorkerConnection")
            .field("properties", &self.properties)
            .field("codec_steps", &self.payload_codec.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_reports_the_chain_without_credentials() {
        let properties =
            WorkerProperties::new("https://api.flowline.example.com", "app-7f3a", "s3cret")
                .unwrap();
        let rest_client = RestClient::builder()
            .endpoint(&properties.endpoint)
            .application_id(&properties.application_id)
            .token(&properties.token)
            .build()
            .unwrap();
        let connection = WorkerConnection {
            properties,
            rest_client,
            payload_codec: Arc::new(CodecChain::empty()),
        };

        let rendered = format!("{connection:?}");
        assert!(rendered.contains("codec_steps: 0"));
        assert!(!rendered.contains("s3cret"));
    }
}
