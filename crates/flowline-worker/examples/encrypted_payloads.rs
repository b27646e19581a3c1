//! Encrypted Payloads Example - Seal and open a payload batch offline
//!
//! Builds a codec chain with a locally generated key (no backend needed) and
//! walks a typed activity argument through the whole pipeline: serialize to a
//! payload, seal it, inspect the wire form, open it, deserialize it back.
//!
//! Run with: cargo run -p flowline-worker --example encrypted_payloads

use std::sync::Arc;

use flowline_codec::{
    AsJsonPayload, CodecChain, EncryptionCodec, FromJsonPayload, InMemorySecretStore, PayloadCodec,
    SecretKey,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct ApproveInvoice {
    task_id: String,
    amount_cents: u64,
    approved: bool,
}

fn main() -> anyhow::Result<()> {
    println!("=== Encrypted Payloads (flowline-codec) ===\n");

    // 1. Key material - in production this comes from the KMS at startup
    let store = InMemorySecretStore::single("local-demo-key", SecretKey::generate());
    let chain = CodecChain::new(vec![Arc::new(EncryptionCodec::new(Arc::new(store)))]);

    // 2. A typed activity argument becomes a json/plain payload
    let request = ApproveInvoice {
        task_id: "task-42".to_string(),
        amount_cents: 125_000,
        approved: true,
    };
    let payload = request.as_json_payload()?;
    println!("plain:     {} bytes, metadata {:?}", payload.data.len(), {
        let mut keys: Vec<_> = payload.metadata.keys().collect();
        keys.sort();
        keys
    });

    // 3. Outbound: the wire only ever sees the sealed form
    let wire = chain.encode(vec![payload])?;
    println!(
        "sealed:    {} bytes, encoding {:?}, key id {:?}",
        wire[0].data.len(),
        wire[0].metadata_utf8("encoding"),
        wire[0].metadata_utf8("encryption-key-id"),
    );

    // 4. Inbound: decode restores the payload exactly, then the typed value
    let decoded = chain.decode(wire)?;
    let restored = ApproveInvoice::from_json_payload(&decoded[0])?;
    println!("restored:  {restored:?}");
    assert_eq!(restored, request);

    println!("\nround trip ok");
    Ok(())
}
