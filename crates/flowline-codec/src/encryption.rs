// AES-256-GCM payload encryption codec
//
// Seals the whole payload - metadata included - so encoding markers written
// by earlier codecs survive the round trip untouched. A fresh 96-bit nonce is
// generated per payload and prepended to the ciphertext; the GCM tag makes
// any tampering fail the decode.

use std::collections::HashMap;
use std::sync::Arc;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::codec::PayloadCodec;
use crate::error::{CodecError, Result};
use crate::payload::Payload;
use crate::store::SecretStore;

/// Encoding marker set on payloads produced by [`EncryptionCodec`].
pub const ENCODING_ENCRYPTED: &str = "binary/encrypted?vendor=Flowline";

/// Metadata key naming the cipher a payload was sealed with.
pub const METADATA_KEY_CIPHER: &str = "encryption-cipher";

/// Metadata key naming the key id a payload was sealed with.
pub const METADATA_KEY_KEY_ID: &str = "encryption-key-id";

const CIPHER_AES_256_GCM: &str = "AES-256-GCM";
const NONCE_SIZE: usize = 12;

/// Plaintext envelope sealed by the codec: the entire inbound payload, byte
/// fields base64-armored for the JSON form.
#[derive(Serialize, Deserialize)]
struct SealedPayload {
    metadata: HashMap<String, String>,
    data: String,
}

impl SealedPayload {
    fn seal(payload: &Payload) -> Self {
        Self {
            metadata: payload
                .metadata
                .iter()
                .map(|(key, value)| (key.clone(), BASE64.encode(value)))
                .collect(),
            data: BASE64.encode(&payload.data),
        }
    }

    fn open(self) -> Result<Payload> {
        let mut metadata = HashMap::with_capacity(self.metadata.len());
        for (key, value) in self.metadata {
            let value = BASE64.decode(&value).map_err(|e| {
                CodecError::decoding(format!("invalid base64 in sealed metadata '{key}': {e}"))
            })?;
            metadata.insert(key, value);
        }
        let data = BASE64
            .decode(&self.data)
            .map_err(|e| CodecError::decoding(format!("invalid base64 in sealed body: {e}")))?;
        Ok(Payload { metadata, data })
    }
}

/// Payload codec that encrypts every payload with AES-256-GCM.
///
/// Key material comes from the injected [`SecretStore`]: the store picks the
/// key id for each outbound payload and resolves ids back to keys on the way
/// in, so payloads sealed under rotated-out keys keep decoding as long as the
/// store still knows them.
///
/// Decode rejects payloads that do not carry this codec's marker. An unmarked
/// payload is evidence of corruption, or of bytes this codec never produced,
/// and handing it onward would feed garbage to workflow code.
pub struct EncryptionCodec {
    store: Arc<dyn SecretStore>,
}

impl EncryptionCodec {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    fn encrypt_payload(&self, payload: Payload) -> Result<Payload> {
        let key_id = self
            .store
            .select_key_id(&payload)
            .map_err(|e| CodecError::encoding(e.to_string()))?;
        let key = self
            .store
            .secret_key(&key_id)
            .map_err(|e| CodecError::encoding(e.to_string()))?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CodecError::encoding(format!("cipher init for key '{key_id}': {e}")))?;

        let plaintext = serde_json::to_vec(&SealedPayload::seal(&payload))
            .map_err(|e| CodecError::encoding(format!("payload serialization failed: {e}")))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|e| CodecError::encoding(format!("encryption failed: {e}")))?;

        let mut data = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        data.extend_from_slice(&nonce_bytes);
        data.extend_from_slice(&ciphertext);

        Ok(Payload::new(data)
            .with_metadata(crate::payload::METADATA_KEY_ENCODING, ENCODING_ENCRYPTED)
            .with_metadata(METADATA_KEY_CIPHER, CIPHER_AES_256_GCM)
            .with_metadata(METADATA_KEY_KEY_ID, key_id))
    }

    fn decrypt_payload(&self, payload: Payload) -> Result<Payload> {
        if !payload.has_encoding(ENCODING_ENCRYPTED) {
            return Err(CodecError::decoding(format!(
                "payload does not carry the '{ENCODING_ENCRYPTED}' marker"
            )));
        }

        let cipher_name = payload
            .metadata_utf8(METADATA_KEY_CIPHER)
            .unwrap_or_default();
        if cipher_name != CIPHER_AES_256_GCM {
            return Err(CodecError::decoding(format!(
                "unsupported cipher '{cipher_name}' (expected {CIPHER_AES_256_GCM})"
            )));
        }

        let key_id = payload
            .metadata_utf8(METADATA_KEY_KEY_ID)
            .ok_or_else(|| CodecError::decoding("encrypted payload is missing its key id"))?;
        let key = self
            .store
            .secret_key(key_id)
            .map_err(|e| CodecError::decoding(e.to_string()))?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CodecError::decoding(format!("cipher init for key '{key_id}': {e}")))?;

        if payload.data.len() < NONCE_SIZE {
            return Err(CodecError::decoding(
                "encrypted payload is shorter than its nonce",
            ));
        }
        let (nonce_bytes, ciphertext) = payload.data.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|_| {
            CodecError::decoding("authentication failed: payload tampered with or wrong key")
        })?;

        let sealed: SealedPayload = serde_json::from_slice(&plaintext)
            .map_err(|e| CodecError::decoding(format!("sealed payload is malformed: {e}")))?;
        sealed.open()
    }
}

impl PayloadCodec for EncryptionCodec {
    fn name(&self) -> &str {
        "encryption"
    }

    fn encode(&self, payloads: Vec<Payload>) -> Result<Vec<Payload>> {
        payloads
            .into_iter()
            .map(|payload| self.encrypt_payload(payload))
            .collect()
    }

    fn decode(&self, payloads: Vec<Payload>) -> Result<Vec<Payload>> {
        payloads
            .into_iter()
            .map(|payload| self.decrypt_payload(payload))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{ENCODING_JSON, METADATA_KEY_ENCODING};
    use crate::store::{InMemorySecretStore, SecretKey};

    fn codec_with_single_key(key_id: &str) -> EncryptionCodec {
        let store = InMemorySecretStore::single(key_id, SecretKey::generate());
        EncryptionCodec::new(Arc::new(store))
    }

    fn json_payload(body: &str) -> Payload {
        Payload::new(body.as_bytes().to_vec())
            .with_metadata(METADATA_KEY_ENCODING, ENCODING_JSON)
            .with_metadata("trace-id", "7f3a")
    }

    #[test]
    fn test_round_trip_restores_payload_exactly() {
        let codec = codec_with_single_key("key-v1");
        let original = json_payload(r#"{"greeting":"hello"}"#);

        let encoded = codec.encode(vec![original.clone()]).unwrap();
        let decoded = codec.decode(encoded).unwrap();

        assert_eq!(decoded, vec![original]);
    }

    #[test]
    fn test_encoded_payload_carries_markers_and_hides_plaintext() {
        let codec = codec_with_single_key("key-v1");
        let original = json_payload(r#"{"secret":"swordfish"}"#);

        let encoded = codec.encode(vec![original]).unwrap();
        let payload = &encoded[0];

        assert!(payload.has_encoding(ENCODING_ENCRYPTED));
        assert_eq!(
            payload.metadata_utf8(METADATA_KEY_CIPHER),
            Some("AES-256-GCM")
        );
        assert_eq!(payload.metadata_utf8(METADATA_KEY_KEY_ID), Some("key-v1"));
        // Original markers are sealed inside, not left on the envelope
        assert_eq!(payload.metadata_utf8("trace-id"), None);
        // Ciphertext must not leak the plaintext
        let haystack = String::from_utf8_lossy(&payload.data).into_owned();
        assert!(!haystack.contains("swordfish"));
    }

    #[test]
    fn test_same_plaintext_encrypts_differently_each_time() {
        let codec = codec_with_single_key("key-v1");
        let payload = json_payload("same bytes");

        let first = codec.encode(vec![payload.clone()]).unwrap();
        let second = codec.encode(vec![payload]).unwrap();

        // Fresh nonce per payload
        assert_ne!(first[0].data, second[0].data);
    }

    #[test]
    fn test_decode_rejects_unmarked_payload() {
        let codec = codec_with_single_key("key-v1");
        let foreign = json_payload("never encrypted");

        let err = codec.decode(vec![foreign]).unwrap_err();

        assert!(err.is_decoding());
        assert!(err.to_string().contains("marker"));
    }

    #[test]
    fn test_decode_rejects_tampered_ciphertext() {
        let codec = codec_with_single_key("key-v1");
        let mut encoded = codec.encode(vec![json_payload("payload body")]).unwrap();

        // Flip one ciphertext bit past the nonce
        let last = encoded[0].data.len() - 1;
        encoded[0].data[last] ^= 0x01;

        let err = codec.decode(encoded).unwrap_err();
        assert!(err.is_decoding());
        assert!(err.to_string().contains("authentication failed"));
    }

    #[test]
    fn test_decode_rejects_truncated_ciphertext() {
        let codec = codec_with_single_key("key-v1");
        let mut encoded = codec.encode(vec![json_payload("payload body")]).unwrap();
        encoded[0].data.truncate(NONCE_SIZE - 2);

        let err = codec.decode(encoded).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_decode_fails_with_wrong_key() {
        let encoder = codec_with_single_key("key-v1");
        let decoder = codec_with_single_key("key-v1"); // same id, different material

        let encoded = encoder.encode(vec![json_payload("body")]).unwrap();
        let err = decoder.decode(encoded).unwrap_err();

        assert!(err.is_decoding());
    }

    #[test]
    fn test_decode_fails_for_unknown_key_id() {
        let encoder = codec_with_single_key("key-v1");
        let decoder = codec_with_single_key("key-v2");

        let encoded = encoder.encode(vec![json_payload("body")]).unwrap();
        let err = decoder.decode(encoded).unwrap_err();

        assert!(err.is_decoding());
        assert!(err.to_string().contains("key-v1"));
    }

    #[test]
    fn test_rotated_out_key_still_decodes() {
        let old_key = SecretKey::generate();
        let encoder = EncryptionCodec::new(Arc::new(InMemorySecretStore::single(
            "key-v1",
            old_key.clone(),
        )));
        let encoded = encoder.encode(vec![json_payload("sealed under v1")]).unwrap();

        // New default key, old key still resolvable
        let keys = HashMap::from([
            ("key-v1".to_string(), old_key),
            ("key-v2".to_string(), SecretKey::generate()),
        ]);
        let store = InMemorySecretStore::new("key-v2", keys).unwrap();
        let decoder = EncryptionCodec::new(Arc::new(store));

        let decoded = decoder.decode(encoded).unwrap();
        assert_eq!(decoded[0].data, b"sealed under v1");
    }

    #[test]
    fn test_encode_fails_without_resolvable_key() {
        struct EmptyStore;
        impl SecretStore for EmptyStore {
            fn select_key_id(
                &self,
                _payload: &Payload,
            ) -> std::result::Result<String, crate::store::SecretStoreError> {
                Ok("ghost".to_string())
            }
            fn secret_key(
                &self,
                key_id: &str,
            ) -> std::result::Result<SecretKey, crate::store::SecretStoreError> {
                Err(crate::store::SecretStoreError::UnknownKeyId(
                    key_id.to_string(),
                ))
            }
        }

        let codec = EncryptionCodec::new(Arc::new(EmptyStore));
        let err = codec.encode(vec![json_payload("body")]).unwrap_err();

        assert!(err.is_encoding());
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_empty_body_round_trips() {
        let codec = codec_with_single_key("key-v1");
        let original = Payload::new(Vec::new());

        let encoded = codec.encode(vec![original.clone()]).unwrap();
        assert!(encoded[0].data.len() > NONCE_SIZE);

        let decoded = codec.decode(encoded).unwrap();
        assert_eq!(decoded, vec![original]);
    }
}
