// Secret key material for the encryption codec
//
// Key material is injected at assembly time; the codec never fetches keys on
// the hot path. Stores are immutable after construction and shared across
// worker threads.

use std::collections::HashMap;
use std::fmt;

use rand::RngCore;
use thiserror::Error;

use crate::payload::Payload;

/// AES-256 key length in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Failures raised while resolving or constructing key material.
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// The requested key id is not present in the store.
    #[error("secret key '{0}' not found")]
    UnknownKeyId(String),

    /// Key material is malformed or the store is misconfigured.
    #[error("invalid secret key: {0}")]
    InvalidKey(String),
}

/// Symmetric key material for the encryption codec.
///
/// `Debug` renders no key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Build a key from raw bytes. The length must be exactly
    /// [`SECRET_KEY_LEN`].
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretStoreError> {
        let bytes = bytes.into();
        if bytes.len() != SECRET_KEY_LEN {
            return Err(SecretStoreError::InvalidKey(format!(
                "expected {SECRET_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; SECRET_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(..)")
    }
}

/// Source of key material for the encryption codec.
///
/// Implementations must be `Send + Sync`; codecs call them from multiple
/// worker threads. Resolution must not block on I/O - keys are expected to be
/// resident by the time the chain serves traffic.
pub trait SecretStore: Send + Sync {
    /// Key id to encrypt the given outbound payload with.
    fn select_key_id(&self, payload: &Payload) -> Result<String, SecretStoreError>;

    /// Resolve a key id back to its key material.
    fn secret_key(&self, key_id: &str) -> Result<SecretKey, SecretStoreError>;
}

/// Store backed by a fixed map of keys, with one default id used for every
/// outbound payload.
pub struct InMemorySecretStore {
    default_key_id: String,
    keys: HashMap<String, SecretKey>,
}

impl InMemorySecretStore {
    /// Build a store from a default key id and the resolvable keys. The
    /// default id must be among the keys.
    pub fn new(
        default_key_id: impl Into<String>,
        keys: HashMap<String, SecretKey>,
    ) -> Result<Self, SecretStoreError> {
        let default_key_id = default_key_id.into();
        if !keys.contains_key(&default_key_id) {
            return Err(SecretStoreError::InvalidKey(format!(
                "default key id '{default_key_id}' is not among the provided keys"
            )));
        }
        Ok(Self {
            default_key_id,
            keys,
        })
    }

    /// Store holding a single key.
    pub fn single(key_id: impl Into<String>, key: SecretKey) -> Self {
        let key_id = key_id.into();
        let keys = HashMap::from([(key_id.clone(), key)]);
        Self {
            default_key_id: key_id,
            keys,
        }
    }

    pub fn default_key_id(&self) -> &str {
        &self.default_key_id
    }

    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

impl SecretStore for InMemorySecretStore {
    fn select_key_id(&self, _payload: &Payload) -> Result<String, SecretStoreError> {
        Ok(self.default_key_id.clone())
    }

    fn secret_key(&self, key_id: &str) -> Result<SecretKey, SecretStoreError> {
        self.keys
            .get(key_id)
            .cloned()
            .ok_or_else(|| SecretStoreError::UnknownKeyId(key_id.to_string()))
    }
}
