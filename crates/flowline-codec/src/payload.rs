// Payload value type crossing the execution boundary
//
// A payload is the unit the durable-execution runtime moves around: a binary
// body plus a metadata map describing how the body is encoded. Codecs consume
// payloads and produce new ones; nothing in the pipeline mutates a payload in
// place.

use std::collections::HashMap;
use std::fmt;

/// Metadata key holding a payload's encoding marker.
pub const METADATA_KEY_ENCODING: &str = "encoding";

/// Encoding marker for JSON-serialized payloads.
pub const ENCODING_JSON: &str = "json/plain";

/// A single unit of data crossing the execution boundary.
///
/// Equality covers the metadata map and the body, which is what makes the
/// codec round-trip law (`decode(encode(p)) == p`) checkable.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Encoding markers and codec annotations, keyed by well-known strings.
    pub metadata: HashMap<String, Vec<u8>>,
    /// Binary body.
    pub data: Vec<u8>,
}

impl Payload {
    /// Payload with the given body and no metadata.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            metadata: HashMap::new(),
            data: data.into(),
        }
    }

    /// Add a metadata entry, consuming and returning the payload.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Metadata value for `key`, if present and valid UTF-8.
    pub fn metadata_utf8(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(|value| std::str::from_utf8(value).ok())
    }

    /// Whether the payload carries the given encoding marker.
    pub fn has_encoding(&self, encoding: &str) -> bool {
        self.metadata_utf8(METADATA_KEY_ENCODING) == Some(encoding)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bodies can be large or carry plaintext; render keys and sizes only
        let mut keys: Vec<&str> = self.metadata.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Payload")
            .field("metadata", &keys)
            .field("data_len", &self.data.len())
            .finish()
    }
}
