// Typed value <-> payload conversion
//
// Activity and workflow values enter the pipeline as JSON payloads; every
// codec below this layer sees opaque payload bytes only.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, Result};
use crate::payload::{Payload, ENCODING_JSON, METADATA_KEY_ENCODING};

/// Serialize a value into a `json/plain` payload.
pub trait AsJsonPayload: Serialize {
    fn as_json_payload(&self) -> Result<Payload> {
        let data = serde_json::to_vec(self)
            .map_err(|e| CodecError::encoding(format!("json serialization failed: {e}")))?;
        Ok(Payload::new(data).with_metadata(METADATA_KEY_ENCODING, ENCODING_JSON))
    }
}

impl<T: Serialize> AsJsonPayload for T {}

/// Deserialize a value out of a `json/plain` payload.
pub trait FromJsonPayload: DeserializeOwned {
    fn from_json_payload(payload: &Payload) -> Result<Self> {
        if !payload.has_encoding(ENCODING_JSON) {
            return Err(CodecError::decoding(format!(
                "expected a '{ENCODING_JSON}' payload, got encoding {:?}",
                payload.metadata_utf8(METADATA_KEY_ENCODING)
            )));
        }
        serde_json::from_slice(&payload.data)
            .map_err(|e| CodecError::decoding(format!("json deserialization failed: {e}")))
    }
}

impl<T: DeserializeOwned> FromJsonPayload for T {}
