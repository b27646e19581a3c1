// Payload codec pipeline for Flowline workers
//
// Every payload crossing the durable-execution boundary runs through a codec
// chain: outbound in declared order, inbound in reverse. The codec shipped
// here seals payloads with AES-256-GCM using key material injected at
// assembly time.
//
// Key design decisions:
// - Codecs are synchronous and I/O-free; key material is resident before the
//   chain serves traffic
// - Encryption seals the whole payload (metadata included), so markers other
//   codecs wrote survive the round trip
// - Decode rejects payloads a codec did not produce instead of passing them
//   through

pub mod chain;
pub mod codec;
pub mod convert;
pub mod encryption;
pub mod error;
pub mod payload;
pub mod store;

pub use chain::CodecChain;
pub use codec::PayloadCodec;
pub use convert::{AsJsonPayload, FromJsonPayload};
pub use encryption::{EncryptionCodec, ENCODING_ENCRYPTED, METADATA_KEY_CIPHER, METADATA_KEY_KEY_ID};
pub use error::{CodecError, Result};
pub use payload::{Payload, ENCODING_JSON, METADATA_KEY_ENCODING};
pub use store::{InMemorySecretStore, SecretKey, SecretStore, SecretStoreError, SECRET_KEY_LEN};
