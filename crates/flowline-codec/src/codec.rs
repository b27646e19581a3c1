// Codec seam applied around every payload crossing the execution boundary

use crate::error::Result;
use crate::payload::Payload;

/// A reversible transformation over a batch of payloads.
///
/// Implementations must be safe for concurrent use: the runtime calls
/// `encode` and `decode` from many worker threads for unrelated batches, so a
/// codec holds injected configuration and either avoids interior mutability
/// or guards it without serializing unrelated batches against each other.
///
/// # Contract
///
/// * `encode` transforms each payload independently and returns a batch of
///   the same length and order.
/// * `decode` is the exact inverse: `decode(encode(p)) == p`, metadata
///   included.
/// * `decode` rejects payloads this codec did not produce instead of handing
///   unverified bytes onward.
/// * An error aborts the whole batch; no partially transformed sequence is
///   ever returned.
pub trait PayloadCodec: Send + Sync {
    /// Short name used to annotate chain errors.
    fn name(&self) -> &str;

    /// Transform payloads on the outbound path.
    fn encode(&self, payloads: Vec<Payload>) -> Result<Vec<Payload>>;

    /// Reverse the transformation on the inbound path.
    fn decode(&self, payloads: Vec<Payload>) -> Result<Vec<Payload>>;
}
