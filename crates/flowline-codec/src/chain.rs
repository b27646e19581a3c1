// Ordered codec composition
//
// Outbound, codecs run in declared order; inbound, in reverse. The transform
// applied last on the way out is removed first on the way in, so stacked
// codecs nest like parentheses.

use std::sync::Arc;

use crate::codec::PayloadCodec;
use crate::error::{CodecError, Result};
use crate::payload::Payload;

/// An immutable, ordered composition of payload codecs.
///
/// Assembled once at startup and shared for the life of the process. The
/// chain is itself a [`PayloadCodec`], so a runtime that accepts a single
/// codec accepts a whole pipeline. An empty chain is legal and acts as the
/// identity in both directions.
#[derive(Clone, Default)]
pub struct CodecChain {
    codecs: Vec<Arc<dyn PayloadCodec>>,
}

impl CodecChain {
    /// Build a chain from codecs in outbound application order.
    pub fn new(codecs: Vec<Arc<dyn PayloadCodec>>) -> Self {
        Self { codecs }
    }

    /// Chain with no steps; `encode` and `decode` return their input as is.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    fn step_error(position: usize, name: &str, source: CodecError) -> CodecError {
        CodecError::ChainStep {
            position,
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

impl PayloadCodec for CodecChain {
    fn name(&self) -> &str {
        "codec-chain"
    }

    fn encode(&self, payloads: Vec<Payload>) -> Result<Vec<Payload>> {
        let mut current = payloads;
        for (position, codec) in self.codecs.iter().enumerate() {
            current = codec
                .encode(current)
                .map_err(|err| Self::step_error(position, codec.name(), err))?;
        }
        Ok(current)
    }

    fn decode(&self, payloads: Vec<Payload>) -> Result<Vec<Payload>> {
        let mut current = payloads;
        for (position, codec) in self.codecs.iter().enumerate().rev() {
            current = codec
                .decode(current)
                .map_err(|err| Self::step_error(position, codec.name(), err))?;
        }
        Ok(current)
    }
}
