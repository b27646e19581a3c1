// Error taxonomy for the codec pipeline

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Failures surfaced by payload codecs and the chain that composes them.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A transformation could not be applied on the outbound path, for
    /// example because key material is unavailable or serialization failed.
    #[error("payload encoding failed: {0}")]
    Encoding(String),

    /// A transformation could not be reversed on the inbound path, for
    /// example because the encoding marker is missing, the ciphertext is
    /// corrupted or the authentication tag does not verify.
    #[error("payload decoding failed: {0}")]
    Decoding(String),

    /// A chain step failed. Wraps the step's own error and records which
    /// codec at which position raised it.
    #[error("codec '{name}' at chain position {position}: {source}")]
    ChainStep {
        position: usize,
        name: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    pub fn encoding(message: impl Into<String>) -> Self {
        CodecError::Encoding(message.into())
    }

    pub fn decoding(message: impl Into<String>) -> Self {
        CodecError::Decoding(message.into())
    }

    /// Whether this error is, or wraps, an outbound encoding failure.
    pub fn is_encoding(&self) -> bool {
        match self {
            CodecError::Encoding(_) => true,
            CodecError::Decoding(_) => false,
            CodecError::ChainStep { source, .. } => source.is_encoding(),
        }
    }

    /// Whether this error is, or wraps, an inbound decoding failure.
    pub fn is_decoding(&self) -> bool {
        match self {
            CodecError::Encoding(_) => false,
            CodecError::Decoding(_) => true,
            CodecError::ChainStep { source, .. } => source.is_decoding(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_step_preserves_failure_direction() {
        let inner = CodecError::decoding("tag mismatch");
        let wrapped = CodecError::ChainStep {
            position: 2,
            name: "encryption".to_string(),
            source: Box::new(inner),
        };

        assert!(wrapped.is_decoding());
        assert!(!wrapped.is_encoding());
    }

    #[test]
    fn test_chain_step_display_names_the_step() {
        let err = CodecError::ChainStep {
            position: 0,
            name: "encryption".to_string(),
            source: Box::new(CodecError::encoding("no key")),
        };
        let rendered = err.to_string();

        assert!(rendered.contains("encryption"));
        assert!(rendered.contains("position 0"));
        assert!(rendered.contains("no key"));
    }
}
