//! Error types for the typed codec.
//!
//! Decoding a tagged string can fail in three distinct ways: the tag grammar
//! matched but its payload is malformed, the payload names a reference the
//! registry does not know, or a tuple literal cannot be parsed. Encoding only
//! fails for values that have no JSON-safe projection.

use thiserror::Error;

/// Structured error types for encode/decode operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
    /// A string matched the tag grammar but its payload is malformed
    #[error("Invalid {tag} tag payload '{payload}': {reason}")]
    InvalidTag {
        tag: &'static str,
        payload: String,
        reason: String,
    },

    /// A type, function or module reference is not in the registry
    #[error("Unresolved {kind} reference '{name}'")]
    UnresolvedReference { kind: &'static str, name: String },

    /// A tuple literal could not be parsed
    #[error("Invalid literal at offset {offset} in '{input}': {reason}")]
    InvalidLiteral {
        input: String,
        offset: usize,
        reason: String,
    },

    /// The value has no JSON-safe or literal projection
    #[error("Cannot encode {what}: {reason}")]
    Unrepresentable { what: String, reason: String },

    /// A tagged mapping key that cannot be used as a key
    #[error("Unsupported mapping key '{key}'")]
    UnsupportedKey { key: String },
}

impl CodecError {
    /// Check if this error comes from a registry lookup
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, CodecError::UnresolvedReference { .. })
    }

    /// Check if this error comes from malformed input text
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            CodecError::InvalidTag { .. } | CodecError::InvalidLiteral { .. }
        )
    }

    /// Check if this error was raised while encoding
    pub fn is_encode_error(&self) -> bool {
        matches!(self, CodecError::Unrepresentable { .. })
    }

    /// Get the unresolved reference name, if any
    pub fn reference(&self) -> Option<&str> {
        match self {
            CodecError::UnresolvedReference { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<CodecError> for crate::Error {
    fn from(err: CodecError) -> Self {
        crate::Error::Codec(err)
    }
}
