//! Error types for config tree operations.

use thiserror::Error;

/// Structured error types for dotted-path access and object materialization.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A key is missing from the node it was looked up in
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// The empty key was used on a node that does not have exactly one entry
    #[error("Empty key is ambiguous on a node with {len} entries")]
    KeyRequired { len: usize },

    /// A path continues through a value that is neither a mapping nor a sequence
    #[error("Path '{path}' is not addressable: '{segment}' holds a {found}")]
    NotAddressable {
        path: String,
        segment: String,
        found: &'static str,
    },

    /// A path segment under a sequence is not an integer
    #[error("Invalid index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },

    /// An index is outside the sequence
    #[error("Index {index} out of range for sequence of length {len} in path '{path}'")]
    IndexOutOfRange {
        path: String,
        index: i64,
        len: usize,
    },

    /// A literal key contains the path separator
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// A `key=value` assignment without exactly one `=`
    #[error("Invalid assignment '{input}': expected exactly one '='")]
    InvalidAssignment { input: String },

    /// A registered constructor returned an error
    #[error("Failed to construct {type_name}: {reason}")]
    ConstructionFailed { type_name: String, reason: String },

    /// A type-keyed mapping names a type without a constructor
    #[error("Type {type_name} has no registered constructor")]
    NotConstructible { type_name: String },
}

impl ConfigError {
    /// Check if this error is a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound { .. })
    }

    /// Check if this error comes from resolving a dotted path
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            ConfigError::KeyNotFound { .. }
                | ConfigError::KeyRequired { .. }
                | ConfigError::NotAddressable { .. }
                | ConfigError::InvalidIndex { .. }
                | ConfigError::IndexOutOfRange { .. }
        )
    }

    /// Check if this error comes from `init_objects`
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConstructionFailed { .. } | ConfigError::NotConstructible { .. }
        )
    }

    /// Get the offending path, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigError::NotAddressable { path, .. }
            | ConfigError::InvalidIndex { path, .. }
            | ConfigError::IndexOutOfRange { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}
