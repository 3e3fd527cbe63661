//!
//! Paramtree: hierarchical parameter trees for experiment configuration.
//! This library provides the tree model plus the merge, diff, flatten, persistence and
//! command-line override operations built on it.
//!
//! ## Core Concepts
//!
//! * **Configs (`config::Config`)**: Ordered mappings addressed with dotted paths (`"model.layers.0.width"`).
//!   Nested mappings are themselves configs; sequences are indexed with integer segments.
//! * **Values (`config::Value`)**: Typed leaves: null, booleans, integers, floats, text, lists, tuples,
//!   and references to registered types, functions and modules.
//! * **Codec (`codec`)**: Lossless JSON persistence. Values JSON cannot express are written as tagged
//!   strings such as `__tuple__((1, 2))` or `__type__(layers.Linear)` and restored on load.
//! * **Registry (`codec::Registry`)**: Resolves qualified names in tagged strings back to references,
//!   and constructs objects for `Config::init_objects`.
//! * **Overlay (`overlay`)**: Derives typed command-line flags from a config and applies only the
//!   values the user actually passed.
//! * **Utilities (`util`)**: A named file lock for shared documents, a version-control probe and small
//!   naming helpers.

pub mod codec;
pub mod config;
pub mod overlay;
pub mod util;

/// Re-export the tree types for easier access.
pub use config::{Config, Key, Value};

/// Result type used throughout the Paramtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Paramtree library.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured tree errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),

    /// Structured encode/decode errors from the codec module
    #[error(transparent)]
    Codec(codec::CodecError),

    /// Structured argument errors from the overlay module
    #[error(transparent)]
    Overlay(overlay::OverlayError),

    /// Structured lock errors from the util module
    #[error(transparent)]
    Lock(util::LockError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Codec(_) => "codec",
            Error::Overlay(_) => "overlay",
            Error::Lock(_) => "util",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a key or reference was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_not_found(),
            Error::Codec(codec_err) => codec_err.is_resolution_error(),
            _ => false,
        }
    }

    /// Check if this error comes from resolving a dotted path.
    pub fn is_path_error(&self) -> bool {
        match self {
            Error::Config(config_err) => config_err.is_path_error(),
            _ => false,
        }
    }

    /// Check if this error indicates malformed input text.
    pub fn is_syntax_error(&self) -> bool {
        match self {
            Error::Codec(codec_err) => codec_err.is_syntax_error(),
            Error::Serialize(_) => true,
            _ => false,
        }
    }

    /// Check if this error is codec-related.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Codec(_))
    }

    /// Check if this error was raised while parsing command-line arguments.
    pub fn is_overlay_error(&self) -> bool {
        matches!(self, Error::Overlay(_))
    }

    /// Check if this error indicates a timeout.
    pub fn is_timeout_error(&self) -> bool {
        match self {
            Error::Lock(lock_err) => lock_err.is_timeout(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Lock(util::LockError::Io { .. }))
    }
}
