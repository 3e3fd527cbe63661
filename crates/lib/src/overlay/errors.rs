//! Error types for the command-line overlay.

use thiserror::Error;

/// Errors raised while parsing command-line overrides.
///
/// Any of these aborts the overlay before the tree is touched.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// A token did not satisfy its argument's type or arity
    #[error("Invalid command-line arguments: {message}")]
    ArgumentParse { message: String },

    /// A boolean argument received a token outside the accepted vocabulary
    #[error("Boolean value expected, got '{value}' (use yes/true/t/y/1 or no/false/f/n/0)")]
    InvalidBool { value: String },
}

impl OverlayError {
    /// Check if this error concerns a boolean token
    pub fn is_bool_error(&self) -> bool {
        matches!(self, OverlayError::InvalidBool { .. })
    }
}

impl From<OverlayError> for crate::Error {
    fn from(err: OverlayError) -> Self {
        crate::Error::Overlay(err)
    }
}
