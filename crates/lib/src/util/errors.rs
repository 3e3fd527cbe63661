//! Error types for the utility collaborators.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors raised while acquiring a [`FileLock`](super::lock::FileLock).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LockError {
    /// Another holder kept the lock for the whole timeout
    #[error("Timed out after {timeout:?} waiting for lock '{name}'")]
    Timeout { name: String, timeout: Duration },

    /// The lock file could not be opened or locked
    #[error("Lock file {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LockError {
    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::Timeout { .. })
    }
}

impl From<LockError> for crate::Error {
    fn from(err: LockError) -> Self {
        crate::Error::Lock(err)
    }
}
