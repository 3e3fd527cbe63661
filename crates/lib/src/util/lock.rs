//! Named inter-process locks backed by advisory file locks.
//!
//! A lock name is hashed into a file under the system temp directory, so any
//! process using the same name contends for the same file.

use std::{
    fs::{File, OpenOptions},
    io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use fs2::FileExt;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::errors::LockError;

/// Timing knobs for [`FileLock::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Give up after waiting this long
    pub timeout: Duration,
    /// Delay between attempts, capped at `timeout`
    pub poll_interval: Duration,
}

impl LockOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// An exclusive lock held until dropped.
///
/// ```
/// use std::time::Duration;
/// use paramtree::util::lock::{FileLock, LockOptions};
///
/// let guard = FileLock::acquire("paramtree-doc-lock", LockOptions::default()).unwrap();
/// let busy = FileLock::acquire(
///     "paramtree-doc-lock",
///     LockOptions::with_timeout(Duration::from_millis(10)),
/// );
/// assert!(busy.unwrap_err().is_timeout());
/// drop(guard);
/// ```
#[derive(Debug)]
pub struct FileLock {
    name: String,
    path: PathBuf,
    file: File,
}

impl FileLock {
    /// Location of the lock file used for `name`.
    pub fn path_for(name: &str) -> PathBuf {
        let digest = Sha256::digest(name.as_bytes());
        std::env::temp_dir().join(format!("paramtree-{}.lock", hex::encode(digest)))
    }

    /// Blocks until the lock for `name` is held or `options.timeout` passes.
    ///
    /// At least one attempt is made even with a zero timeout.
    pub fn acquire(name: &str, options: LockOptions) -> Result<Self, LockError> {
        let path = Self::path_for(name);
        let file = open_lock_file(&path)?;
        let start = Instant::now();
        let interval = options.poll_interval.min(options.timeout);
        let mut contended = false;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    if contended {
                        debug!(
                            name,
                            waited_ms = start.elapsed().as_millis() as u64,
                            "Acquired lock after contention"
                        );
                    }
                    return Ok(Self {
                        name: name.to_string(),
                        path,
                        file,
                    });
                }
                Err(e) if is_contended(&e) => {
                    if !contended {
                        debug!(name, path = %path.display(), "Lock is held, waiting");
                        contended = true;
                    }
                }
                Err(source) => return Err(LockError::Io { path, source }),
            }

            if start.elapsed() >= options.timeout {
                warn!(name, timeout = ?options.timeout, "Gave up waiting for lock");
                return Err(LockError::Timeout {
                    name: name.to_string(),
                    timeout: options.timeout,
                });
            }
            thread::sleep(interval);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(name = %self.name, error = %e, "Failed to release lock");
        }
    }
}

fn open_lock_file(path: &Path) -> Result<File, LockError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| LockError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
