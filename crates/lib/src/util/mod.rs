//! Small collaborators used around config trees: a named file lock, a
//! version-control probe, naming helpers, a once-initialised cell and a
//! named-parameter merge.

pub mod errors;
pub mod lock;
pub mod naming;
pub mod params;
pub mod singleton;
pub mod vcs;

pub use errors::LockError;
pub use lock::{FileLock, LockOptions};
pub use singleton::Singleton;
pub use vcs::{VcsInfo, probe};
