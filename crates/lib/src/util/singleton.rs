//! Once-initialised process-wide handles.

use std::{fmt, sync::OnceLock};

/// A value built at most once by a single factory and shared afterwards.
///
/// Usable in `static` position:
///
/// ```
/// use paramtree::util::singleton::Singleton;
///
/// static COUNTER_START: Singleton<u64> = Singleton::new();
///
/// assert!(!COUNTER_START.is_initialized());
/// assert_eq!(*COUNTER_START.get_or_init(|| 7), 7);
/// // later factories are never run
/// assert_eq!(*COUNTER_START.get_or_init(|| 99), 7);
/// ```
pub struct Singleton<T> {
    cell: OnceLock<T>,
}

impl<T> Singleton<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the shared instance, running `init` if this is the first access.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    /// Returns the instance if it has been built.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Singleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Singleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Singleton").field(value).finish(),
            None => f.write_str("Singleton(<uninit>)"),
        }
    }
}
