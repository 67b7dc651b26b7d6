use core::fmt;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// An epoch returned by an [`EpochSource`], with an optional cleanup action.
///
/// The cleanup (closing a connection, removing a lock file...) runs exactly
/// once, when the lease is dropped. The generator holds the lease until it
/// is done validating and installing the epoch, so the cleanup has run
/// before [`HiLoGenerator::load_epoch`] returns, on every exit path.
///
/// # Example
///
/// ```
/// use hiloid::Lease;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let closed = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&closed);
/// let lease = Lease::with_cleanup(42, move || flag.store(true, Ordering::SeqCst));
/// assert_eq!(lease.epoch(), 42);
/// drop(lease);
/// assert!(closed.load(Ordering::SeqCst));
/// ```
///
/// [`EpochSource`]: crate::EpochSource
/// [`HiLoGenerator::load_epoch`]: crate::HiLoGenerator::load_epoch
pub struct Lease {
    epoch: i64,
    cleanup: Option<Cleanup>,
}

impl Lease {
    /// A lease with nothing to release.
    pub fn new(epoch: i64) -> Self {
        Self {
            epoch,
            cleanup: None,
        }
    }

    /// A lease running `cleanup` when dropped.
    pub fn with_cleanup(epoch: i64, cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self {
            epoch,
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// The acquired epoch.
    pub fn epoch(&self) -> i64 {
        self.epoch
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl From<i64> for Lease {
    fn from(epoch: i64) -> Self {
        Self::new(epoch)
    }
}

impl fmt::Debug for Lease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("epoch", &self.epoch)
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}
