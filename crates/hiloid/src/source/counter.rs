use portable_atomic::{AtomicI64, Ordering};

use crate::{BoxError, EpochSource, Lease};

/// An in-process [`EpochSource`] backed by an atomic counter.
///
/// Handy for tests and for deployments where a single process owns the whole
/// identifier space. It hands out `last + 1`, `last + 2`, ... and never
/// fails.
///
/// # Example
///
/// ```
/// use hiloid::{AtomicCounterSource, EpochSource};
///
/// let source = AtomicCounterSource::starting_after(9);
/// assert_eq!(source.acquire().unwrap().epoch(), 10);
/// assert_eq!(source.acquire().unwrap().epoch(), 11);
/// assert_eq!(source.last(), 11);
/// ```
#[derive(Debug, Default)]
pub struct AtomicCounterSource {
    last: AtomicI64,
}

impl AtomicCounterSource {
    /// A counter whose first epoch is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A counter whose first epoch is `last + 1`.
    pub fn starting_after(last: i64) -> Self {
        Self {
            last: AtomicI64::new(last),
        }
    }

    /// The most recently handed out epoch.
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}

impl EpochSource for AtomicCounterSource {
    fn acquire(&self) -> Result<Lease, BoxError> {
        Ok(Lease::new(self.last.fetch_add(1, Ordering::AcqRel) + 1))
    }
}
