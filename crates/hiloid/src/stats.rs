use portable_atomic::{AtomicU64, Ordering};

/// Renewal counters of a generator.
///
/// Both counters only ever grow. They are plain atomics, so reading them
/// never contends with ID generation or renewal.
#[derive(Debug, Default)]
pub struct Stats {
    renew_attempts: AtomicU64,
    renewed: AtomicU64,
}

impl Stats {
    pub(crate) fn record_attempt(&self) {
        self.renew_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_renewal(&self) {
        self.renewed.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of background renewal attempts, successful or not.
    pub fn renew_attempts(&self) -> u64 {
        self.renew_attempts.load(Ordering::Relaxed)
    }

    /// Number of background renewals that installed a new epoch.
    pub fn renewed(&self) -> u64 {
        self.renewed.load(Ordering::Relaxed)
    }

    /// Reads both counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            renew_attempts: self.renew_attempts(),
            renewed: self.renewed(),
        }
    }
}

/// Point-in-time copy of [`Stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Number of background renewal attempts.
    pub renew_attempts: u64,
    /// Number of successful background renewals.
    pub renewed: u64,
}
