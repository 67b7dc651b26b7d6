use core::fmt;
use std::sync::Arc;

use crate::{
    EpochSource, Error, GeneratorConfig, Logger, PackedId, Result, Spawner, Stats, StatsSnapshot,
    ThreadSpawner, TracingLogger,
    generator::{Mutex, engine::SequenceEngine, transform::obfuscate},
};

pub(crate) struct Inner<L, S> {
    pub(crate) config: GeneratorConfig,
    pub(crate) engine: SequenceEngine,
    pub(crate) source: Mutex<Option<Arc<dyn EpochSource>>>,
    pub(crate) stats: Stats,
    pub(crate) logger: L,
    pub(crate) spawner: S,
}

/// A lock-free hi/lo identifier generator.
///
/// Each identifier packs an *epoch* obtained from a shared store (the high
/// bits) with a locally incremented *sequence* (the low 36 bits). Issuing an
/// identifier is a single atomic add; the store is only consulted when an
/// epoch is loaded, either explicitly through [`Self::load_epoch`] or in the
/// background once the sequence crosses 80% of its range.
///
/// ## Features
/// - ✅ Thread-safe, lock-free hot path
/// - ✅ Cheap to clone: clones share the same state
/// - ✅ Unique across processes, given a store that never hands out the same
///   epoch twice to generators sharing a section
/// - ❌ Not time-ordered
///
/// ## Lifecycle
///
/// A fresh generator issues identifiers in epoch 0, which a valid store never
/// hands out. Load an epoch before issuing identifiers that must be unique
/// across processes. The first successfully loaded source is bound and reused
/// for every later renewal.
///
/// ## Example
///
/// ```
/// use hiloid::{AtomicCounterSource, GeneratorConfig, HiLoGenerator};
///
/// let generator: HiLoGenerator = HiLoGenerator::new(GeneratorConfig::new("orders"));
/// generator.load_epoch(AtomicCounterSource::new()).unwrap();
///
/// let a = generator.next();
/// let b = generator.next();
/// assert!(b > a);
/// assert_eq!(generator.decode(a).epoch(), 1);
/// ```
pub struct HiLoGenerator<L = TracingLogger, S = ThreadSpawner>
where
    L: Logger,
    S: Spawner,
{
    inner: Arc<Inner<L, S>>,
}

impl<L, S> HiLoGenerator<L, S>
where
    L: Logger + Default,
    S: Spawner + Default,
{
    /// Creates a generator with the default logger and spawner.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_parts(config, L::default(), S::default())
    }
}

impl<L, S> HiLoGenerator<L, S>
where
    L: Logger + Default,
    S: Spawner,
{
    /// Creates a generator renewing through `spawner`.
    pub fn with_spawner(config: GeneratorConfig, spawner: S) -> Self {
        Self::with_parts(config, L::default(), spawner)
    }
}

impl<L, S> HiLoGenerator<L, S>
where
    L: Logger,
    S: Spawner,
{
    /// Creates a generator from explicit parts.
    pub fn with_parts(config: GeneratorConfig, logger: L, spawner: S) -> Self {
        let engine = SequenceEngine::new(&config);
        Self {
            inner: Arc::new(Inner {
                config,
                engine,
                source: Mutex::new(None),
                stats: Stats::default(),
                logger,
                spawner,
            }),
        }
    }

    /// Returns the next identifier.
    ///
    /// # Panics
    ///
    /// Panics with [`Error::Exhausted`] when the sequence space of the current
    /// epoch ran out before a renewal completed. Use [`Self::try_next`] to
    /// handle that case.
    #[inline]
    pub fn next(&self) -> i64 {
        match self.try_next() {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the next identifier, or [`Error::Exhausted`].
    ///
    /// Crossing a renewal point hands a renewal to the spawner; the caller
    /// never waits for it.
    pub fn try_next(&self) -> Result<i64> {
        let issued = self.inner.engine.try_next().map_err(|_| Error::Exhausted {
            name: Arc::clone(&self.inner.config.name),
        })?;
        if issued.renew {
            self.inner.renew_in_background();
        }
        Ok(issued.id)
    }

    /// Acquires a new epoch from `source` and installs it.
    ///
    /// The first source loaded successfully is bound for renewals; later
    /// calls install their epoch but leave the binding alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Acquisition`] if the source fails or the epoch is not
    /// positive, out of range, equal to the installed one, or rejected by the
    /// configured verifier. The generator is left untouched in that case.
    pub fn load_epoch(&self, source: impl EpochSource) -> Result<()> {
        self.inner.load_epoch(Arc::new(source))
    }

    /// Synchronously renews the epoch through the bound source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenewalUnbound`] before the first successful
    /// [`Self::load_epoch`], otherwise the same errors as `load_epoch`.
    pub fn renew_now(&self) -> Result<()> {
        self.inner.renew_now()
    }

    /// Overwrites the packed state. Section and step alignment are applied
    /// as for a loaded epoch.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is negative or its sequence is already exhausted.
    pub fn reset(&self, raw: i64) {
        self.inner.engine.reset(raw);
    }

    /// Renewal counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Name attached to every log record and error.
    pub fn name(&self) -> &str {
        self.inner.config.name()
    }

    /// Configuration the generator was built with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.inner.config
    }

    /// The logger renewals report to.
    pub fn logger(&self) -> &L {
        &self.inner.logger
    }

    /// The spawner renewals run on.
    pub fn spawner(&self) -> &S {
        &self.inner.spawner
    }

    /// The last issued raw value.
    pub fn current(&self) -> PackedId {
        self.inner.engine.current()
    }

    /// The installed epoch, 0 before the first load.
    pub fn current_epoch(&self) -> i64 {
        let current = self.current();
        if self.inner.config.section() == 0 {
            current.epoch()
        } else {
            current.sectioned_epoch()
        }
    }

    /// Splits an identifier issued by this generator into its segments,
    /// undoing obfuscation.
    ///
    /// Flooring is lossy: for a floored identifier the recovered sequence is
    /// the floored value, not the raw one.
    pub fn decode(&self, id: i64) -> PackedId {
        match self.inner.config.obfuscation_mask() {
            Some(mask) => PackedId::from_raw(obfuscate(id, mask)),
            None => PackedId::from_raw(id),
        }
    }

    #[cfg(test)]
    pub(crate) fn store_raw(&self, raw: i64) {
        self.inner.engine.store_raw(raw);
    }
}

impl<L, S> Clone for HiLoGenerator<L, S>
where
    L: Logger,
    S: Spawner,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L, S> fmt::Debug for HiLoGenerator<L, S>
where
    L: Logger,
    S: Spawner,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HiLoGenerator")
            .field("config", &self.inner.config)
            .field("current", &self.current())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
