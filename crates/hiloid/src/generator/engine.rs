use portable_atomic::{AtomicI64, Ordering};

use crate::{GeneratorConfig, PackedId, generator::transform::Transform};

/// One emitted identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Issued {
    /// The value handed to the caller, after the output transform.
    pub(crate) id: i64,
    /// Set for exactly one caller per renewal interval.
    pub(crate) renew: bool,
}

/// The sequence ran past [`PANIC_THRESHOLD`](crate::PANIC_THRESHOLD).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Exhausted;

/// Lock-free half of a generator: the packed state word and the output
/// transform.
///
/// Every call to [`Self::try_next`] is a single `fetch_add`. Uniqueness
/// follows from the modification order of the state word alone, so relaxed
/// ordering suffices on the hot path.
pub(crate) struct SequenceEngine {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicI64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicI64,
    step: i64,
    section: u8,
    floor: i64,
    transform: Transform,
}

impl SequenceEngine {
    pub(crate) fn new(config: &GeneratorConfig) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicI64::new(0)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicI64::new(0),
            step: i64::from(config.step()),
            section: config.section(),
            floor: i64::from(config.floor()),
            transform: Transform::from_config(config),
        }
    }

    #[inline]
    pub(crate) fn try_next(&self) -> Result<Issued, Exhausted> {
        let raw = self.state.fetch_add(self.step, Ordering::Relaxed) + self.step;
        let id = PackedId::from_raw(raw);
        if id.is_exhausted() {
            self.cold_clamp(id);
            return Err(Exhausted);
        }

        Ok(Issued {
            id: self.transform.apply(raw),
            renew: id.is_renewal_point(),
        })
    }

    /// Pulls the state back to the panic threshold so that repeated calls
    /// past exhaustion cannot carry into the epoch bits.
    #[cold]
    #[inline(never)]
    fn cold_clamp(&self, observed: PackedId) {
        // Losing the race is fine: another caller already moved the state.
        let _ = self.state.compare_exchange(
            observed.to_raw(),
            observed.clamped().to_raw(),
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    }

    /// Overwrites the state word.
    ///
    /// # Panics
    ///
    /// Panics if `raw` is negative or its sequence already reached the panic
    /// threshold.
    pub(crate) fn reset(&self, raw: i64) {
        assert!(raw >= 0, "the packed value cannot be negative, got {raw}");
        let mut id = PackedId::from_raw(raw);
        assert!(
            !id.is_exhausted(),
            "the sequence of {id:?} already reached the panic threshold"
        );

        if self.section != 0 {
            id = id.with_section(self.section);
        }
        if self.floor > 1 {
            id = id.align_up(self.step);
        }
        self.state.store(id.to_raw(), Ordering::Release);
    }

    pub(crate) fn current(&self) -> PackedId {
        PackedId::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Stores `raw` without validation.
    #[cfg(test)]
    pub(crate) fn store_raw(&self, raw: i64) {
        self.state.store(raw, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CRITICAL_THRESHOLD, FIRST_RENEWAL_POINT, PANIC_THRESHOLD, SEQUENCE_BITS};

    fn make(section: u8, step: u32, floor: u32) -> SequenceEngine {
        let config = GeneratorConfig::builder("engine")
            .section(section)
            .step(step, floor)
            .build()
            .unwrap();
        SequenceEngine::new(&config)
    }

    #[test]
    fn starts_in_epoch_zero() {
        let engine = make(0, 1, 0);
        assert_eq!(engine.try_next().unwrap().id, 1);
        assert_eq!(engine.try_next().unwrap().id, 2);
        assert_eq!(engine.current().epoch(), 0);
    }

    #[test]
    fn renewal_flag_set_only_on_interval_boundaries() {
        let engine = make(0, 1, 0);
        engine.reset((5 << SEQUENCE_BITS) | (FIRST_RENEWAL_POINT - 1));
        assert!(engine.try_next().unwrap().renew);
        for _ in 0..1000 {
            assert!(!engine.try_next().unwrap().renew);
        }
    }

    #[test]
    fn critical_threshold_itself_is_not_a_boundary() {
        // CRITICAL_THRESHOLD is not a multiple of the renewal interval.
        assert_ne!(CRITICAL_THRESHOLD, FIRST_RENEWAL_POINT);
        let engine = make(0, 1, 0);
        engine.reset((5 << SEQUENCE_BITS) | (CRITICAL_THRESHOLD - 1));
        assert!(!engine.try_next().unwrap().renew);
    }

    #[test]
    fn exhaustion_clamps_state() {
        let engine = make(0, 4, 0);
        let base = 9 << SEQUENCE_BITS;
        engine.store_raw(base | PANIC_THRESHOLD);
        assert_eq!(engine.try_next(), Err(Exhausted));
        assert_eq!(engine.current().to_raw(), base | PANIC_THRESHOLD);
        assert_eq!(engine.try_next(), Err(Exhausted));
        assert_eq!(engine.current().epoch(), 9);
    }

    #[test]
    fn last_value_before_panic_threshold_is_issued() {
        let engine = make(0, 1, 0);
        engine.reset((2 << SEQUENCE_BITS) | (PANIC_THRESHOLD - 2));
        let issued = engine.try_next().unwrap();
        assert_eq!(PackedId::from_raw(issued.id).sequence(), PANIC_THRESHOLD - 1);
        assert_eq!(engine.try_next(), Err(Exhausted));
    }

    #[test]
    #[should_panic(expected = "cannot be negative")]
    fn reset_rejects_negative() {
        make(0, 1, 0).reset(-1);
    }

    #[test]
    #[should_panic(expected = "panic threshold")]
    fn reset_rejects_exhausted() {
        make(0, 1, 0).reset(PANIC_THRESHOLD);
    }

    #[test]
    fn reset_restamps_section() {
        let engine = make(5, 1, 0);
        engine.reset((3 << 60) | (7 << SEQUENCE_BITS) | 11);
        let id = engine.current();
        assert_eq!(id.section(), 5);
        assert_eq!(id.sectioned_epoch(), 7);
        assert_eq!(id.sequence(), 11);
    }

    #[test]
    fn reset_aligns_to_step_when_flooring() {
        let engine = make(0, 1024, 659);
        engine.reset((1 << SEQUENCE_BITS) | 1);
        assert_eq!(engine.current().sequence(), 1024);
        engine.reset(1 << SEQUENCE_BITS);
        assert_eq!(engine.current().sequence(), 0);

        let engine = make(0, 1024, 0);
        engine.reset((1 << SEQUENCE_BITS) | 1);
        assert_eq!(engine.current().sequence(), 1);
    }
}
