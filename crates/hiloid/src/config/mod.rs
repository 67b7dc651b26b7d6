//! Generator configuration.
//!
//! A [`GeneratorConfig`] is always valid: the only way to obtain a
//! non-default one is [`GeneratorConfigBuilder::build`], which rejects bad
//! parameters up front instead of failing later on the hot path.

mod builder;

pub use builder::*;

use core::{fmt, num::NonZeroU64};
use std::sync::Arc;

use crate::EpochVerifier;

/// Validated construction-time settings of a [`HiLoGenerator`].
///
/// [`HiLoGenerator`]: crate::HiLoGenerator
#[derive(Clone)]
pub struct GeneratorConfig {
    pub(crate) name: Arc<str>,
    pub(crate) section: u8,
    pub(crate) step: u32,
    pub(crate) floor: u32,
    pub(crate) obfuscation_seed: Option<NonZeroU64>,
    pub(crate) verifier: Option<Arc<dyn EpochVerifier>>,
}

impl GeneratorConfig {
    /// Default settings: no section, step 1, no floor, no obfuscation, no
    /// verifier.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            section: 0,
            step: 1,
            floor: 0,
            obfuscation_seed: None,
            verifier: None,
        }
    }

    /// Starts a builder with default settings.
    pub fn builder(name: impl Into<Arc<str>>) -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new(name)
    }

    /// Name attached to every log record and error.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section tag, 0 when unset.
    pub fn section(&self) -> u8 {
        self.section
    }

    /// Increment applied per generated ID.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Quantization divisor, 0 when flooring is disabled.
    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// Whether emitted sequences are XOR-scrambled.
    pub fn is_obfuscated(&self) -> bool {
        self.obfuscation_seed.is_some()
    }

    /// The mask XORed into the sequence bits, if obfuscation is enabled.
    ///
    /// XORing it into the sequence bits of an emitted ID again recovers the
    /// raw sequence (before flooring).
    pub fn obfuscation_mask(&self) -> Option<i64> {
        self.obfuscation_seed.map(|seed| {
            let mask = mix_seed(seed.get());
            if self.floor == 0 {
                mask
            } else {
                // Keeps every floored value inside its own step-wide block.
                mask | (i64::from(self.step) - 1)
            }
        })
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("name", &self.name)
            .field("section", &self.section)
            .field("step", &self.step)
            .field("floor", &self.floor)
            .field("obfuscated", &self.is_obfuscated())
            .field("verifier", &self.verifier.is_some())
            .finish()
    }
}

/// splitmix64 finalizer, sign bit cleared.
const fn mix_seed(seed: u64) -> i64 {
    let mut x = seed;
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x = (x ^ (x >> 31)) & 0x7FFF_FFFF_FFFF_FFFF;
    x as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_seed_is_stable_and_positive() {
        for seed in [1, 2, 42, u64::MAX] {
            let mask = mix_seed(seed);
            assert!(mask >= 0);
            assert_eq!(mask, mix_seed(seed));
        }
        assert_ne!(mix_seed(1), mix_seed(2));
    }

    #[test]
    fn floor_forces_low_mask_bits() {
        let config = GeneratorConfig::builder("alpha")
            .step(1024, 659)
            .obfuscation(7)
            .build()
            .unwrap();
        let mask = config.obfuscation_mask().unwrap();
        assert_eq!(mask & 1023, 1023);

        let config = GeneratorConfig::builder("alpha")
            .step(1024, 0)
            .obfuscation(7)
            .build()
            .unwrap();
        assert_eq!(config.obfuscation_mask().unwrap(), mix_seed(7));
    }

    #[test]
    fn debug_hides_verifier() {
        let config = GeneratorConfig::builder("alpha")
            .epoch_verifier(|_: i64| Ok::<(), crate::BoxError>(()))
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(dbg.contains("verifier: true"));
        assert!(dbg.contains("\"alpha\""));
    }
}
