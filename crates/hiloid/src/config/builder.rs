use core::num::NonZeroU64;
use std::sync::Arc;

use crate::{ConfigError, EpochVerifier, GeneratorConfig, MAX_SECTION, MAX_STEP};

/// Builder for [`GeneratorConfig`].
///
/// Setters never fail; every parameter is checked by [`build`].
///
/// # Example
///
/// ```
/// use hiloid::GeneratorConfig;
///
/// let config = GeneratorConfig::builder("orders")
///     .section(2)
///     .step(16, 0)
///     .obfuscation(0x5eed)
///     .build()
///     .unwrap();
/// assert_eq!(config.step(), 16);
///
/// assert!(GeneratorConfig::builder("orders").step(3, 0).build().is_err());
/// ```
///
/// [`build`]: GeneratorConfigBuilder::build
#[must_use]
pub struct GeneratorConfigBuilder {
    name: Arc<str>,
    section: u8,
    step: u32,
    floor: u32,
    obfuscation_seed: Option<u64>,
    verifier: Option<Arc<dyn EpochVerifier>>,
}

impl GeneratorConfigBuilder {
    /// A builder with default settings.
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

    /// Tags every ID with `section` (1..=7) in its top bits, so independent
    /// generator pools sharing one epoch counter never collide. Limits the
    /// epoch to 24 bits. 0 disables sectioning.
    pub fn section(mut self, section: u8) -> Self {
        self.section = section;
        self
    }

    /// Advances the sequence by `step` (a power of two up to 1024) per call.
    ///
    /// A `floor` of 2 or more (and below `step`) rounds every emitted value
    /// down to a multiple of `floor`. 0 and 1 disable flooring.
    pub fn step(mut self, step: u32, floor: u32) -> Self {
        self.step = step;
        self.floor = floor;
        self
    }

    /// XOR-scrambles the sequence bits of every emitted ID with a mask derived
    /// from `seed`, which must be non-zero.
    ///
    /// IDs stay unique but are no longer increasing.
    pub fn obfuscation(mut self, seed: u64) -> Self {
        self.obfuscation_seed = Some(seed);
        self
    }

    /// Runs `verifier` on every acquired epoch before installing it.
    pub fn epoch_verifier(mut self, verifier: impl EpochVerifier) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidSection`] if the section exceeds 7
    /// - [`ConfigError::InvalidStep`] if the step is not a power of two up
    ///   to 1024
    /// - [`ConfigError::InvalidFloor`] if the floor is not below the step
    /// - [`ConfigError::ZeroObfuscationSeed`] if obfuscation was requested
    ///   with a zero seed
    pub fn build(self) -> Result<GeneratorConfig, ConfigError> {
        if self.section > MAX_SECTION {
            return Err(ConfigError::InvalidSection {
                section: self.section,
            });
        }
        if !self.step.is_power_of_two() || self.step > MAX_STEP {
            return Err(ConfigError::InvalidStep { step: self.step });
        }
        if self.floor >= self.step && self.floor != 0 {
            return Err(ConfigError::InvalidFloor {
                floor: self.floor,
                step: self.step,
            });
        }
        let obfuscation_seed = match self.obfuscation_seed {
            None => None,
            Some(seed) => Some(NonZeroU64::new(seed).ok_or(ConfigError::ZeroObfuscationSeed)?),
        };

        Ok(GeneratorConfig {
            name: self.name,
            section: self.section,
            step: self.step,
            floor: if self.floor >= 2 { self.floor } else { 0 },
            obfuscation_seed,
            verifier: self.verifier,
        })
    }
}
