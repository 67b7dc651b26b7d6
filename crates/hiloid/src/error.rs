//! Error types for ID generation and epoch renewal.
//!
//! ## Error Cases
//! - [`ConfigError`]: invalid step, floor, section or obfuscation seed,
//!   rejected when the configuration is built.
//! - [`AcquisitionError`]: the epoch source failed or returned an epoch that
//!   cannot be installed. Generator state is left untouched.
//! - [`Error::Exhausted`]: the sequence space of the current epoch ran out
//!   before a renewal completed.
//! - [`Error::RenewalUnbound`]: an explicit renewal was requested before any
//!   epoch was loaded.

use std::sync::Arc;

/// Boxed error returned by epoch sources and verifiers.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result type defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `hiloid` can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The generator configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A new epoch could not be acquired or installed.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// The sequence space of the current epoch is exhausted.
    ///
    /// Renewal did not complete in time. The generator must stop issuing
    /// identifiers until a new epoch is loaded.
    #[error("the low 36 bits of generator `{name}` ran out before the epoch was renewed")]
    Exhausted {
        /// Name of the generator.
        name: Arc<str>,
    },

    /// No epoch source has been bound yet.
    #[error("generator `{name}` has no epoch source bound; load an epoch first")]
    RenewalUnbound {
        /// Name of the generator.
        name: Arc<str>,
    },

    /// The renewal lock was poisoned.
    ///
    /// When the `parking-lot` feature is enabled, mutexes do **not** poison,
    /// so this variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("the renewal lock was poisoned")]
    LockPoisoned,
}

/// Rejected generator configuration.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConfigError {
    /// The step is not one of 1, 2, 4, ..., 1024.
    #[error("the step must be a power of two between 1 and 1024, got {step}")]
    InvalidStep {
        /// Requested step.
        step: u32,
    },

    /// The floor is not below the step.
    #[error("the floor must be in [0, {step}), got {floor}")]
    InvalidFloor {
        /// Requested floor.
        floor: u32,
        /// Configured step.
        step: u32,
    },

    /// The section tag does not fit in the section bits.
    #[error("the section must be in [0, 7], got {section}")]
    InvalidSection {
        /// Requested section.
        section: u8,
    },

    /// Obfuscation was requested with a zero seed.
    #[error("the obfuscation seed cannot be zero")]
    ZeroObfuscationSeed,
}

/// Failure to obtain an installable epoch.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum AcquisitionError {
    /// The epoch source returned an error.
    #[error("the epoch source failed: {0}")]
    Source(#[source] BoxError),

    /// The epoch is zero or negative.
    #[error("the epoch must be positive, got {epoch}")]
    NonPositive {
        /// Returned epoch.
        epoch: i64,
    },

    /// The epoch does not fit in the epoch bits.
    #[error("the epoch must not exceed {max:#x}, got {epoch:#x}")]
    OutOfRange {
        /// Returned epoch.
        epoch: i64,
        /// Largest accepted epoch.
        max: i64,
    },

    /// The epoch is the one already installed.
    ///
    /// Reusing it would hand out identifiers that were already issued.
    #[error("the epoch should be a different value other than {epoch}")]
    Duplicate {
        /// Returned epoch.
        epoch: i64,
    },

    /// The configured verifier rejected the epoch.
    #[error("the epoch {epoch} was rejected: {source}")]
    Rejected {
        /// Returned epoch.
        epoch: i64,
        /// Verifier error.
        source: BoxError,
    },
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
