//! Hi/lo sequential 64-bit identifiers.
//!
//! A [`HiLoGenerator`] combines an *epoch* handed out by a shared counter
//! store (the high bits) with a lock-free in-process sequence (the low 36
//! bits). The store is only consulted when an epoch is loaded; renewals
//! happen in the background well before the sequence space runs out.
//!
//! ```
//! use hiloid::{AtomicCounterSource, GeneratorConfig, HiLoGenerator, NoopLogger};
//!
//! let config = GeneratorConfig::builder("invoices")
//!     .section(2)
//!     .step(16, 0)
//!     .build()?;
//! let generator: HiLoGenerator<NoopLogger> = HiLoGenerator::new(config);
//! generator.load_epoch(AtomicCounterSource::new())?;
//!
//! let id = generator.decode(generator.next());
//! assert_eq!(id.section(), 2);
//! assert_eq!(id.sectioned_epoch(), 1);
//! assert_eq!(id.sequence(), 16);
//! # Ok::<(), hiloid::Error>(())
//! ```
//!
//! Any closure returning a [`Lease`] is an [`EpochSource`], which is how
//! Redis, SQL or MongoDB backed counters plug in.

mod config;
mod error;
mod generator;
mod id;
mod logger;
mod runtime;
mod source;
mod stats;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::logger::*;
pub use crate::runtime::*;
pub use crate::source::*;
pub use crate::stats::*;
