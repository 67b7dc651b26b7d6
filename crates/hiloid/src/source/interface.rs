use crate::{BoxError, Lease};

/// A shared counter handing out epochs.
///
/// Store adapters (a Redis `INCR`, an auto-increment row, a document counter,
/// an HTTP callback...) implement this trait and hand it to
/// [`HiLoGenerator::load_epoch`]. The generator keeps the first source it
/// successfully loads from and calls it again from a background task each
/// time the sequence space nears exhaustion.
///
/// # Contract
///
/// - Every successful call returns an epoch strictly greater than any epoch
///   previously returned for the same logical counter.
/// - Calls may be retried freely.
/// - Calls may happen on a background thread. The source owns its timeout
///   policy; the generator imposes none.
///
/// Any `Fn() -> Result<Lease, E>` closure is a source.
///
/// [`HiLoGenerator::load_epoch`]: crate::HiLoGenerator::load_epoch
pub trait EpochSource: Send + Sync + 'static {
    /// Increments the shared counter and returns its new value.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying store reports.
    fn acquire(&self) -> Result<Lease, BoxError>;
}

impl<F, E> EpochSource for F
where
    F: Fn() -> Result<Lease, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn acquire(&self) -> Result<Lease, BoxError> {
        self().map_err(Into::into)
    }
}

/// A caller-supplied check run on every acquired epoch before installation.
///
/// Any `Fn(i64) -> Result<(), E>` closure is a verifier.
pub trait EpochVerifier: Send + Sync + 'static {
    /// Accepts or rejects `epoch`.
    ///
    /// # Errors
    ///
    /// Returns the reason the epoch must not be installed.
    fn verify(&self, epoch: i64) -> Result<(), BoxError>;
}

impl<F, E> EpochVerifier for F
where
    F: Fn(i64) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    fn verify(&self, epoch: i64) -> Result<(), BoxError> {
        self(epoch).map_err(Into::into)
    }
}
