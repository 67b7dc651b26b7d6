use core::fmt;
use std::sync::Arc;

/// Sink for the few log records a generator emits.
///
/// A generator logs at `info` when a new epoch is installed or a background
/// renewal succeeds, and at `warn` when a background renewal fails or panics.
/// Every record carries the generator's name for correlation.
///
/// Implementations must be cheap and must not panic: `warn` is called from
/// inside the panic containment of renewal tasks.
pub trait Logger: Send + Sync + 'static {
    /// Emits an informational record.
    fn info(&self, generator: &str, message: fmt::Arguments<'_>);

    /// Emits a warning record.
    fn warn(&self, generator: &str, message: fmt::Arguments<'_>);
}

/// A [`Logger`] emitting [`tracing`] events with a `generator` field.
///
/// This is the default logger. Install any `tracing` subscriber to see the
/// records.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, generator: &str, message: fmt::Arguments<'_>) {
        tracing::info!(generator, "{message}");
    }

    fn warn(&self, generator: &str, message: fmt::Arguments<'_>) {
        tracing::warn!(generator, "{message}");
    }
}

/// A [`Logger`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _generator: &str, _message: fmt::Arguments<'_>) {}

    fn warn(&self, _generator: &str, _message: fmt::Arguments<'_>) {}
}

impl<L> Logger for Arc<L>
where
    L: Logger + ?Sized,
{
    fn info(&self, generator: &str, message: fmt::Arguments<'_>) {
        (**self).info(generator, message);
    }

    fn warn(&self, generator: &str, message: fmt::Arguments<'_>) {
        (**self).warn(generator, message);
    }
}
