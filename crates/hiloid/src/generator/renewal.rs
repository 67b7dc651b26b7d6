use core::any::Any;
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use crate::{
    AcquisitionError, EpochSource, Error, Logger, MAX_EPOCH, MAX_SECTIONED_EPOCH, RenewalTask,
    Result, SEQUENCE_BITS, Spawner,
    generator::{MutexGuard, hilo::Inner},
};

type BoundSource = Option<Arc<dyn EpochSource>>;

impl<L, S> Inner<L, S>
where
    L: Logger,
    S: Spawner,
{
    /// Acquires an epoch from `source`, installs it and binds `source` for
    /// later renewals if nothing is bound yet.
    ///
    /// The lease is dropped before returning on every path, which runs its
    /// cleanup.
    #[tracing::instrument(level = "debug", skip_all, fields(generator = %self.config.name))]
    pub(crate) fn load_epoch(&self, source: Arc<dyn EpochSource>) -> Result<()> {
        let lease = source.acquire().map_err(AcquisitionError::Source)?;
        let epoch = lease.epoch();
        self.verify_epoch(epoch)?;

        self.engine.reset(epoch << SEQUENCE_BITS);
        self.logger
            .info(&self.config.name, format_args!("new epoch {epoch} loaded"));

        let mut bound = self.bound_source()?;
        if bound.is_none() {
            *bound = Some(source);
        }
        Ok(())
    }

    fn verify_epoch(&self, epoch: i64) -> Result<(), AcquisitionError> {
        if epoch <= 0 {
            return Err(AcquisitionError::NonPositive { epoch });
        }

        let sectioned = self.config.section() != 0;
        let max = if sectioned {
            MAX_SECTIONED_EPOCH
        } else {
            MAX_EPOCH
        };
        if epoch > max {
            return Err(AcquisitionError::OutOfRange { epoch, max });
        }

        let current = self.engine.current();
        let current = if sectioned {
            current.sectioned_epoch()
        } else {
            current.epoch()
        };
        if epoch == current {
            return Err(AcquisitionError::Duplicate { epoch });
        }

        if let Some(verifier) = &self.config.verifier {
            verifier
                .verify(epoch)
                .map_err(|source| AcquisitionError::Rejected { epoch, source })?;
        }
        Ok(())
    }

    pub(crate) fn renew_now(&self) -> Result<()> {
        // Clone out so the lock is not held across the store call.
        let source = self.bound_source()?.clone();
        match source {
            Some(source) => self.load_epoch(source),
            None => Err(Error::RenewalUnbound {
                name: Arc::clone(&self.config.name),
            }),
        }
    }

    /// Hands a renewal to the spawner without blocking the caller.
    pub(crate) fn renew_in_background(self: &Arc<Self>) {
        let inner = Arc::clone(self);
        let task: RenewalTask = Box::new(move || inner.run_renewal());
        if let Err(e) = self.spawner.spawn(task) {
            self.logger.warn(
                &self.config.name,
                format_args!("renew failed, the task could not be spawned: {e}"),
            );
            self.stats.record_attempt();
        }
    }

    fn run_renewal(&self) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.renew_now())) {
            Ok(Ok(())) => {
                self.logger
                    .info(&self.config.name, format_args!("renew succeeded"));
                self.stats.record_renewal();
            }
            Ok(Err(e)) => {
                self.logger
                    .warn(&self.config.name, format_args!("renew failed: {e}"));
            }
            Err(payload) => {
                self.logger.warn(
                    &self.config.name,
                    format_args!("renew panicked: {}", panic_message(payload.as_ref())),
                );
            }
        }
        self.stats.record_attempt();
    }

    fn bound_source(&self) -> Result<MutexGuard<'_, BoundSource>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.source.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.source.lock()?)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
