use std::io;

use tokio::runtime::Handle;

use crate::{RenewalTask, Spawner};

/// A [`Spawner`] using Tokio's blocking thread pool.
///
/// The runtime handle is captured at construction, so `next` may be called
/// from any thread, inside or outside the runtime.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Spawns onto the runtime behind `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawns onto the runtime the caller is running in.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Spawner for TokioSpawner {
    fn spawn(&self, task: RenewalTask) -> io::Result<()> {
        // Detached: the join handle is not needed.
        drop(self.handle.spawn_blocking(task));
        Ok(())
    }
}
