use std::io;

use crate::{RenewalTask, Spawner};

/// A [`Spawner`] using Smol's blocking thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmolSpawner;

impl Spawner for SmolSpawner {
    fn spawn(&self, task: RenewalTask) -> io::Result<()> {
        smol::unblock(task).detach();
        Ok(())
    }
}
