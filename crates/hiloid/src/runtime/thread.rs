use std::{io, thread};

use crate::{RenewalTask, Spawner};

/// A [`Spawner`] starting a dedicated OS thread per renewal.
///
/// This is the default spawner. Renewals happen at most once per 2^29
/// generated IDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSpawner;

impl Spawner for ThreadSpawner {
    fn spawn(&self, task: RenewalTask) -> io::Result<()> {
        thread::Builder::new()
            .name("hiloid-renew".into())
            .spawn(task)
            .map(drop)
    }
}
