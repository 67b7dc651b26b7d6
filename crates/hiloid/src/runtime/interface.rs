use std::io;

/// A detached unit of work: one background renewal attempt.
pub type RenewalTask = Box<dyn FnOnce() + Send + 'static>;

/// A trait that abstracts over where background renewals run.
///
/// `next` never waits for a renewal: once the sequence crosses a renewal
/// point, the task is handed to the spawner and `next` returns immediately.
/// Tasks perform blocking I/O through the epoch source, so implementations
/// should run them off any async worker threads.
///
/// Panics inside the task are contained by the task itself; a spawner does
/// not need to catch them.
pub trait Spawner: Send + Sync + 'static {
    /// Starts `task` without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the task could not be started. The task is
    /// dropped in that case.
    fn spawn(&self, task: RenewalTask) -> io::Result<()>;
}
