mod engine;
mod hilo;
mod mutex;
mod renewal;
mod transform;

pub use hilo::*;
pub(crate) use mutex::*;
