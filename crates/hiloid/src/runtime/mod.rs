mod interface;
#[cfg(feature = "async-smol")]
mod smol;
mod thread;
#[cfg(feature = "async-tokio")]
mod tokio;

pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-smol")))]
#[cfg(feature = "async-smol")]
pub use smol::*;
pub use thread::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub use tokio::*;
