mod counter;
mod interface;
mod lease;

pub use counter::*;
pub use interface::*;
pub use lease::*;
