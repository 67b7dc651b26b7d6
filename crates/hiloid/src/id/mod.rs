mod layout;
mod packed;

pub use layout::*;
pub use packed::*;
