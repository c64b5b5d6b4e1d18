mod be_bytes;
mod interface;

pub use be_bytes::*;
pub use interface::*;
