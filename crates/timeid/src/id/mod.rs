mod compact;
mod interface;
mod wide;

pub use compact::*;
pub use interface::*;
pub use wide::*;
