mod encoded;
mod native;

pub use encoded::*;
pub use native::*;
