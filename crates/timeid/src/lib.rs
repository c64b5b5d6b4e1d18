mod bits;
mod config;
mod counter;
mod encoding;
mod error;
mod generator;
mod id;
mod mutex;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::bits::*;
pub use crate::config::*;
pub use crate::counter::*;
pub use crate::encoding::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
