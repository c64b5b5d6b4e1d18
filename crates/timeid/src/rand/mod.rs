mod interface;
#[cfg(feature = "thread-random")]
mod thread_random;

pub use interface::*;
#[cfg_attr(docsrs, doc(cfg(feature = "thread-random")))]
#[cfg(feature = "thread-random")]
pub use thread_random::*;
