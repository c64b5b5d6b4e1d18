use rand::{Rng, rng};

use crate::rand::RandSource;

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is cryptographically secure (ChaCha-based) and automatically
/// reseeded from the operating system, which is what the random field of a
/// [`WideId`] requires.
///
/// Each OS thread has its own RNG instance, so calls from multiple threads are
/// contention-free. This type does **not** store the RNG itself; it is a
/// zero-sized handle that reaches the thread-local generator on each call, so
/// it is `Send + Sync` even though `ThreadRng` is not.
///
/// [`WideId`]: crate::WideId
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u128> for ThreadRandom {
    fn rand(&self) -> u128 {
        rng().random()
    }
}
