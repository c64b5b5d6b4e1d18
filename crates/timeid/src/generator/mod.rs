mod content;
mod shard;
mod sharded;
#[cfg(test)]
mod tests;

pub use shard::*;
pub use sharded::*;
