//! Utility modules shared by the simulator.
//!
//! Currently this is the seedable random source used for rhythm jitter and
//! signal noise.

mod random;

pub use random::{Random, RandomSource};
