//! Seeded randomness helpers. All simulation randomness flows through one `ChaCha8Rng`.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform roll in `0..upper`. `upper` must be non-zero.
pub(crate) fn roll(rng: &mut ChaCha8Rng, upper: usize) -> usize {
    debug_assert!(upper > 0);
    (rng.next_u64() % upper as u64) as usize
}

/// Uniform roll in the inclusive range `low..=high`.
pub(crate) fn roll_between(rng: &mut ChaCha8Rng, low: usize, high: usize) -> usize {
    debug_assert!(low <= high);
    low + roll(rng, high - low + 1)
}
