//! Seedable random number generation.
//!
//! Every operator in the crate draws from an explicit generator passed in by
//! the caller; nothing reads thread-local or global randomness except
//! [`from_seed_or_entropy`] when no seed is configured.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a `u64` seed.
///
/// The same seed always yields the same stream, so seeded runs are
/// reproducible.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from a fresh random seed when `None`.
pub fn from_seed_or_entropy(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
