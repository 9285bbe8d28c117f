//! Random source construction.
//!
//! Every sampling call in this crate draws from a caller-owned random
//! source; nothing is global. Reproducible runs seed from a fixed
//! integer, production runs seed from entropy and record the seed.
//!
//! # Reproducibility
//!
//! For reproducible simulations, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform. Parallel workers each own an independent
//! generator seeded via [`stream_seed`], so results do not depend on
//! thread scheduling.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use flightrisk_core::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Derives a decorrelated seed for worker `stream` from a base seed.
///
/// # Algorithm
/// SplitMix64 finalizer applied to `base + (stream + 1)·γ` with the
/// golden-ratio increment γ. Nearby stream indices map to statistically
/// independent seeds, so batch 0 and batch 1 never share a prefix.
///
/// Reference: Steele, Lea & Flood (2014), "Fast Splittable Pseudorandom
/// Number Generators", *OOPSLA 2014*.
///
/// # Examples
/// ```
/// use flightrisk_core::random::stream_seed;
/// assert_ne!(stream_seed(42, 0), stream_seed(42, 1));
/// assert_eq!(stream_seed(42, 3), stream_seed(42, 3));
/// ```
pub fn stream_seed(base: u64, stream: u64) -> u64 {
    let mut z = base.wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
