//! Injected randomness
//!
//! Generators never reach for a global source; callers pass a
//! [`RandomSource`]. Any `rand` generator qualifies, so tests fix a seed and
//! hosts use entropy.

use crate::config::Bounds;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A source of uniform samples
pub trait RandomSource {
    /// Uniform sample in `[min, max)`; returns `min` for an empty span
    fn uniform(&mut self, min: f32, max: f32) -> f32;

    /// Uniform sample within `bounds`
    fn sample(&mut self, bounds: &Bounds) -> f32 {
        self.uniform(bounds.min, bounds.max)
    }
}

impl<R: RngCore> RandomSource for R {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.gen_range(min..max)
        } else {
            min
        }
    }
}

/// Deterministic source for reproducible runs
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Source seeded from OS entropy
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}
