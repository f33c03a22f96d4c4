//! Production random source backed by `rand`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use storefront_core::rng::DeterministicRng;

/// [`DeterministicRng`] over `StdRng`: reproducible when seeded, OS-seeded
/// otherwise.
#[derive(Debug, Clone)]
pub struct StdDeterministicRng(StdRng);

impl StdDeterministicRng {
    /// Seeded generator; the same seed yields the same sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeded generator when `seed` is set, OS-seeded otherwise.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl DeterministicRng for StdDeterministicRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.0.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}
