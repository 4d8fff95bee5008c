//! Random window offsets
//!
//! Uniform offsets from `rand`, optionally seeded for reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ports::OffsetSource;

/// Uniform offset source over `0..=max_offset`
#[derive(Debug, Clone)]
pub struct RandomOffset {
    rng: StdRng,
}

impl RandomOffset {
    /// Seed from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOffset {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetSource for RandomOffset {
    fn pick(&mut self, max_offset: usize) -> usize {
        self.rng.gen_range(0..=max_offset)
    }
}
