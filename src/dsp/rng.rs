/// Seedable uniform random source for noise, sample-and-hold and dither.
///
/// Each owner keeps its own generator and remembers the seed, so `reset()`
/// can put the sequence back to where a fresh instance would start.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    seed: u64,
    rng: oorandom::Rand32,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: oorandom::Rand32::new(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Restart the sequence from the stored seed.
    pub fn reset(&mut self) {
        self.rng = oorandom::Rand32::new(self.seed);
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unipolar(&mut self) -> f32 {
        self.rng.rand_float()
    }

    /// Uniform in `[-1, 1)`.
    #[inline]
    pub fn bipolar(&mut self) -> f32 {
        2.0 * self.rng.rand_float() - 1.0
    }
}

impl PartialEq for NoiseSource {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.rng.state() == other.rng.state()
    }
}
