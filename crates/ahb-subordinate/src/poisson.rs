//! Seeded wait-cycle sampling.
//!
//! The wait-state engine (§4.2.4) needs a reproducible source of randomness,
//! not a cryptographically strong one — `ChaCha8Rng` is used purely for its
//! `SeedableRng` determinism, the same role `rand_chacha` plays in this
//! corpus's kernel-scale member.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

/// A seeded generator for Poisson-distributed wait-cycle counts.
pub struct WaitStateRng {
    rng: ChaCha8Rng,
}

impl WaitStateRng {
    /// Seed a new generator deterministically.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Sample a Poisson-distributed value with the given mean, by Knuth's
    /// product-of-uniforms method (§9, design notes).
    ///
    /// Not suitable for large means (risk of underflow in the running
    /// product), which is not a concern here: AHB wait-cycle means are a
    /// handful of cycles at most.
    pub fn sample_poisson(&mut self, mean: f64) -> u64 {
        if mean <= 0.0 {
            return 0;
        }
        let l = (-mean).exp();
        let mut k = 0u64;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.next_uniform();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// A uniform sample in `[0, 1)`, built from the raw generator.
    fn next_uniform(&mut self) -> f64 {
        let bits = self.rng.next_u32();
        f64::from(bits) / f64::from(u32::MAX)
    }
}
