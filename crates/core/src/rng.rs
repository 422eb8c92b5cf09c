//! RNG module - deterministic randomness for question sampling
//!
//! A small LCG is enough for shuffling a quiz catalog and keeps every session
//! reproducible from its seed, which the tests rely on.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform value in `[0, bound)`.
    ///
    /// Multiply-shift keeps the high bits of the LCG (its low bits have short
    /// periods) and the rejection step removes modulo bias.
    pub fn next_below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "next_below requires a positive bound");
        let bound = u32::try_from(bound).unwrap_or(u32::MAX) as u64;

        let mut m = self.next_u32() as u64 * bound;
        if (m as u32 as u64) < bound {
            let threshold = (bound as u32).wrapping_neg() as u64 % bound;
            while ((m as u32) as u64) < threshold {
                m = self.next_u32() as u64 * bound;
            }
        }
        (m >> 32) as usize
    }

    /// Current state, usable as the seed of an identical generator
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
