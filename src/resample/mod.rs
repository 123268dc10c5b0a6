//! Resampling engines: permutation test and bootstrap intervals.
//!
//! Both engines draw from a seeded xorshift generator and derive one stream
//! per resample index, so results are identical whether the iterations run
//! serially or on the rayon pool.

pub mod bootstrap;
pub mod permutation;

pub use bootstrap::{bootstrap_ci_mean_diff, BootstrapInterval};
pub use permutation::{permutation_test, PermutationConfig, PermutationTest};

/// Simple deterministic random number generator (xorshift64).
pub(crate) struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub(crate) fn new(seed: u64) -> Self {
        // Xorshift has a fixed point at zero.
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform index in `[0, bound)`.
    pub(crate) fn index(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }

    /// Fisher-Yates shuffle.
    pub(crate) fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.index(i + 1);
            slice.swap(i, j);
        }
    }
}
