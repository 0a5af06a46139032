//! Seeded random source shared by the engine and its operators.
//!
//! A [`RandomStream`] is owned by one run. Every draw the engine makes
//! (selection, crossover and mutation decisions) and every draw an operator
//! makes goes through the same stream, in program order, so a fixed seed
//! reproduces a run exactly.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic uniform random source for a single run.
///
/// Implements [`RngCore`], so every [`rand::Rng`] method is available:
///
/// ```
/// use genloop::random::RandomStream;
/// use rand::Rng;
///
/// let mut a = RandomStream::new(7);
/// let mut b = RandomStream::new(7);
/// let xs: Vec<u32> = (0..4).map(|_| a.random_range(0..100)).collect();
/// let ys: Vec<u32> = (0..4).map(|_| b.random_range(0..100)).collect();
/// assert_eq!(xs, ys);
/// ```
#[derive(Debug, Clone)]
pub struct RandomStream {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomStream {
    /// Creates a stream seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed this stream was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derives an independent child stream.
    ///
    /// The child seed is drawn from this stream, so forking is itself
    /// reproducible.
    pub fn fork(&mut self) -> Self {
        Self::new(self.rng.next_u64())
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
