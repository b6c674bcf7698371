//! Deterministic PRNG for ambiguous word choice.
//!
//! Lexical translation must be reproducible under test, so randomness is an
//! explicit seeded source passed through the call, never a hidden global
//! generator. splitmix64 is plenty for uniform candidate picks.

/// Deterministic PRNG based on splitmix64.
#[derive(Debug, Clone)]
pub struct SimpleRng(u64);

impl SimpleRng {
    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the next pseudo-random u64.
    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Returns a uniform index in `0..len`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}
