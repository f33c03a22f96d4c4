//! Random number generator abstraction.
//!
//! The event simulator draws every random choice through this trait. In
//! production it wraps a real RNG; tests inject a scripted sequence.

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Pick an index into a collection of length `len`.
    ///
    /// `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let max = u32::try_from(len.saturating_sub(1)).unwrap_or(u32::MAX);
        self.next_u32_range(0, max) as usize
    }
}
