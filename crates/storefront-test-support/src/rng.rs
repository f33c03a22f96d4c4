//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use storefront_core::rng::DeterministicRng;

/// An RNG that returns values from predetermined sequences. Panics if the
/// integer sequence is exhausted; the float sequence repeats its last value
/// (or `0.5` when empty). Used to script the event simulator.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
    floats: Vec<f64>,
    float_index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given integer values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            index: 0,
            floats: Vec::new(),
            float_index: 0,
        }
    }

    /// Sets the values returned by `next_f64`.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats;
        self
    }

    /// Number of integer values consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }

    fn next_f64(&mut self) -> f64 {
        let val = self
            .floats
            .get(self.float_index)
            .or_else(|| self.floats.last())
            .copied()
            .unwrap_or(0.5);
        self.float_index += 1;
        val
    }
}
