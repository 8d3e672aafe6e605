//! Seams the host injects into the core.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Random source
// ---------------------------------------------------------------------------

/// Source of uniform samples used to generate game rounds.
///
/// Tests supply a [`SequenceSource`] to get exact, repeatable rounds.
pub trait RandomSource {
    /// Next sample, uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f64) as usize).min(len - 1)
    }
}

/// Adapter for any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng>(pub R);

impl RngSource<ChaCha8Rng> {
    /// Seeded generator when `seed` is set, otherwise seeded from OS entropy.
    pub fn seeded(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => RngSource(ChaCha8Rng::seed_from_u64(seed)),
            None => RngSource(ChaCha8Rng::from_entropy()),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    /// Values are clamped into `[0, 1)`; an empty list always yields `0.0`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
            position: 0,
        }
    }

    /// Number of samples drawn so far.
    pub fn drawn(&self) -> usize {
        self.position
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_source_cycles() {
        let mut source = SequenceSource::new([0.1, 0.2]);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.2);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.drawn(), 3);
    }

    #[test]
    fn sequence_source_clamps() {
        let mut source = SequenceSource::new([1.5, -2.0]);
        assert!(source.next_unit() < 1.0);
        assert_eq!(source.next_unit(), 0.0);
    }

    #[test]
    fn next_index_stays_in_range() {
        let mut source = SequenceSource::new([0.0, 0.5, 0.999_999]);
        assert_eq!(source.next_index(7), 0);
        assert_eq!(source.next_index(7), 3);
        assert_eq!(source.next_index(7), 6);
    }

    #[test]
    fn seeded_rng_is_repeatable() {
        let mut a = RngSource::seeded(Some(42));
        let mut b = RngSource::seeded(Some(42));
        for _ in 0..10 {
            let x = a.next_unit();
            assert!((0.0..1.0).contains(&x));
            assert_eq!(x, b.next_unit());
        }
    }
}
