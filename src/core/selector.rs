//! Weighted random selection.
//!
//! Every participant owns a contiguous slice of `[0, total)` sized by its
//! effective weight.  A uniform draw lands in exactly one slice and that
//! slice's index is the winner.

use rand::{rngs::StdRng, Rng, SeedableRng};

// ───────────────────────────────────────── random source ─────

/// Uniform `[0, 1)` generator consumed by [`select_index`].
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Default source backed by a seedable [`StdRng`].
pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible spins (`--seed`).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SystemRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

// ───────────────────────────────────────── distribution ──────

/// Effective weight: zero, negative and non-finite weights all count as 1.
pub fn effective_weight(declared: f64) -> f64 {
    if declared.is_finite() {
        declared.max(1.0)
    } else {
        1.0
    }
}

/// Ordered effective weights plus their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightDistribution {
    weights: Vec<f64>,
    total: f64,
}

impl WeightDistribution {
    /// Build from declared weights, clamping each one.
    pub fn from_declared<I>(declared: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let weights: Vec<f64> = declared.into_iter().map(effective_weight).collect();
        let total = weights.iter().sum();
        Self { weights, total }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Draw an index from this distribution.
    pub fn sample(&self, random: &mut impl RandomSource) -> usize {
        select_index(&self.weights, self.total, random)
    }
}

// ───────────────────────────────────────── algorithm ─────────

/// Pick an index with probability proportional to `weights[i]`.
///
/// `total` must be the sum of `weights`; it is taken from the caller so the
/// sum is not recomputed per spin.  When the draw falls past every interval
/// (rounding at the upper boundary, or an inconsistent `total`) the result
/// is index 0.
pub fn select_index(weights: &[f64], total: f64, random: &mut impl RandomSource) -> usize {
    let mut r = random.next_unit() * total;
    for (i, &w) in weights.iter().enumerate() {
        if r < w {
            return i;
        }
        r -= w;
    }
    0
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed sequence of unit draws, cycling when exhausted.
    pub(crate) struct SequenceSource {
        values: Vec<f64>,
        next: usize,
    }

    impl SequenceSource {
        pub(crate) fn new(values: Vec<f64>) -> Self {
            Self { values, next: 0 }
        }
    }

    impl RandomSource for SequenceSource {
        fn next_unit(&mut self) -> f64 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    #[test]
    fn draw_lands_in_matching_interval() {
        // 2.5 / 4 = 0.625 → r = 2.5, intervals [0,1) [1,2) [2,4)
        let mut src = SequenceSource::new(vec![0.625]);
        assert_eq!(select_index(&[1.0, 1.0, 2.0], 4.0, &mut src), 2);

        let mut src = SequenceSource::new(vec![0.0, 0.25, 0.4999, 0.5, 0.99]);
        let picks: Vec<usize> = (0..5)
            .map(|_| select_index(&[1.0, 1.0, 2.0], 4.0, &mut src))
            .collect();
        assert_eq!(picks, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn index_always_in_range() {
        let weights = [3.0, 1.0, 7.5, 1.0, 2.0];
        let total: f64 = weights.iter().sum();
        let draws: Vec<f64> = (0..200).map(|i| i as f64 / 200.0).collect();
        let mut src = SequenceSource::new(draws);
        for _ in 0..200 {
            assert!(select_index(&weights, total, &mut src) < weights.len());
        }
    }

    #[test]
    fn overshooting_total_falls_back_to_first() {
        // Inconsistent total: draw lands past every interval.
        let mut src = SequenceSource::new(vec![0.9]);
        assert_eq!(select_index(&[1.0, 1.0], 10.0, &mut src), 0);

        let mut src = SequenceSource::new(vec![0.5]);
        assert_eq!(select_index(&[], 0.0, &mut src), 0);
    }

    #[test]
    fn non_positive_weights_are_clamped() {
        let dist = WeightDistribution::from_declared([0.0, -4.0, 3.0, f64::NAN, f64::INFINITY]);
        assert_eq!(dist.weights(), &[1.0, 1.0, 3.0, 1.0, 1.0]);
        assert_eq!(dist.total(), 7.0);
    }

    #[test]
    fn zero_weight_still_reachable() {
        let dist = WeightDistribution::from_declared([0.0, 5.0]);
        // total 6 → 0.1 * 6 = 0.6 < 1
        let mut src = SequenceSource::new(vec![0.1]);
        assert_eq!(dist.sample(&mut src), 0);
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let dist = WeightDistribution::from_declared([1.0, 2.0, 3.0, 4.0]);
        let mut a = SystemRandom::seeded(7);
        let mut b = SystemRandom::seeded(7);
        let first: Vec<usize> = (0..32).map(|_| dist.sample(&mut a)).collect();
        let second: Vec<usize> = (0..32).map(|_| dist.sample(&mut b)).collect();
        assert_eq!(first, second);
    }
}
