//! Synthetic scatter generation for the guessing game.

use serde::{Deserialize, Serialize};

use crate::model::DataPoint;
use crate::statistics::correlation;
use crate::traits::RandomSource;

/// Coordinates are sampled on `[0, AXIS_MAX]`.
pub const AXIS_MAX: f64 = 100.0;

/// A slope/noise pair that controls how strong a round's correlation is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyTier {
    pub name: &'static str,
    /// Slope of the underlying line, in axis units.
    pub slope: f64,
    /// Noise amplitude as a fraction of the axis span.
    pub noise: f64,
}

/// Tiers from strong positive through none to strong negative.
pub const TIERS: [DifficultyTier; 7] = [
    DifficultyTier {
        name: "strong positive",
        slope: 1.0,
        noise: 0.15,
    },
    DifficultyTier {
        name: "moderate positive",
        slope: 0.8,
        noise: 0.6,
    },
    DifficultyTier {
        name: "weak positive",
        slope: 0.4,
        noise: 1.0,
    },
    DifficultyTier {
        name: "none",
        slope: 0.0,
        noise: 1.0,
    },
    DifficultyTier {
        name: "weak negative",
        slope: -0.4,
        noise: 1.0,
    },
    DifficultyTier {
        name: "moderate negative",
        slope: -0.8,
        noise: 0.6,
    },
    DifficultyTier {
        name: "strong negative",
        slope: -1.0,
        noise: 0.15,
    },
];

/// A generated scatter and its exact correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRound {
    pub points: Vec<DataPoint>,
    /// Pearson r of exactly `points`.
    pub true_r: f64,
    /// Name of the tier the round was drawn from.
    pub tier: String,
}

/// Draw a tier and sample `count` points around its line.
///
/// y = 50 + slope * (x - 50) + noise * (u - 0.5) * 100
pub fn generate_round<S: RandomSource + ?Sized>(source: &mut S, count: usize) -> GameRound {
    let tier = TIERS[source.next_index(TIERS.len())];
    generate_round_in_tier(source, tier, count)
}

/// Sample a round from a fixed tier.
pub fn generate_round_in_tier<S: RandomSource + ?Sized>(
    source: &mut S,
    tier: DifficultyTier,
    count: usize,
) -> GameRound {
    let center = AXIS_MAX / 2.0;
    let points: Vec<DataPoint> = (0..count)
        .map(|_| {
            let x = source.next_unit() * AXIS_MAX;
            let jitter = (source.next_unit() - 0.5) * AXIS_MAX;
            DataPoint {
                x,
                y: center + tier.slope * (x - center) + tier.noise * jitter,
            }
        })
        .collect();

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let true_r = correlation(&xs, &ys);

    tracing::debug!(tier = tier.name, points = count, true_r, "generated round");

    GameRound {
        points,
        true_r,
        tier: tier.name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{RngSource, SequenceSource};

    #[test]
    fn tier_is_picked_from_first_sample() {
        let mut source = SequenceSource::new([0.0, 0.25, 0.75]);
        let round = generate_round(&mut source, 4);
        assert_eq!(round.tier, "strong positive");
        assert_eq!(round.points.len(), 4);
        assert_eq!(source.drawn(), 1 + 2 * 4);
    }

    #[test]
    fn noiseless_points_are_exactly_on_the_line() {
        // Every jitter sample is 0.5, so noise cancels out.
        let mut source = SequenceSource::new([0.1, 0.5, 0.3, 0.5, 0.9, 0.5]);
        let tier = DifficultyTier {
            name: "test",
            slope: -1.0,
            noise: 0.8,
        };
        let round = generate_round_in_tier(&mut source, tier, 3);
        let ys: Vec<f64> = round.points.iter().map(|p| p.y).collect();
        assert!((ys[0] - 90.0).abs() < 1e-9);
        assert!((ys[1] - 70.0).abs() < 1e-9);
        assert!((ys[2] - 10.0).abs() < 1e-9);
        assert!((round.true_r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn true_r_matches_generated_points() {
        let mut source = RngSource::seeded(Some(5));
        for _ in 0..20 {
            let round = generate_round(&mut source, 30);
            let xs: Vec<f64> = round.points.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = round.points.iter().map(|p| p.y).collect();
            assert_eq!(round.true_r, correlation(&xs, &ys));
        }
    }

    #[test]
    fn strong_tiers_produce_strong_correlations() {
        let mut source = RngSource::seeded(Some(9));
        for _ in 0..10 {
            let up = generate_round_in_tier(&mut source, TIERS[0], 30);
            let down = generate_round_in_tier(&mut source, TIERS[6], 30);
            assert!(up.true_r > 0.8, "got {}", up.true_r);
            assert!(down.true_r < -0.8, "got {}", down.true_r);
        }
    }
}
