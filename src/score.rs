//! The performance scorer: a weighted blend of normalized features.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feature::Feature;
use crate::linear::Matrix;

pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// A feature → weight mapping. Weights must sum to 1 within
/// [`WEIGHT_TOLERANCE`] and may only reference features present in the scored
/// matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(FxHashMap<Feature, f64>);

impl Default for Weights {
    /// The baseline scoring blend: goals 0.30, assists 0.20, pass accuracy
    /// 0.15, shot accuracy 0.20, tackles won 0.15.
    fn default() -> Self {
        Self(FxHashMap::from_iter([
            (Feature::Goals, 0.30),
            (Feature::Assists, 0.20),
            (Feature::PassAccuracy, 0.15),
            (Feature::ShotAccuracy, 0.20),
            (Feature::TacklesWon, 0.15),
        ]))
    }
}

impl Weights {
    pub fn new(entries: impl IntoIterator<Item = (Feature, f64)>) -> Self {
        Self(FxHashMap::from_iter(entries))
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.0.get(&feature).copied()
    }

    pub fn validate(&self, features: &[Feature]) -> Result<(), InvalidWeights> {
        for feature in self.0.keys() {
            if !features.contains(feature) {
                return Err(InvalidWeights::MissingFeature(*feature));
            }
        }
        let sum: f64 = self.0.values().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(InvalidWeights::WrongSum(sum));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum InvalidWeights {
    #[error("weighted feature {0} is absent from the batch")]
    MissingFeature(Feature),

    #[error("weights sum to {0}, expected 1 within a tolerance of 1e-6")]
    WrongSum(f64),
}

/// Computes `100 * Σ(normalized[feature] * weight)` per row, rounded to two
/// decimal places. Pure: the same batch and weights always yield the same
/// scores.
pub fn performance_scores(
    normalized: &Matrix,
    features: &[Feature],
    weights: &Weights,
) -> Result<Vec<f64>, InvalidWeights> {
    weights.validate(features)?;
    let scores = normalized
        .into_iter()
        .map(|row| {
            let score: f64 = features
                .iter()
                .enumerate()
                .filter_map(|(col, feature)| weights.get(*feature).map(|weight| row[col] * weight))
                .sum();
            round2(score * 100.0)
        })
        .collect();
    Ok(scores)
}

/// The alternate efficiency blend, computed over standard-scored features:
/// `0.4·pass_accuracy + 0.4·shot_accuracy + 0.2·(goals + 0.5·assists)`.
pub fn efficiency_scores(
    standardized: &Matrix,
    features: &[Feature],
) -> Result<Vec<f64>, InvalidWeights> {
    let col = |feature: Feature| {
        features
            .iter()
            .position(|candidate| *candidate == feature)
            .ok_or(InvalidWeights::MissingFeature(feature))
    };
    let pass_accuracy = col(Feature::PassAccuracy)?;
    let shot_accuracy = col(Feature::ShotAccuracy)?;
    let goals = col(Feature::Goals)?;
    let assists = col(Feature::Assists)?;
    let scores = standardized
        .into_iter()
        .map(|row| {
            let goal_contribution = row[goals] + 0.5 * row[assists];
            0.4 * row[pass_accuracy] + 0.4 * row[shot_accuracy] + 0.2 * goal_contribution
        })
        .collect();
    Ok(scores)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;
    use crate::scale::{Scaler, ScalingMode};
    use crate::testing::assert_slice_f64_relative;

    fn matrix_from(rows: usize, cols: usize, data: &[f64]) -> Matrix {
        let mut matrix = Matrix::allocate(rows, cols);
        matrix.flatten_mut().clone_from_slice(data);
        matrix
    }

    #[test]
    fn baseline_weights_are_valid() {
        let features = [
            Feature::Goals,
            Feature::Assists,
            Feature::PassAccuracy,
            Feature::ShotAccuracy,
            Feature::TacklesWon,
        ];
        assert!(Weights::default().validate(&features).is_ok());
    }

    #[test]
    fn rejects_weights_summing_away_from_one() {
        let features = [Feature::Goals, Feature::Assists];
        for bad_sum in [0.9, 1.1] {
            let weights = Weights::new([
                (Feature::Goals, bad_sum / 2.0),
                (Feature::Assists, bad_sum / 2.0),
            ]);
            match weights.validate(&features) {
                Err(InvalidWeights::WrongSum(sum)) => assert_float_absolute_eq!(bad_sum, sum, 1e-9),
                other => panic!("expected wrong sum, got {other:?}"),
            }
        }
    }

    #[test]
    fn accepts_weights_within_tolerance_of_one() {
        let features = [Feature::Goals, Feature::Assists];
        for nudge in [-9e-7, 0.0, 9e-7] {
            let weights =
                Weights::new([(Feature::Goals, 0.5), (Feature::Assists, 0.5 + nudge)]);
            assert!(weights.validate(&features).is_ok(), "nudge {nudge}");
        }
    }

    #[test]
    fn rejects_weight_for_absent_feature() {
        let weights = Weights::new([(Feature::Goals, 0.5), (Feature::TacklesWon, 0.5)]);
        assert!(matches!(
            weights.validate(&[Feature::Goals, Feature::Assists]),
            Err(InvalidWeights::MissingFeature(Feature::TacklesWon))
        ));
    }

    #[test]
    fn score_is_invariant_to_feature_order() {
        let weights = Weights::new([
            (Feature::Goals, 0.4),
            (Feature::Assists, 0.35),
            (Feature::TacklesWon, 0.25),
        ]);
        let forward = matrix_from(1, 3, &[0.3, 0.6, 0.9]);
        let reversed = matrix_from(1, 3, &[0.9, 0.6, 0.3]);
        let scored_forward = performance_scores(
            &forward,
            &[Feature::Goals, Feature::Assists, Feature::TacklesWon],
            &weights,
        )
        .unwrap();
        let scored_reversed = performance_scores(
            &reversed,
            &[Feature::TacklesWon, Feature::Assists, Feature::Goals],
            &weights,
        )
        .unwrap();
        assert_float_absolute_eq!(scored_forward[0], scored_reversed[0], 1e-6);
    }

    #[test]
    fn scores_three_record_batch_end_to_end() {
        // goals [10, 0, 5] and assists [0, 10, 5] normalize to [1, 0, .5] and
        // [0, 1, .5]; a 50/50 blend scores every record at exactly 50
        let raw = matrix_from(3, 2, &[10.0, 0.0, 0.0, 10.0, 5.0, 5.0]);
        let features = [Feature::Goals, Feature::Assists];
        let (_, normalized) = Scaler::fit_transform(ScalingMode::MinMax, &raw).unwrap();
        assert_slice_f64_relative(&[1.0, 0.0, 0.0, 1.0, 0.5, 0.5], normalized.flatten(), 1e-9);
        let weights = Weights::new([(Feature::Goals, 0.5), (Feature::Assists, 0.5)]);
        let scores = performance_scores(&normalized, &features, &weights).unwrap();
        assert_eq!(vec![50.0, 50.0, 50.0], scores);
    }

    #[test]
    fn scores_round_to_two_decimal_places() {
        let matrix = matrix_from(1, 1, &[1.0 / 3.0]);
        let weights = Weights::new([(Feature::Goals, 1.0)]);
        let scores = performance_scores(&matrix, &[Feature::Goals], &weights).unwrap();
        assert_eq!(vec![33.33], scores);
    }

    #[test]
    fn efficiency_blend_weighs_accuracy_over_involvement() {
        #[rustfmt::skip]
        let standardized = matrix_from(2, 4, &[
            1.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 1.0,
        ]);
        let features = [
            Feature::Goals,
            Feature::Assists,
            Feature::PassAccuracy,
            Feature::ShotAccuracy,
        ];
        let scores = efficiency_scores(&standardized, &features).unwrap();
        // involvement-only row: 0.2 * (1 + 0.5); accuracy-only row: 0.4 + 0.4
        assert_slice_f64_relative(&[0.3, 0.8], &scores, 1e-9);
    }

    #[test]
    fn efficiency_requires_its_features() {
        let standardized = matrix_from(1, 2, &[1.0, 1.0]);
        assert!(matches!(
            efficiency_scores(&standardized, &[Feature::Goals, Feature::Assists]),
            Err(InvalidWeights::MissingFeature(Feature::PassAccuracy))
        ));
    }
}
