//! Feature vectors: numeric stat extraction and one-hot position encoding.

use ordinalizer::Ordinal;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

use crate::data::{PlayerRecord, Position};
use crate::linear::Matrix;

pub trait AsIndex {
    fn as_index(&self) -> usize;
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Ordinal,
    Display,
    EnumCountMacro,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Feature {
    Goals,
    Assists,
    PassesCompleted,
    PassAccuracy,
    ShotAccuracy,
    TacklesWon,
}
impl AsIndex for Feature {
    fn as_index(&self) -> usize {
        self.ordinal()
    }
}
impl Feature {
    pub fn extract(&self, record: &PlayerRecord) -> f64 {
        match self {
            Feature::Goals => record.goals as f64,
            Feature::Assists => record.assists as f64,
            Feature::PassesCompleted => record.passes_completed as f64,
            Feature::PassAccuracy => record.pass_accuracy,
            Feature::ShotAccuracy => record.shot_accuracy,
            Feature::TacklesWon => record.tackles_won as f64,
        }
    }
}

/// The feature set used by the baseline performance scorer and the similarity
/// ranker.
pub const SCORED_FEATURES: [Feature; 5] = [
    Feature::Goals,
    Feature::Assists,
    Feature::PassAccuracy,
    Feature::ShotAccuracy,
    Feature::TacklesWon,
];

/// The feature set used by the rating model.
pub const RATED_FEATURES: [Feature; 6] = [
    Feature::Goals,
    Feature::Assists,
    Feature::PassesCompleted,
    Feature::PassAccuracy,
    Feature::ShotAccuracy,
    Feature::TacklesWon,
];

/// Builds a feature matrix: one row per record, one column per feature, in the
/// given feature order.
pub fn matrix_of(records: &[PlayerRecord], features: &[Feature]) -> Matrix {
    let mut matrix = Matrix::allocate(records.len(), features.len());
    for (row, record) in records.iter().enumerate() {
        let row_slice = matrix.row_slice_mut(row);
        for (col, feature) in features.iter().enumerate() {
            row_slice[col] = feature.extract(record);
        }
    }
    matrix
}

/// Appends a one-hot position block to a numeric feature matrix. The one-hot
/// columns are 0/1 indicators and are never rescaled.
pub fn with_position_one_hot(numeric: &Matrix, records: &[PlayerRecord]) -> Matrix {
    assert_eq!(
        numeric.rows(),
        records.len(),
        "matrix carries {} rows for {} records",
        numeric.rows(),
        records.len()
    );
    let mut encoded = Matrix::allocate(numeric.rows(), numeric.cols() + Position::COUNT);
    for (row, record) in records.iter().enumerate() {
        let row_slice = encoded.row_slice_mut(row);
        row_slice[..numeric.cols()].copy_from_slice(numeric.row_slice(row));
        for (ordinal, position) in Position::iter().enumerate() {
            row_slice[numeric.cols() + ordinal] = if record.position == position { 1.0 } else { 0.0 };
        }
    }
    encoded
}
