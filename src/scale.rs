//! The feature normalizer: linear rescaling with bounds frozen per batch.

use serde::{Deserialize, Serialize};

use crate::data::EmptyBatch;
use crate::linear::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingMode {
    /// `(x - min) / (max - min)`, mapping each column onto [0, 1].
    MinMax,
    /// `(x - mean) / std`, the standard score.
    Standard,
}

// canonical per-column form: (x - offset) / divisor, with divisor 0 denoting a
// zero-variance column whose every value rescales to 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ColumnScale {
    offset: f64,
    divisor: f64,
}
impl ColumnScale {
    fn apply(&self, value: f64) -> f64 {
        if self.divisor == 0.0 {
            0.0
        } else {
            (value - self.offset) / self.divisor
        }
    }
}

/// Per-column rescaling parameters computed once over a batch and frozen
/// thereafter, making every later transform reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    mode: ScalingMode,
    columns: Vec<ColumnScale>,
}
impl Scaler {
    pub fn fit(mode: ScalingMode, matrix: &Matrix) -> Result<Self, EmptyBatch> {
        if matrix.rows() == 0 {
            return Err(EmptyBatch);
        }
        let columns = (0..matrix.cols())
            .map(|col| {
                let column = (0..matrix.rows()).map(|row| matrix[(row, col)]);
                match mode {
                    ScalingMode::MinMax => {
                        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
                        for value in column {
                            min = f64::min(min, value);
                            max = f64::max(max, value);
                        }
                        ColumnScale {
                            offset: min,
                            divisor: max - min,
                        }
                    }
                    ScalingMode::Standard => {
                        let values: Vec<_> = column.collect();
                        let mean = values.iter().sum::<f64>() / values.len() as f64;
                        let variance = values
                            .iter()
                            .map(|value| (value - mean).powi(2))
                            .sum::<f64>()
                            / values.len() as f64;
                        ColumnScale {
                            offset: mean,
                            divisor: variance.sqrt(),
                        }
                    }
                }
            })
            .collect();
        Ok(Self { mode, columns })
    }

    pub fn fit_transform(mode: ScalingMode, matrix: &Matrix) -> Result<(Self, Matrix), EmptyBatch> {
        let scaler = Self::fit(mode, matrix)?;
        let transformed = scaler.transform(matrix);
        Ok((scaler, transformed))
    }

    pub fn mode(&self) -> ScalingMode {
        self.mode
    }

    /// Rescales a batch using the frozen parameters, leaving the input intact.
    pub fn transform(&self, matrix: &Matrix) -> Matrix {
        let mut transformed = Matrix::allocate(matrix.rows(), matrix.cols());
        for row in 0..matrix.rows() {
            let transformed_row = transformed.row_slice_mut(row);
            transformed_row.copy_from_slice(matrix.row_slice(row));
            self.rescale(transformed_row);
        }
        transformed
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        let mut rescaled = row.to_vec();
        self.rescale(&mut rescaled);
        rescaled
    }

    fn rescale(&self, row: &mut [f64]) {
        assert_eq!(
            self.columns.len(),
            row.len(),
            "scaler was fitted over {} columns, given {}",
            self.columns.len(),
            row.len()
        );
        for (value, column) in row.iter_mut().zip(&self.columns) {
            *value = column.apply(*value);
        }
    }
}
