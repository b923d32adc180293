//! The rating model: an ordinary least-squares fit of standard-scored features
//! against a target rating, with per-feature importance and a fit-quality
//! score. Batch fit only; there is no online update.

use std::ops::RangeInclusive;

use linregress::fit_low_level_regression_model;
use thiserror::Error;

use crate::data::{EmptyBatch, PlayerRecord};
use crate::feature::{matrix_of, Feature};
use crate::linear::Matrix;
use crate::scale::{Scaler, ScalingMode};

/// The rating scale predictions are clipped onto.
pub const DEFAULT_RATING_BOUNDS: RangeInclusive<f64> = 70.0..=99.0;

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("{0}")]
    EmptyBatch(#[from] EmptyBatch),

    #[error("regression failed: {0}")]
    Regression(#[from] linregress::Error),
}

#[derive(Debug, Clone)]
pub struct RatingModel {
    features: Vec<Feature>,
    scaler: Scaler,
    intercept: f64,
    coefficients: Vec<f64>,
    std_errors: Vec<f64>,
    p_values: Vec<f64>,
    r_squared: f64,
    r_squared_adj: f64,
    bounds: RangeInclusive<f64>,
}
impl RatingModel {
    /// Fits the model over a batch: standard-scores the feature matrix with
    /// bounds frozen at fit time, then regresses the target on the scaled
    /// features with an intercept.
    pub fn fit(
        records: &[PlayerRecord],
        features: &[Feature],
        target: &[f64],
        bounds: RangeInclusive<f64>,
    ) -> Result<Self, RatingError> {
        if records.is_empty() {
            return Err(EmptyBatch.into());
        }
        assert_eq!(
            records.len(),
            target.len(),
            "{} records against {} target values",
            records.len(),
            target.len()
        );
        let raw = matrix_of(records, features);
        let (scaler, scaled) = Scaler::fit_transform(ScalingMode::Standard, &raw)?;

        // response in column 0, the intercept as an explicit all-ones column
        let mut subset = Matrix::allocate(scaled.rows(), 2 + features.len());
        for (row, row_data) in (&scaled).into_iter().enumerate() {
            let subset_row = subset.row_slice_mut(row);
            subset_row[0] = target[row];
            subset_row[1] = 1.0;
            subset_row[2..].copy_from_slice(row_data);
        }

        let model = fit_low_level_regression_model(subset.flatten(), subset.rows(), subset.cols())?;
        let parameters = model.parameters().to_vec();
        let std_errors = model.se().to_vec();
        let p_values = model.p_values().to_vec();
        Ok(Self {
            features: features.to_vec(),
            scaler,
            intercept: parameters[0],
            coefficients: parameters[1..].to_vec(),
            std_errors,
            p_values,
            r_squared: model.rsquared(),
            r_squared_adj: model.rsquared_adj(),
            bounds,
        })
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn coefficient(&self, ordinal: usize) -> f64 {
        self.coefficients[ordinal]
    }

    pub fn std_error(&self, ordinal: usize) -> f64 {
        // offset past the intercept entry
        self.std_errors[1 + ordinal]
    }

    pub fn p_value(&self, ordinal: usize) -> f64 {
        self.p_values[1 + ordinal]
    }

    /// Predicts a rating for a single record, rounded to one decimal place and
    /// clipped onto the configured bounds.
    pub fn predict(&self, record: &PlayerRecord) -> f64 {
        let raw: Vec<_> = self
            .features
            .iter()
            .map(|feature| feature.extract(record))
            .collect();
        let scaled = self.scaler.transform_row(&raw);
        let rating: f64 = self.intercept
            + scaled
                .iter()
                .zip(&self.coefficients)
                .map(|(value, coefficient)| value * coefficient)
                .sum::<f64>();
        let rating = (rating * 10.0).round() / 10.0;
        rating.clamp(*self.bounds.start(), *self.bounds.end())
    }

    pub fn predict_batch(&self, records: &[PlayerRecord]) -> Vec<f64> {
        records.iter().map(|record| self.predict(record)).collect()
    }

    /// Relative magnitude of each feature's contribution, descending. Ties
    /// preserve feature order.
    pub fn importance(&self) -> Vec<(Feature, f64)> {
        let mut ranking: Vec<_> = self
            .features
            .iter()
            .zip(&self.coefficients)
            .map(|(feature, coefficient)| (*feature, coefficient.abs()))
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }

    /// The coefficient of determination of the training batch.
    pub fn fit_quality(&self) -> f64 {
        self.r_squared
    }

    pub fn fit_quality_adjusted(&self) -> f64 {
        self.r_squared_adj
    }
}
