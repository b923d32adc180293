//! Explicit ownership of the fitted rating model. Callers read a snapshot via
//! [`ModelStore::current`]; re-initialization happens under an exclusive lock
//! in [`ModelStore::retrain`], never through ambient process-wide state.

use std::ops::RangeInclusive;
use std::sync::{Arc, RwLock};

use crate::data::PlayerRecord;
use crate::feature::Feature;
use crate::rating::{RatingError, RatingModel};

#[derive(Debug, Default)]
pub struct ModelStore {
    model: RwLock<Option<Arc<RatingModel>>>,
}
impl ModelStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The most recently fitted model, if any. The returned snapshot is
    /// immutable; a concurrent retrain replaces the stored model without
    /// disturbing snapshots already handed out.
    pub fn current(&self) -> Option<Arc<RatingModel>> {
        self.model.read().expect("model lock poisoned").clone()
    }

    /// Fits a replacement model over the given batch and swaps it in.
    pub fn retrain(
        &self,
        records: &[PlayerRecord],
        features: &[Feature],
        target: &[f64],
        bounds: RangeInclusive<f64>,
    ) -> Result<Arc<RatingModel>, RatingError> {
        let fitted = Arc::new(RatingModel::fit(records, features, target, bounds)?);
        *self.model.write().expect("model lock poisoned") = Some(fitted.clone());
        Ok(fitted)
    }
}
