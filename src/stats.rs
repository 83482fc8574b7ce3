use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::dataset::CleanDataset;

/// Statistics computed for one feature column over the full dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub field: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Statistics {
    /// Compute statistics for a numeric column
    pub fn compute(field: &str, values: ArrayView1<'_, f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mean = values.sum() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Statistics {
            field: field.to_string(),
            mean,
            min,
            max,
        })
    }

    /// Compute statistics for every feature column, in feature order
    pub fn compute_all(dataset: &CleanDataset) -> Vec<Self> {
        dataset
            .feature_names
            .iter()
            .zip(dataset.features.columns())
            .filter_map(|(name, column)| Statistics::compute(name, column))
            .collect()
    }
}
