use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::utils::AnalysisError;

/// Standard scaling: (x - mean) / std -> zero mean, unit variance
///
/// Parameters are learned once from the training partition and then applied
/// unchanged at inference. `scale` is the population standard deviation
/// (ddof = 0); constant columns get a scale of 1.0 so they map to 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and standard deviation
    ///
    /// # Arguments
    /// * `features` - Feature matrix (rows=samples, cols=features)
    ///
    /// # Returns
    /// * `Ok(scaler)` - Fitted scaler with one entry per column
    /// * `Err(AnalysisError)` - If the matrix has no rows
    pub fn fit(features: ArrayView2<'_, f64>) -> Result<Self, AnalysisError> {
        if features.nrows() == 0 {
            return Err(AnalysisError::ValidationError(
                "cannot fit scaler on empty feature matrix".to_string(),
            ));
        }

        let mut mean = Vec::with_capacity(features.ncols());
        let mut scale = Vec::with_capacity(features.ncols());

        for col in features.columns() {
            let col_mean = col.mean().unwrap_or(0.0);
            let col_std = col.std(0.0);
            mean.push(col_mean);
            if col_std.abs() < f64::EPSILON {
                scale.push(1.0);
            } else {
                scale.push(col_std);
            }
        }

        Ok(Self { mean, scale })
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Apply the fitted transform to every row of a matrix
    pub fn transform(&self, features: ArrayView2<'_, f64>) -> Result<Array2<f64>, AnalysisError> {
        if features.ncols() != self.n_features() {
            return Err(AnalysisError::ValidationError(format!(
                "scaler expects {} columns, got {}",
                self.n_features(),
                features.ncols()
            )));
        }

        let mut scaled = features.to_owned();
        for (col_idx, mut col) in scaled.columns_mut().into_iter().enumerate() {
            let mean = self.mean[col_idx];
            let scale = self.scale[col_idx];
            col.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(scaled)
    }

    /// Apply the fitted transform to a single feature vector
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        if row.len() != self.n_features() {
            return Err(AnalysisError::ValidationError(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&v, (&mean, &scale))| (v - mean) / scale)
            .collect())
    }

    /// Map a standardized vector back into measurement units
    pub fn inverse_transform_row(&self, row: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        if row.len() != self.n_features() {
            return Err(AnalysisError::ValidationError(format!(
                "scaler expects {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&z, (&mean, &scale))| z * scale + mean)
            .collect())
    }
}

/// MinMax scaling: (x - min) / (max - min) -> [0, 1]
///
/// Used only to place values on the radar chart axes. The bounds come from
/// the whole dataset and have nothing to do with [`StandardScaler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartScaler {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl ChartScaler {
    /// Build from per-feature bounds
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self, AnalysisError> {
        if min.len() != max.len() {
            return Err(AnalysisError::ValidationError(format!(
                "min has {} entries but max has {}",
                min.len(),
                max.len()
            )));
        }
        Ok(Self { min, max })
    }

    /// Learn per-column min and max
    pub fn fit(features: ArrayView2<'_, f64>) -> Result<Self, AnalysisError> {
        if features.nrows() == 0 {
            return Err(AnalysisError::ValidationError(
                "cannot fit chart scaler on empty feature matrix".to_string(),
            ));
        }
        let mut min = Vec::with_capacity(features.ncols());
        let mut max = Vec::with_capacity(features.ncols());
        for col in features.columns() {
            min.push(col.iter().cloned().fold(f64::INFINITY, f64::min));
            max.push(col.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
        }
        Ok(Self { min, max })
    }

    /// Normalize a single feature vector
    ///
    /// # Note
    /// Constant columns (min == max) are set to 0.0
    pub fn normalize_row(&self, row: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        if row.len() != self.min.len() {
            return Err(AnalysisError::ValidationError(format!(
                "chart scaler expects {} features, got {}",
                self.min.len(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.min.iter().zip(&self.max))
            .map(|(&v, (&min, &max))| {
                let range = max - min;
                if range.abs() < f64::EPSILON {
                    0.0
                } else {
                    (v - min) / range
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_standard_scaler_normal() {
        let features = arr2(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);
        let scaler = StandardScaler::fit(features.view()).unwrap();
        let scaled = scaler.transform(features.view()).unwrap();

        // Column 0: mean=2, std≈0.816
        let col0_mean = scaled.column(0).mean().unwrap();
        let col0_std = scaled.column(0).std(0.0);
        assert!((col0_mean - 0.0).abs() < 1e-10);
        assert!((col0_std - 1.0).abs() < 1e-10);

        let col1_mean = scaled.column(1).mean().unwrap();
        let col1_std = scaled.column(1).std(0.0);
        assert!((col1_mean - 0.0).abs() < 1e-10);
        assert!((col1_std - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_standard_scaler_mean_and_one_std() {
        let features = arr2(&[[2.0, 100.0], [4.0, 300.0], [6.0, 200.0], [8.0, 400.0]]);
        let scaler = StandardScaler::fit(features.view()).unwrap();

        let at_mean = scaler.transform_row(&scaler.mean).unwrap();
        assert!(at_mean.iter().all(|z| z.abs() < 1e-12));

        let one_up: Vec<f64> = scaler
            .mean
            .iter()
            .zip(&scaler.scale)
            .map(|(m, s)| m + s)
            .collect();
        let z = scaler.transform_row(&one_up).unwrap();
        assert!(z.iter().all(|v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_standard_scaler_constant_column() {
        let features = arr2(&[[5.0, 10.0], [5.0, 20.0], [5.0, 30.0]]);
        let scaler = StandardScaler::fit(features.view()).unwrap();
        let scaled = scaler.transform(features.view()).unwrap();

        assert_eq!(scaler.scale[0], 1.0);
        assert_eq!(scaled[[0, 0]], 0.0);
        assert_eq!(scaled[[1, 0]], 0.0);
        assert_eq!(scaled[[2, 0]], 0.0);
    }

    #[test]
    fn test_standard_scaler_inverse() {
        let features = arr2(&[[1.0, 10.0], [2.0, 20.0], [3.0, 35.0]]);
        let scaler = StandardScaler::fit(features.view()).unwrap();
        let row = [2.5, 12.0];
        let back = scaler
            .inverse_transform_row(&scaler.transform_row(&row).unwrap())
            .unwrap();
        assert!((back[0] - 2.5).abs() < 1e-10);
        assert!((back[1] - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_standard_scaler_wrong_width() {
        let features = arr2(&[[1.0, 10.0], [2.0, 20.0]]);
        let scaler = StandardScaler::fit(features.view()).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
        assert!(scaler.transform(arr2(&[[1.0, 2.0, 3.0]]).view()).is_err());
    }

    #[test]
    fn test_standard_scaler_empty() {
        let features = Array2::<f64>::zeros((0, 2));
        assert!(StandardScaler::fit(features.view()).is_err());
    }

    #[test]
    fn test_chart_scaler_normal() {
        let features = arr2(&[[0.0, 10.0], [5.0, 20.0], [10.0, 30.0]]);
        let chart = ChartScaler::fit(features.view()).unwrap();

        assert_eq!(chart.normalize_row(&[0.0, 10.0]).unwrap(), vec![0.0, 0.0]);
        assert_eq!(chart.normalize_row(&[5.0, 20.0]).unwrap(), vec![0.5, 0.5]);
        assert_eq!(chart.normalize_row(&[10.0, 30.0]).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_chart_scaler_constant_column() {
        let features = arr2(&[[5.0, 10.0], [5.0, 20.0], [5.0, 30.0]]);
        let chart = ChartScaler::fit(features.view()).unwrap();
        let normalized = chart.normalize_row(&[5.0, 30.0]).unwrap();
        assert_eq!(normalized[0], 0.0);
        assert!((normalized[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_chart_scaler_negative_values() {
        let features = arr2(&[[-10.0], [0.0], [10.0]]);
        let chart = ChartScaler::fit(features.view()).unwrap();
        assert!((chart.normalize_row(&[0.0]).unwrap()[0] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_chart_scaler_differs_from_standardization() {
        let features = arr2(&[[1.0], [2.0], [6.0]]);
        let chart = ChartScaler::fit(features.view()).unwrap();
        let scaler = StandardScaler::fit(features.view()).unwrap();

        let chart_value = chart.normalize_row(&[1.0]).unwrap()[0];
        let model_value = scaler.transform_row(&[1.0]).unwrap()[0];
        assert_eq!(chart_value, 0.0);
        assert!(model_value < 0.0);
        assert_ne!(chart_value, model_value);
    }
}
