use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::insight_core::feature::{validate_binary_labels, validate_vector};
use crate::utils::{validate_threshold, AnalysisError};

/// Solver settings for the logistic regression fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    /// L2 penalty strength
    pub alpha: f64,
    pub max_iterations: u64,
    pub gradient_tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iterations: 100,
            gradient_tolerance: 1e-4,
        }
    }
}

/// Fitted binary logistic regression
///
/// The decision score `intercept + coefficients · x` is the log-odds of the
/// positive class (label 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LogisticModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Log-odds of label 1 for an already scaled vector
    pub fn decision_function(&self, x: &[f64]) -> Result<f64, AnalysisError> {
        validate_vector(x, self.n_features())?;
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>())
    }

    /// Class probabilities `[p(0), p(1)]` for an already scaled vector
    pub fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2], AnalysisError> {
        let p1 = sigmoid(self.decision_function(x)?);
        Ok([1.0 - p1, p1])
    }

    /// Label 1 when its probability is strictly above `threshold`
    pub fn predict(&self, x: &[f64], threshold: f64) -> Result<usize, AnalysisError> {
        validate_threshold(threshold)?;
        let [_, p1] = self.predict_proba(x)?;
        Ok(usize::from(p1 > threshold))
    }

    /// Predict every row of a scaled matrix
    pub fn predict_batch(
        &self,
        x: ArrayView2<'_, f64>,
        threshold: f64,
    ) -> Result<Array1<usize>, AnalysisError> {
        let mut labels = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            labels.push(self.predict(&row.to_vec(), threshold)?);
        }
        Ok(Array1::from(labels))
    }
}

/// Numerically stable logistic function
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Fit a binary logistic regression by maximum likelihood with an L2 penalty
///
/// # Arguments
/// * `x` - Scaled feature matrix (rows=samples)
/// * `y` - Labels in {0, 1}; both classes must be present
/// * `params` - Solver settings
///
/// # Returns
/// * `Ok(LogisticModel)` - Coefficients oriented towards label 1
/// * `Err(AnalysisError)` - If validation or the solver fails
pub fn train_logistic_regression(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, usize>,
    params: &LogisticParams,
) -> Result<LogisticModel, AnalysisError> {
    if x.nrows() == 0 {
        return Err(AnalysisError::ValidationError(
            "empty feature matrix".to_string(),
        ));
    }
    validate_binary_labels(y, x.nrows())?;

    let records = x.to_owned();
    let targets = y.to_owned();
    let dataset = Dataset::new(records, targets);

    let fitted = LogisticRegression::default()
        .alpha(params.alpha)
        .max_iterations(params.max_iterations)
        .gradient_tolerance(params.gradient_tolerance)
        .with_intercept(true)
        .fit(&dataset)
        .map_err(|e| AnalysisError::ModelError(format!("logistic regression failed: {}", e)))?;

    let mut intercept = fitted.intercept();
    let mut coefficients = fitted.params().to_vec();

    // linfa picks its own positive class; flip the sign if that class is 0.
    let probabilities = fitted.predict_probabilities(dataset.records());
    let predicted: Array1<usize> = fitted.predict(dataset.records());
    let positive_class = if probabilities[0] >= 0.5 {
        predicted[0]
    } else {
        1 - predicted[0]
    };
    if positive_class == 0 {
        intercept = -intercept;
        coefficients.iter_mut().for_each(|w| *w = -*w);
    }

    if !intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
        return Err(AnalysisError::ModelError(
            "logistic regression produced non-finite parameters".to_string(),
        ));
    }

    tracing::debug!(
        intercept,
        n_features = coefficients.len(),
        "fitted logistic regression"
    );

    Ok(LogisticModel {
        intercept,
        coefficients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    fn separable() -> (ndarray::Array2<f64>, Array1<usize>) {
        let x = arr2(&[
            [-2.0, -1.5],
            [-1.5, -2.0],
            [-1.0, -1.2],
            [-1.2, -0.8],
            [1.0, 1.1],
            [1.5, 0.9],
            [2.0, 1.8],
            [1.2, 2.1],
        ]);
        let y = arr1(&[0, 0, 0, 0, 1, 1, 1, 1]);
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-40.0) < 1e-6);
        assert!(sigmoid(-800.0).is_finite());
        assert!(sigmoid(800.0).is_finite());
    }

    #[test]
    fn test_train_separable() {
        let (x, y) = separable();
        let model = train_logistic_regression(x.view(), y.view(), &LogisticParams::default()).unwrap();

        assert_eq!(model.n_features(), 2);
        assert!(model.coefficients.iter().all(|w| *w > 0.0));

        let predicted = model.predict_batch(x.view(), 0.5).unwrap();
        assert_eq!(predicted, y);
    }

    #[test]
    fn test_orientation_follows_label_one() {
        // Same points with labels swapped: coefficients must flip sign.
        let (x, y) = separable();
        let flipped = y.mapv(|label| 1 - label);
        let model =
            train_logistic_regression(x.view(), flipped.view(), &LogisticParams::default()).unwrap();

        assert!(model.coefficients.iter().all(|w| *w < 0.0));
        let [p0, p1] = model.predict_proba(&[2.0, 2.0]).unwrap();
        assert!(p0 > p1);
    }

    #[test]
    fn test_train_is_deterministic() {
        let (x, y) = separable();
        let a = train_logistic_regression(x.view(), y.view(), &LogisticParams::default()).unwrap();
        let b = train_logistic_regression(x.view(), y.view(), &LogisticParams::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_train_single_class() {
        let x = arr2(&[[1.0], [2.0]]);
        let y = arr1(&[1, 1]);
        let result = train_logistic_regression(x.view(), y.view(), &LogisticParams::default());
        assert!(matches!(result, Err(AnalysisError::ValidationError(_))));
    }

    #[test]
    fn test_train_dimension_mismatch() {
        let x = arr2(&[[1.0], [2.0]]);
        let y = arr1(&[0, 1, 0]);
        assert!(train_logistic_regression(x.view(), y.view(), &LogisticParams::default()).is_err());
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = LogisticModel {
            intercept: 0.3,
            coefficients: vec![1.5, -2.0],
        };
        for x in [[0.0, 0.0], [3.0, -1.0], [-10.0, 10.0]] {
            let [p0, p1] = model.predict_proba(&x).unwrap();
            assert!((p0 + p1 - 1.0).abs() < 1e-12);
            let label = model.predict(&x, 0.5).unwrap();
            assert_eq!(label, usize::from(p1 > p0));
        }
    }

    #[test]
    fn test_tie_goes_to_label_zero() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![1.0],
        };
        assert_eq!(model.predict(&[0.0], 0.5).unwrap(), 0);
    }

    #[test]
    fn test_decision_wrong_length() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![1.0, 2.0],
        };
        assert!(model.decision_function(&[1.0]).is_err());
        assert!(model.predict(&[1.0, 2.0], 1.5).is_err());
    }
}
