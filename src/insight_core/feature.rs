use ndarray::{Array2, ArrayView1};

use crate::utils::AnalysisError;

/// Validate feature matrix dimensions and values
///
/// # Arguments
/// * `features` - Feature matrix to validate
/// * `expected_cols` - Width the downstream transforms were built for
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(AnalysisError::ValidationError)` if invalid
pub fn validate_features(features: &Array2<f64>, expected_cols: usize) -> Result<(), AnalysisError> {
    if features.nrows() == 0 {
        return Err(AnalysisError::ValidationError(
            "feature matrix cannot be empty".to_string(),
        ));
    }

    if features.ncols() != expected_cols {
        return Err(AnalysisError::ValidationError(format!(
            "feature matrix must have {} columns, got {}",
            expected_cols,
            features.ncols()
        )));
    }

    // Check for NaN or Inf values
    if features.iter().any(|value| !value.is_finite()) {
        return Err(AnalysisError::ValidationError(
            "feature matrix contains NaN or Inf values".to_string(),
        ));
    }

    Ok(())
}

/// Validate a single feature vector against the fitted width
pub fn validate_vector(vector: &[f64], expected_len: usize) -> Result<(), AnalysisError> {
    if vector.len() != expected_len {
        return Err(AnalysisError::ValidationError(format!(
            "feature vector must have {} values, got {}",
            expected_len,
            vector.len()
        )));
    }

    if let Some(idx) = vector.iter().position(|value| !value.is_finite()) {
        return Err(AnalysisError::ValidationError(format!(
            "feature vector value at position {} is NaN or Inf",
            idx
        )));
    }

    Ok(())
}

/// Validate a label vector holds both binary classes and matches the row count
pub fn validate_binary_labels(labels: ArrayView1<'_, usize>, n_rows: usize) -> Result<(), AnalysisError> {
    if labels.len() != n_rows {
        return Err(AnalysisError::ValidationError(format!(
            "x rows ({}) must match y length ({})",
            n_rows,
            labels.len()
        )));
    }
    if let Some(bad) = labels.iter().find(|&&label| label > 1) {
        return Err(AnalysisError::ValidationError(format!(
            "labels must be 0 or 1, got {}",
            bad
        )));
    }
    let positives = labels.iter().filter(|&&label| label == 1).count();
    if positives == 0 || positives == labels.len() {
        return Err(AnalysisError::ValidationError(
            "training labels must contain both classes".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_validate_features_valid() {
        let features = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        assert!(validate_features(&features, 2).is_ok());
    }

    #[test]
    fn test_validate_features_empty_rows() {
        let features = Array2::<f64>::zeros((0, 2));
        assert!(validate_features(&features, 2).is_err());
    }

    #[test]
    fn test_validate_features_wrong_width() {
        let features = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let err = validate_features(&features, 30).unwrap_err();
        assert!(err.to_string().contains("30 columns"));
    }

    #[test]
    fn test_validate_features_with_nan() {
        let features = arr2(&[[1.0, f64::NAN], [3.0, 4.0]]);
        let result = validate_features(&features, 2);
        assert!(result.unwrap_err().to_string().contains("NaN"));
    }

    #[test]
    fn test_validate_features_with_inf() {
        let features = arr2(&[[1.0, f64::INFINITY], [3.0, 4.0]]);
        let result = validate_features(&features, 2);
        assert!(result.unwrap_err().to_string().contains("Inf"));
    }

    #[test]
    fn test_validate_vector() {
        assert!(validate_vector(&[1.0, 2.0, 3.0], 3).is_ok());
        assert!(validate_vector(&[1.0, 2.0], 3).is_err());
        let err = validate_vector(&[1.0, f64::NAN, 3.0], 3).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_validate_binary_labels() {
        assert!(validate_binary_labels(arr1(&[0, 1, 1]).view(), 3).is_ok());
        assert!(validate_binary_labels(arr1(&[0, 0, 0]).view(), 3).is_err());
        assert!(validate_binary_labels(arr1(&[1, 1]).view(), 2).is_err());
        assert!(validate_binary_labels(arr1(&[0, 2]).view(), 2).is_err());
        assert!(validate_binary_labels(arr1(&[0, 1]).view(), 3).is_err());
    }
}
