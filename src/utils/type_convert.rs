use ndarray::Array2;

use super::error::AnalysisError;

/// Validate threshold is within valid range [0, 1]
///
/// # Arguments
/// * `threshold` - The threshold value to validate
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(AnalysisError::ValidationError)` if out of range
pub fn validate_threshold(threshold: f64) -> Result<(), AnalysisError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AnalysisError::ValidationError(format!(
            "threshold must be 0-1, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Validate a partition ratio lies strictly inside (0, 1)
pub fn validate_ratio(ratio: f64) -> Result<(), AnalysisError> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(AnalysisError::ValidationError(format!(
            "test ratio must be strictly between 0 and 1, got {}",
            ratio
        )));
    }
    Ok(())
}

/// Parse a single CSV cell into a finite f64
///
/// # Arguments
/// * `raw` - Cell text, surrounding whitespace is ignored
/// * `row` - 1-based data row number, used in the error message
/// * `column` - Column name, used in the error message
pub fn parse_finite(raw: &str, row: usize, column: &str) -> Result<f64, AnalysisError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        AnalysisError::SchemaError(format!(
            "row {}: column '{}' is not numeric: '{}'",
            row, column, raw
        ))
    })?;
    if !value.is_finite() {
        return Err(AnalysisError::SchemaError(format!(
            "row {}: column '{}' is not finite: '{}'",
            row, column, raw
        )));
    }
    Ok(value)
}

/// Pack row vectors into a row-major matrix
///
/// # Returns
/// * `Err(AnalysisError::ValidationError)` if any row is not `n_cols` long
pub fn rows_to_matrix(rows: &[Vec<f64>], n_cols: usize) -> Result<Array2<f64>, AnalysisError> {
    let mut flat = Vec::with_capacity(rows.len() * n_cols);
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            return Err(AnalysisError::ValidationError(format!(
                "row {} has {} values, expected {}",
                idx,
                row.len(),
                n_cols
            )));
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), n_cols), flat)
        .map_err(|e| AnalysisError::ValidationError(format!("failed to build matrix: {}", e)))
}
