use thiserror::Error;

/// Custom error type for pipeline operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Validation errors (e.g., invalid threshold, wrong vector length, empty matrix)
    #[error("ValidationError: {0}")]
    ValidationError(String),
    /// Dataset schema errors (missing columns, unknown labels, bad cells)
    #[error("SchemaError: {0}")]
    SchemaError(String),
    /// Model training/prediction errors
    #[error("ModelError: {0}")]
    ModelError(String),
    /// Persisted bundle is unreadable or inconsistent
    #[error("ArtifactError: {0}")]
    ArtifactError(String),
}
