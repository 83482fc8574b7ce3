/// Utility modules for error handling, type conversions and scaling
pub mod error;
pub mod scaling;
pub mod type_convert;

// Re-export commonly used types
pub use error::AnalysisError;
pub use scaling::{ChartScaler, StandardScaler};
pub use type_convert::{parse_finite, rows_to_matrix, validate_ratio, validate_threshold};
