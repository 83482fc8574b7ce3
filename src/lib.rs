//! Nuclei Predictor - malignant/benign classification of cell nuclei measurements
//!
//! Loads the fixed-schema dataset, fits a standard scaler and a logistic
//! regression on a seeded train partition, persists both as one bundle and
//! serves predictions (plus dashboard payloads) from that bundle.

pub mod artifact;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod engine;
pub mod insight_core;
pub mod logging;
pub mod schema;
pub mod stats;
pub mod utils;

pub use artifact::ModelBundle;
pub use config::PipelineConfig;
pub use dataset::{load_clean_data, CleanDataset, Diagnosis};
pub use engine::{InferenceEngine, Prediction, TrainingOutcome};
pub use stats::Statistics;
pub use utils::AnalysisError;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
