/// ML algorithm core modules
pub mod feature;
pub mod metrics;
pub mod model;
pub mod split;

// Re-export commonly used functions
pub use metrics::{ClassificationReport, ConfusionMatrix};
pub use model::{train_logistic_regression, LogisticModel, LogisticParams};
pub use split::{train_test_split, SplitIndices};
