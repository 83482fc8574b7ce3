//! Fixed column layout of the cell nuclei dataset.
//!
//! Ten physical measurements are each reported as three aggregations
//! (mean, standard error, worst), giving thirty features. The order below is
//! the order of the dataset columns and the positional order every fitted
//! transform is indexed by.

use serde::{Deserialize, Serialize};

/// Number of physical measurements per cell cluster
pub const N_MEASUREMENTS: usize = 10;

/// Number of model features (measurements × aggregations)
pub const N_FEATURES: usize = N_MEASUREMENTS * 3;

/// Label column
pub const LABEL_COLUMN: &str = "diagnosis";

/// Row index column, dropped during cleaning
pub const ID_COLUMN: &str = "id";

/// Name pandas gives the empty column produced by the trailing comma
pub const SENTINEL_COLUMN: &str = "Unnamed: 32";

/// Measurement keys as they appear in column names, paired with chart category names
pub const MEASUREMENTS: [(&str, &str); N_MEASUREMENTS] = [
    ("radius", "Radius"),
    ("texture", "Texture"),
    ("perimeter", "Perimeter"),
    ("area", "Area"),
    ("smoothness", "Smoothness"),
    ("compactness", "Compactness"),
    ("concavity", "Concavity"),
    ("concave points", "Concave Points"),
    ("symmetry", "Symmetry"),
    ("fractal_dimension", "Fractal Dimension"),
];

/// Canonical feature columns, in dataset order
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Statistical aggregation a feature column reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregation {
    Mean,
    StandardError,
    Worst,
}

impl Aggregation {
    pub const ALL: [Aggregation; 3] = [
        Aggregation::Mean,
        Aggregation::StandardError,
        Aggregation::Worst,
    ];

    /// Column name suffix
    pub fn suffix(self) -> &'static str {
        match self {
            Aggregation::Mean => "mean",
            Aggregation::StandardError => "se",
            Aggregation::Worst => "worst",
        }
    }

    /// Human-readable name used for chart traces
    pub fn display_name(self) -> &'static str {
        match self {
            Aggregation::Mean => "Mean",
            Aggregation::StandardError => "Standard Error",
            Aggregation::Worst => "Worst",
        }
    }

    /// Position of the first feature of this aggregation block
    pub fn offset(self) -> usize {
        match self {
            Aggregation::Mean => 0,
            Aggregation::StandardError => N_MEASUREMENTS,
            Aggregation::Worst => 2 * N_MEASUREMENTS,
        }
    }
}

/// Canonical feature names as owned strings
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|name| name.to_string()).collect()
}

/// Position of a feature column, if it is one of the thirty
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|candidate| *candidate == name)
}

/// Slider label for a feature, e.g. `"Concave points (se)"`
pub fn feature_label(index: usize) -> Option<String> {
    if index >= N_FEATURES {
        return None;
    }
    let aggregation = Aggregation::ALL[index / N_MEASUREMENTS];
    let (_, category) = MEASUREMENTS[index % N_MEASUREMENTS];
    // Only the first word keeps its capital: "Concave points", "Fractal dimension"
    let mut label = category.to_lowercase();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Some(format!("{} ({})", label, aggregation.suffix()))
}

/// Whether a header names a column the loader discards
pub fn is_dropped_column(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed == ID_COLUMN || trimmed.is_empty() || trimmed == SENTINEL_COLUMN
}
