use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::schema::{self, FEATURE_NAMES, LABEL_COLUMN, N_FEATURES};
use crate::utils::{parse_finite, rows_to_matrix, AnalysisError};

/// Binary diagnosis of a cell cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    /// Map a raw dataset label. Only `"M"` and `"B"` are accepted, unpadded.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Diagnosis::Malignant),
            "B" => Some(Diagnosis::Benign),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Diagnosis::Malignant => "M",
            Diagnosis::Benign => "B",
        }
    }

    /// Binary indicator: malignant = 1, benign = 0
    pub fn as_index(self) -> usize {
        match self {
            Diagnosis::Benign => 0,
            Diagnosis::Malignant => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Diagnosis::Benign),
            1 => Some(Diagnosis::Malignant),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Benign => write!(f, "Benign"),
            Diagnosis::Malignant => write!(f, "Malignant"),
        }
    }
}

/// Cleaned table: thirty feature columns in canonical order plus the binary label
#[derive(Debug, Clone)]
pub struct CleanDataset {
    pub feature_names: Vec<String>,
    pub features: Array2<f64>,
    pub labels: Array1<usize>,
}

impl CleanDataset {
    /// Build from already-clean parts
    pub fn new(features: Array2<f64>, labels: Array1<usize>) -> Result<Self, AnalysisError> {
        if features.ncols() != N_FEATURES {
            return Err(AnalysisError::SchemaError(format!(
                "expected {} feature columns, got {}",
                N_FEATURES,
                features.ncols()
            )));
        }
        if features.nrows() != labels.len() {
            return Err(AnalysisError::ValidationError(format!(
                "features rows ({}) must match labels length ({})",
                features.nrows(),
                labels.len()
            )));
        }
        if let Some(bad) = labels.iter().find(|&&label| label > 1) {
            return Err(AnalysisError::SchemaError(format!(
                "label must be 0 or 1, got {}",
                bad
            )));
        }
        Ok(Self {
            feature_names: schema::feature_names(),
            features,
            labels,
        })
    }

    /// Parse and clean CSV text
    ///
    /// Drops the `id` and trailing sentinel columns, maps `M`/`B` to `1`/`0` and
    /// selects the feature columns by name into canonical order.
    pub fn from_csv_str(csv_data: &str) -> crate::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_data.as_bytes());

        let headers = reader.headers()?.clone();
        let layout = ColumnLayout::resolve(&headers)?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut labels: Vec<usize> = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let row_number = idx + 1;
            let record = result.with_context(|| format!("failed to read CSV row {}", row_number))?;

            let raw_label = record.get(layout.label).unwrap_or_default();
            let diagnosis = Diagnosis::from_code(raw_label).ok_or_else(|| {
                AnalysisError::SchemaError(format!(
                    "row {}: unknown diagnosis label '{}' (expected 'M' or 'B')",
                    row_number, raw_label
                ))
            })?;

            let mut row = Vec::with_capacity(N_FEATURES);
            for (feature_idx, &col_idx) in layout.features.iter().enumerate() {
                let raw = record.get(col_idx).unwrap_or_default();
                row.push(parse_finite(raw, row_number, FEATURE_NAMES[feature_idx])?);
            }

            rows.push(row);
            labels.push(diagnosis.as_index());
        }

        if rows.is_empty() {
            return Err(AnalysisError::ValidationError("dataset has no data rows".to_string()).into());
        }

        let features = rows_to_matrix(&rows, N_FEATURES)?;
        Ok(Self::new(features, Array1::from(labels))?)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> ArrayView1<'_, usize> {
        self.labels.view()
    }

    /// Count of (benign, malignant) samples
    pub fn class_counts(&self) -> (usize, usize) {
        let malignant = self.labels.iter().filter(|&&label| label == 1).count();
        (self.len() - malignant, malignant)
    }

    /// Column-wise mean of the rows carrying `diagnosis`
    pub fn class_mean(&self, diagnosis: Diagnosis) -> Option<Vec<f64>> {
        let target = diagnosis.as_index();
        let indices: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == target)
            .map(|(idx, _)| idx)
            .collect();
        if indices.is_empty() {
            return None;
        }
        let subset = self.features.select(ndarray::Axis(0), &indices);
        subset.mean_axis(ndarray::Axis(0)).map(|mean| mean.to_vec())
    }
}

/// Positions of the label and feature columns within the CSV header
struct ColumnLayout {
    label: usize,
    features: Vec<usize>,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, AnalysisError> {
        let mut label = None;
        let mut features: [Option<usize>; N_FEATURES] = [None; N_FEATURES];

        for (col_idx, header) in headers.iter().enumerate() {
            let name = header.trim();
            if schema::is_dropped_column(name) {
                continue;
            }
            if name == LABEL_COLUMN {
                label = Some(col_idx);
                continue;
            }
            match schema::feature_index(name) {
                Some(feature_idx) if features[feature_idx].is_none() => {
                    features[feature_idx] = Some(col_idx);
                }
                Some(_) => {
                    return Err(AnalysisError::SchemaError(format!(
                        "duplicate column '{}'",
                        name
                    )));
                }
                None => {
                    return Err(AnalysisError::SchemaError(format!(
                        "unexpected column '{}'",
                        name
                    )));
                }
            }
        }

        let label = label.ok_or_else(|| {
            AnalysisError::SchemaError(format!("missing required column '{}'", LABEL_COLUMN))
        })?;

        let mut resolved = Vec::with_capacity(N_FEATURES);
        for (feature_idx, position) in features.iter().enumerate() {
            let position = position.ok_or_else(|| {
                AnalysisError::SchemaError(format!(
                    "missing required column '{}'",
                    FEATURE_NAMES[feature_idx]
                ))
            })?;
            resolved.push(position);
        }

        Ok(Self {
            label,
            features: resolved,
        })
    }
}

/// Load and clean the dataset file
pub fn load_clean_data(path: &Path) -> crate::Result<CleanDataset> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let dataset = CleanDataset::from_csv_str(&content)
        .with_context(|| format!("failed to load dataset {}", path.display()))?;

    let (benign, malignant) = dataset.class_counts();
    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        benign,
        malignant,
        "loaded dataset"
    );
    Ok(dataset)
}
