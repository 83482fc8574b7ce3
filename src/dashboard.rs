//! Data handed to the dashboard front end.
//!
//! Sliders are bounded by the observed dataset range and start at the mean.
//! The radar chart places every value on a [0, 1] axis using the dataset
//! min/max; this normalization is for drawing only and never reaches the model.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::dataset::{load_clean_data, Diagnosis};
use crate::engine::{InferenceEngine, Prediction};
use crate::schema::{self, Aggregation, MEASUREMENTS, N_MEASUREMENTS};
use crate::stats::Statistics;
use crate::utils::{AnalysisError, ChartScaler};

/// Advisory shown under every prediction
pub const DISCLAIMER: &str = "This tool can assist in diagnosing from tissue sample measurements. \
It is not a substitute for a professional medical opinion.";

/// One continuous input control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub key: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SliderSpec {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Slider controls for every feature, in feature order
pub fn slider_specs(stats: &[Statistics]) -> Vec<SliderSpec> {
    stats
        .iter()
        .map(|s| {
            let label = schema::feature_index(&s.field)
                .and_then(schema::feature_label)
                .unwrap_or_else(|| s.field.clone());
            SliderSpec {
                key: s.field.clone(),
                label,
                min: s.min,
                max: s.max,
                default: s.mean,
            }
        })
        .collect()
}

/// Slider controls for the dataset at `path`
pub fn load_sliders(path: &Path) -> crate::Result<Vec<SliderSpec>> {
    let dataset = load_clean_data(path)?;
    Ok(slider_specs(&Statistics::compute_all(&dataset)))
}

/// Parse a `name=value` slider assignment
pub fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{}' for '{}'", value, key))?;
    Ok((key.trim().to_string(), value))
}

/// Slider moves requested in one call, applied positional first, then named,
/// then single assignments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderEdits {
    pub values: Option<Vec<f64>>,
    pub named: BTreeMap<String, f64>,
    pub assignments: Vec<(String, f64)>,
}

impl SliderEdits {
    pub fn apply(&self, input: &mut DashboardInput) -> Result<(), AnalysisError> {
        if let Some(values) = &self.values {
            input.set_all(values)?;
        }
        for (key, &value) in &self.named {
            input.set(key, value)?;
        }
        for (key, value) in &self.assignments {
            input.set(key, *value)?;
        }
        Ok(())
    }
}

/// Current slider positions
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardInput {
    sliders: Vec<SliderSpec>,
    values: Vec<f64>,
}

impl DashboardInput {
    /// Every slider at its default (the dataset mean)
    pub fn from_defaults(sliders: &[SliderSpec]) -> Self {
        Self {
            sliders: sliders.to_vec(),
            values: sliders.iter().map(|s| s.default).collect(),
        }
    }

    /// Move one slider; values outside its range are rejected
    pub fn set(&mut self, key: &str, value: f64) -> Result<(), AnalysisError> {
        let idx = self
            .sliders
            .iter()
            .position(|s| s.key == key)
            .ok_or_else(|| AnalysisError::ValidationError(format!("unknown feature '{}'", key)))?;
        let slider = &self.sliders[idx];
        if !value.is_finite() || !slider.contains(value) {
            return Err(AnalysisError::ValidationError(format!(
                "value {} for '{}' is outside the slider range [{}, {}]",
                value, key, slider.min, slider.max
            )));
        }
        self.values[idx] = value;
        Ok(())
    }

    /// Replace all positions at once, in slider order
    pub fn set_all(&mut self, values: &[f64]) -> Result<(), AnalysisError> {
        if values.len() != self.sliders.len() {
            return Err(AnalysisError::ValidationError(format!(
                "expected {} values, got {}",
                self.sliders.len(),
                values.len()
            )));
        }
        let keys: Vec<String> = self.sliders.iter().map(|s| s.key.clone()).collect();
        for (key, &value) in keys.iter().zip(values) {
            self.set(key, value)?;
        }
        Ok(())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Positions keyed by feature name
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.sliders
            .iter()
            .zip(&self.values)
            .map(|(s, &v)| (s.key.clone(), v))
            .collect()
    }
}

/// Chart scaler bounded by the slider ranges
pub fn chart_scaler(sliders: &[SliderSpec]) -> Result<ChartScaler, AnalysisError> {
    ChartScaler::new(
        sliders.iter().map(|s| s.min).collect(),
        sliders.iter().map(|s| s.max).collect(),
    )
}

/// One filled polygon on the radar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarTrace {
    pub name: String,
    pub values: Vec<f64>,
}

/// Radar chart payload: ten axes, one trace per aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub categories: Vec<String>,
    pub traces: Vec<RadarTrace>,
    /// Radial axis range
    pub range: [f64; 2],
}

impl RadarChart {
    /// Build from a feature vector in canonical order
    pub fn build(values: &[f64], chart: &ChartScaler) -> Result<Self, AnalysisError> {
        let normalized = chart.normalize_row(values)?;
        if normalized.len() != schema::N_FEATURES {
            return Err(AnalysisError::ValidationError(format!(
                "radar chart needs {} values, got {}",
                schema::N_FEATURES,
                normalized.len()
            )));
        }

        let traces = Aggregation::ALL
            .iter()
            .map(|aggregation| {
                let start = aggregation.offset();
                RadarTrace {
                    name: aggregation.display_name().to_string(),
                    values: normalized[start..start + N_MEASUREMENTS].to_vec(),
                }
            })
            .collect();

        Ok(Self {
            categories: MEASUREMENTS.iter().map(|(_, name)| name.to_string()).collect(),
            traces,
            range: [0.0, 1.0],
        })
    }
}

/// Text block shown next to the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionView {
    pub label: Diagnosis,
    pub probability_benign: f64,
    pub probability_malignant: f64,
    pub disclaimer: String,
}

impl From<Prediction> for PredictionView {
    fn from(prediction: Prediction) -> Self {
        Self {
            label: prediction.label,
            probability_benign: prediction.probability_benign,
            probability_malignant: prediction.probability_malignant,
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

impl fmt::Display for PredictionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cell Cluster Prediction")?;
        writeln!(f, "The cell cluster is: {}", self.label)?;
        writeln!(f, "Probability of being benign: {:.4}", self.probability_benign)?;
        writeln!(f, "Probability of being malignant: {:.4}", self.probability_malignant)?;
        write!(f, "{}", self.disclaimer)
    }
}

/// Everything the front end needs after one interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub inputs: BTreeMap<String, f64>,
    pub prediction: PredictionView,
    pub chart: RadarChart,
}

impl DashboardView {
    /// Run inference on the current slider positions and lay out the chart
    ///
    /// Values are matched to the bundle by name, so a bundle fit on a
    /// different feature order is still fed correctly or rejected.
    pub fn build(
        input: &DashboardInput,
        engine: &InferenceEngine,
        chart: &ChartScaler,
    ) -> Result<Self, AnalysisError> {
        let inputs = input.to_map();
        let prediction = engine.predict_named(&inputs)?;
        Ok(Self {
            inputs,
            prediction: prediction.into(),
            chart: RadarChart::build(input.values(), chart)?,
        })
    }
}

/// Build the view for the dataset and bundle named by `config`, with `edits`
/// applied over the slider defaults
pub fn predict_with_config(
    config: &PipelineConfig,
    edits: &SliderEdits,
) -> crate::Result<DashboardView> {
    let sliders = load_sliders(&config.data.path)?;
    let mut input = DashboardInput::from_defaults(&sliders);
    edits.apply(&mut input)?;

    let engine = InferenceEngine::load(&config.artifact.path)?;
    let chart = chart_scaler(&sliders)?;
    Ok(DashboardView::build(&input, &engine, &chart)?)
}
