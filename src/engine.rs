use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::{ModelBundle, TrainingMetadata, FORMAT_VERSION};
use crate::config::{PipelineConfig, TrainingConfig};
use crate::dataset::{load_clean_data, CleanDataset, Diagnosis};
use crate::insight_core::feature::{validate_features, validate_vector};
use crate::insight_core::{
    train_logistic_regression, train_test_split, ClassificationReport, LogisticModel,
};
use crate::utils::{AnalysisError, StandardScaler};

/// Malignant probability above which a cluster is labelled Malignant.
/// Fixed so the label always equals the more probable class, ties to Benign.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Result of one training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub report: ClassificationReport,
}

/// Fit the scaler and classifier on a seeded 80/20 style split
///
/// The scaler only ever sees the training partition. The held-out rows are
/// scaled with it and used for the report.
pub fn train(
    dataset: &CleanDataset,
    config: &TrainingConfig,
) -> Result<TrainingOutcome, AnalysisError> {
    validate_features(&dataset.features, dataset.feature_names.len())?;

    let split = train_test_split(dataset.len(), config.test_ratio, config.seed)?;
    let partition = split.apply(dataset.features(), dataset.labels());
    tracing::info!(
        train_rows = partition.y_train.len(),
        test_rows = partition.y_test.len(),
        seed = config.seed,
        "split dataset"
    );

    let scaler = StandardScaler::fit(partition.x_train.view())?;
    let x_train = scaler.transform(partition.x_train.view())?;
    let x_test = scaler.transform(partition.x_test.view())?;

    let classifier = train_logistic_regression(x_train.view(), partition.y_train.view(), &config.solver)?;

    let predicted = classifier.predict_batch(x_test.view(), DECISION_THRESHOLD)?;
    let report = ClassificationReport::from_labels(partition.y_test.view(), predicted.view())?;
    tracing::info!(accuracy = report.accuracy, "evaluated on held-out partition");

    let bundle = ModelBundle {
        format_version: FORMAT_VERSION,
        feature_names: dataset.feature_names.clone(),
        scaler,
        classifier,
        threshold: DECISION_THRESHOLD,
        training: TrainingMetadata {
            seed: config.seed,
            test_ratio: config.test_ratio,
            train_rows: partition.y_train.len(),
            test_rows: partition.y_test.len(),
            test_accuracy: report.accuracy,
        },
    };
    bundle.validate()?;

    Ok(TrainingOutcome { bundle, report })
}

/// Load the configured dataset, train, and write the bundle to the configured path
pub fn train_and_save(config: &PipelineConfig) -> crate::Result<TrainingOutcome> {
    let dataset = load_clean_data(&config.data.path)?;
    let outcome = train(&dataset, &config.training)?;
    outcome.bundle.save(&config.artifact.path)?;
    Ok(outcome)
}

/// Label and class probabilities for one feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Diagnosis,
    pub probability_benign: f64,
    pub probability_malignant: f64,
}

impl Prediction {
    /// Probabilities indexed by class: `[benign, malignant]`
    pub fn probabilities(&self) -> [f64; 2] {
        [self.probability_benign, self.probability_malignant]
    }
}

/// Serves predictions from a loaded bundle
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    bundle: ModelBundle,
}

impl InferenceEngine {
    pub fn from_bundle(bundle: ModelBundle) -> Result<Self, AnalysisError> {
        bundle.validate()?;
        Ok(Self { bundle })
    }

    /// Load the bundle at `path`
    pub fn load(path: &Path) -> crate::Result<Self> {
        let bundle = ModelBundle::load(path)?;
        Ok(Self { bundle })
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn feature_names(&self) -> &[String] {
        &self.bundle.feature_names
    }

    fn classifier(&self) -> &LogisticModel {
        &self.bundle.classifier
    }

    /// Predict from a raw vector in the bundle's feature order
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, AnalysisError> {
        validate_vector(features, self.bundle.feature_names.len())?;

        let scaled = self.bundle.scaler.transform_row(features)?;
        let [probability_benign, probability_malignant] = self.classifier().predict_proba(&scaled)?;
        let label = if probability_malignant > DECISION_THRESHOLD {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        };

        Ok(Prediction {
            label,
            probability_benign,
            probability_malignant,
        })
    }

    /// Predict from values keyed by feature name
    ///
    /// Every bundle feature must be present and no other names are allowed.
    pub fn predict_named(&self, values: &BTreeMap<String, f64>) -> Result<Prediction, AnalysisError> {
        if let Some(unknown) = values
            .keys()
            .find(|name| !self.bundle.feature_names.contains(*name))
        {
            return Err(AnalysisError::ValidationError(format!(
                "unknown feature '{}'",
                unknown
            )));
        }

        let mut vector = Vec::with_capacity(self.bundle.feature_names.len());
        for name in &self.bundle.feature_names {
            let value = values.get(name).ok_or_else(|| {
                AnalysisError::ValidationError(format!("missing feature '{}'", name))
            })?;
            vector.push(*value);
        }
        self.predict(&vector)
    }
}
