//! Persisted model bundle.
//!
//! The scaler and the classifier are written together in one JSON file along
//! with the feature order they were fit on, so they can never drift apart.
//! Saving goes through a temp file in the destination directory followed by a
//! rename, which replaces any previous bundle in one step.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::DECISION_THRESHOLD;
use crate::insight_core::LogisticModel;
use crate::utils::{AnalysisError, StandardScaler};

/// Bundle layout version understood by this build
pub const FORMAT_VERSION: u32 = 1;

/// How the bundle was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub seed: u64,
    pub test_ratio: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_accuracy: f64,
}

/// Scaler + classifier pair with the feature order both are indexed by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub classifier: LogisticModel,
    pub threshold: f64,
    pub training: TrainingMetadata,
}

impl ModelBundle {
    /// Check internal consistency
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.format_version != FORMAT_VERSION {
            return Err(AnalysisError::ArtifactError(format!(
                "unsupported bundle format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }

        let n = self.feature_names.len();
        if n == 0 {
            return Err(AnalysisError::ArtifactError(
                "bundle lists no features".to_string(),
            ));
        }
        for (what, len) in [
            ("scaler mean", self.scaler.mean.len()),
            ("scaler scale", self.scaler.scale.len()),
            ("classifier coefficients", self.classifier.coefficients.len()),
        ] {
            if len != n {
                return Err(AnalysisError::ArtifactError(format!(
                    "{} has {} entries but bundle lists {} features",
                    what, len, n
                )));
            }
        }

        let mut seen = std::collections::HashSet::with_capacity(n);
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(AnalysisError::ArtifactError(format!(
                    "feature '{}' listed twice",
                    name
                )));
            }
        }

        if self.scaler.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(AnalysisError::ArtifactError(
                "scaler scale must be finite and positive".to_string(),
            ));
        }
        let params_finite = self.scaler.mean.iter().all(|v| v.is_finite())
            && self.classifier.coefficients.iter().all(|v| v.is_finite())
            && self.classifier.intercept.is_finite();
        if !params_finite {
            return Err(AnalysisError::ArtifactError(
                "bundle contains NaN or Inf parameters".to_string(),
            ));
        }

        if self.threshold != DECISION_THRESHOLD {
            return Err(AnalysisError::ArtifactError(format!(
                "decision threshold must be {}, got {}",
                DECISION_THRESHOLD, self.threshold
            )));
        }
        Ok(())
    }

    /// Write the bundle, atomically replacing any file at `path`
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        self.validate()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create bundle directory {}", dir.display()))?;

        let bytes = serde_json::to_vec_pretty(self).context("failed to serialize model bundle")?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(&bytes)
            .with_context(|| format!("failed to write temp file {}", tmp.path().display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("failed to sync temp file {}", tmp.path().display()))?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            features = self.feature_names.len(),
            "saved model bundle"
        );
        Ok(())
    }

    /// Read and validate a bundle
    pub fn load(path: &Path) -> crate::Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read model bundle {}", path.display()))?;
        let bundle: ModelBundle = serde_json::from_slice(&bytes)
            .map_err(|e| AnalysisError::ArtifactError(format!("malformed bundle: {}", e)))
            .with_context(|| format!("failed to parse model bundle {}", path.display()))?;
        bundle
            .validate()
            .with_context(|| format!("invalid model bundle {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded model bundle");
        Ok(bundle)
    }
}
