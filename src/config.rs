//! Pipeline configuration.
//!
//! Every setting has a default, an optional TOML file can override any of
//! them, and command-line flags are applied last.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::insight_core::LogisticParams;
use crate::utils::{validate_ratio, AnalysisError};

pub const DEFAULT_DATA_PATH: &str = "Data/data.csv";
pub const DEFAULT_BUNDLE_PATH: &str = "Model/model.json";

/// Errors that may occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A value parsed but is out of range.
    #[error("Invalid config at {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: AnalysisError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub path: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_BUNDLE_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_ratio: f64,
    pub seed: u64,
    #[serde(flatten)]
    pub solver: LogisticParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            solver: LogisticParams::default(),
        }
    }
}

/// Top-level settings. The decision threshold is fixed and not configurable,
/// so unknown sections such as `[inference]` are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub artifact: ArtifactConfig,
    pub training: TrainingConfig,
}

/// Command-line values that win over the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub artifact: Option<PathBuf>,
    pub seed: Option<u64>,
    pub test_ratio: Option<f64>,
}

impl PipelineConfig {
    /// Apply flags on top of the loaded values and re-check the result
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, AnalysisError> {
        if let Some(data) = overrides.data {
            self.data.path = data;
        }
        if let Some(artifact) = overrides.artifact {
            self.artifact.path = artifact;
        }
        if let Some(seed) = overrides.seed {
            self.training.seed = seed;
        }
        if let Some(test_ratio) = overrides.test_ratio {
            self.training.test_ratio = test_ratio;
        }
        self.validate()?;
        Ok(self)
    }

    /// Load from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Defaults, or the file at `path` when one is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_ratio(self.training.test_ratio)?;
        let solver = &self.training.solver;
        if !(solver.alpha >= 0.0 && solver.alpha.is_finite()) {
            return Err(AnalysisError::ValidationError(format!(
                "alpha must be finite and >= 0, got {}",
                solver.alpha
            )));
        }
        if solver.max_iterations == 0 {
            return Err(AnalysisError::ValidationError(
                "max_iterations must be > 0".to_string(),
            ));
        }
        if !(solver.gradient_tolerance > 0.0) {
            return Err(AnalysisError::ValidationError(format!(
                "gradient_tolerance must be > 0, got {}",
                solver.gradient_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.data.path, PathBuf::from("Data/data.csv"));
        assert_eq!(config.artifact.path, PathBuf::from("Model/model.json"));
        assert_eq!(config.training.test_ratio, 0.2);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.solver.alpha, 1.0);
        assert_eq!(config.training.solver.max_iterations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [training]
            seed = 7
            alpha = 0.5

            [artifact]
            path = "out/bundle.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.solver.alpha, 0.5);
        assert_eq!(config.training.solver.max_iterations, 100);
        assert_eq!(config.training.test_ratio, 0.2);
        assert_eq!(config.artifact.path, PathBuf::from("out/bundle.json"));
        assert_eq!(config.data.path, PathBuf::from("Data/data.csv"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_threshold_section_is_rejected() {
        let err = PipelineConfig::from_toml_str("[inference]\nthreshold = 0.3\n").unwrap_err();
        assert!(err.to_string().contains("inference"));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = PipelineConfig::default();
        config.training.test_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.training.solver.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, "[training]\ntest_ratio = \"lots\"\n").unwrap();

        let err = PipelineConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("pipeline.toml"));

        std::fs::write(&path, "[training]\ntest_ratio = 0.0\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path).unwrap_err(),
            ConfigError::Invalid { .. }
        ));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [data]
            path = "from_file.csv"

            [training]
            seed = 7
            test_ratio = 0.3
            "#,
        )
        .unwrap();

        let merged = config
            .clone()
            .with_overrides(Overrides {
                seed: Some(11),
                artifact: Some(PathBuf::from("flag/model.json")),
                ..Overrides::default()
            })
            .unwrap();
        assert_eq!(merged.data.path, PathBuf::from("from_file.csv"));
        assert_eq!(merged.artifact.path, PathBuf::from("flag/model.json"));
        assert_eq!(merged.training.seed, 11);
        assert_eq!(merged.training.test_ratio, 0.3);

        assert_eq!(config.clone().with_overrides(Overrides::default()).unwrap(), config);

        let bad = config.with_overrides(Overrides {
            test_ratio: Some(1.0),
            ..Overrides::default()
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        assert_eq!(
            PipelineConfig::load_or_default(None).unwrap(),
            PipelineConfig::default()
        );
    }
}
