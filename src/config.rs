use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::{PipelineError, Result};

/// Policy knobs for the pipeline. Every field has a default so an absent or
/// partial `pipeline.toml` is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cleaning: CleaningConfig,
    pub validation: ValidationThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Share of duplicate slugs in the raw export above which a warning is raised
    pub high_duplicate_rate: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            high_duplicate_rate: constants::DEFAULT_HIGH_DUPLICATE_RATE,
        }
    }
}

/// Thresholds the validator applies to a finished dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Minimum share of records carrying an embedding (inclusive)
    pub min_embedding_coverage: f64,
    /// How many leading records the required-fields check inspects.
    /// The check samples rather than scanning the whole dataset.
    pub required_field_sample_size: usize,
    /// How many duplicated slugs a `DuplicateSlug` defect lists
    pub duplicate_slug_sample_size: usize,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_embedding_coverage: constants::DEFAULT_MIN_EMBEDDING_COVERAGE,
            required_field_sample_size: constants::DEFAULT_REQUIRED_FIELD_SAMPLE_SIZE,
            duplicate_slug_sample_size: constants::DEFAULT_DUPLICATE_SLUG_SAMPLE_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject thresholds that cannot describe a ratio
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("cleaning.high_duplicate_rate", self.cleaning.high_duplicate_rate),
            (
                "validation.min_embedding_coverage",
                self.validation.min_embedding_coverage,
            ),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_policy_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.validation.min_embedding_coverage, 0.80);
        assert_eq!(config.validation.required_field_sample_size, 100);
        assert_eq!(config.validation.duplicate_slug_sample_size, 5);
        assert_eq!(config.cleaning.high_duplicate_rate, 0.40);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            "[validation]\nmin_embedding_coverage = 0.9\n",
        )
        .unwrap();
        assert_eq!(config.validation.min_embedding_coverage, 0.9);
        assert_eq!(config.validation.required_field_sample_size, 100);
        assert_eq!(config.cleaning, CleaningConfig::default());
    }

    #[test]
    fn test_out_of_range_ratio_rejected() {
        let err = PipelineConfig::from_toml_str("[cleaning]\nhigh_duplicate_rate = 1.5\n")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[validation]\nrequired_field_sample_size = 10").unwrap();

        let config = PipelineConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.validation.required_field_sample_size, 10);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/pipeline.toml")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
