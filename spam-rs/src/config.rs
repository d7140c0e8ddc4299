//! Configuration for spam-rs

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bayes::DEFAULT_RESCALE_FACTOR;
use crate::corpus::TagPair;
use crate::error::{Result, SpamError};
use crate::quality::DEFAULT_FALSE_POSITIVE_WEIGHT;

/// Main filter configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Corpus directory layout
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Label file tags
    #[serde(default)]
    pub labels: TagPair,
    /// Classifier tuning
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Quality score weighting
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Corpus directory layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Files starting with this prefix are metadata, not documents
    #[serde(default = "default_metadata_marker")]
    pub metadata_marker: String,
    /// Ground truth file name
    #[serde(default = "default_truth_file")]
    pub truth_file: String,
    /// Prediction file name
    #[serde(default = "default_prediction_file")]
    pub prediction_file: String,
}

/// Classifier tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Factor applied to the running product before each token
    #[serde(default = "default_rescale_factor")]
    pub rescale_factor: f64,
    /// Seed each class score with its training prior
    #[serde(default)]
    pub apply_class_prior: bool,
}

/// Quality score weighting
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// Cost of a false positive relative to a false negative
    #[serde(default = "default_false_positive_weight")]
    pub false_positive_weight: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_metadata_marker() -> String {
    "!".to_string()
}

fn default_truth_file() -> String {
    "!truth.txt".to_string()
}

fn default_prediction_file() -> String {
    "!prediction.txt".to_string()
}

fn default_rescale_factor() -> f64 {
    DEFAULT_RESCALE_FACTOR
}

fn default_false_positive_weight() -> f64 {
    DEFAULT_FALSE_POSITIVE_WEIGHT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            metadata_marker: default_metadata_marker(),
            truth_file: default_truth_file(),
            prediction_file: default_prediction_file(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            rescale_factor: default_rescale_factor(),
            apply_class_prior: false,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            false_positive_weight: default_false_positive_weight(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl FilterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SpamError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let corpus = &self.corpus;
        if corpus.metadata_marker.is_empty() {
            return Err(SpamError::Config("metadata_marker must not be empty".to_string()));
        }
        for name in [&corpus.truth_file, &corpus.prediction_file] {
            if !name.starts_with(&corpus.metadata_marker) {
                return Err(SpamError::Config(format!(
                    "metadata file '{}' must start with '{}'",
                    name, corpus.metadata_marker
                )));
            }
        }

        let tags = &self.labels;
        if tags.positive == tags.negative {
            return Err(SpamError::Config(format!(
                "positive and negative tags must differ, both are '{}'",
                tags.positive
            )));
        }
        for tag in [&tags.positive, &tags.negative] {
            if tag.is_empty() || tag.chars().any(char::is_whitespace) {
                return Err(SpamError::Config(format!("invalid label tag '{}'", tag)));
            }
        }

        let factor = self.classifier.rescale_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(SpamError::Config(format!(
                "rescale_factor must be a positive number, got {}",
                factor
            )));
        }

        let weight = self.evaluation.false_positive_weight;
        if !weight.is_finite() || weight < 0.0 {
            return Err(SpamError::Config(format!(
                "false_positive_weight must be non-negative, got {}",
                weight
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.corpus.truth_file, "!truth.txt");
        assert_eq!(config.corpus.prediction_file, "!prediction.txt");
        assert_eq!(config.labels, TagPair::new("SPAM", "OK"));
        assert_eq!(config.classifier.rescale_factor, 1000.0);
        assert!(!config.classifier.apply_class_prior);
        assert_eq!(config.evaluation.false_positive_weight, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[labels]
positive = "JUNK"
negative = "GOOD"

[classifier]
apply_class_prior = true
"#;
        let config: FilterConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.labels.positive, "JUNK");
        assert!(config.classifier.apply_class_prior);
        assert_eq!(config.classifier.rescale_factor, 1000.0);
        assert_eq!(config.corpus.metadata_marker, "!");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FilterConfig::default();
        config.labels = TagPair::new("SPAM", "SPAM");
        assert!(config.validate().is_err());

        let mut config = FilterConfig::default();
        config.corpus.prediction_file = "prediction.txt".to_string();
        assert!(config.validate().is_err());

        let mut config = FilterConfig::default();
        config.classifier.rescale_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = FilterConfig::default();
        config.evaluation.false_positive_weight = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: FilterConfig = toml::from_str(include_str!("../config.example.toml")).unwrap();
        let defaults = FilterConfig::default();
        assert_eq!(config.corpus.truth_file, defaults.corpus.truth_file);
        assert_eq!(config.labels, defaults.labels);
        assert_eq!(config.classifier.rescale_factor, defaults.classifier.rescale_factor);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[evaluation]\nfalse_positive_weight = 5.0\n").unwrap();

        let config = FilterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.evaluation.false_positive_weight, 5.0);
    }

    #[test]
    fn test_from_file_invalid() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[classifier]\nrescale_factor = \"big\"\n").unwrap();

        assert!(matches!(
            FilterConfig::from_file(file.path()),
            Err(SpamError::Config(_))
        ));
    }
}
