//! Disambiguation configuration.
//!
//! All tunable constants of the scoring pipeline live in
//! [`DisambiguationConfig`]. It can be built in code, or loaded from a TOML
//! file where any missing key takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Tunables for word extraction, similarity scoring and caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisambiguationConfig {
    /// Words with a log-probability at or above this are too common to count.
    pub max_prob: f64,
    /// Word pairs must be strictly more similar than this to contribute.
    pub similarity_threshold: f64,
    /// Stop scoring a bag pair after this many word pairs (0 = unlimited).
    pub max_pairs: usize,
    /// Maximum number of edges fetched around a candidate.
    pub star_limit: usize,
    /// Texts with at least this many tokens are truncated raw (0 = unlimited).
    pub max_words: usize,
    /// Capacity of a similarity cache built from this config.
    pub cache_capacity: usize,
    /// Score candidates on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        Self {
            max_prob: -7.0,
            similarity_threshold: 0.7,
            max_pairs: 0,
            star_limit: 1000,
            max_words: 50,
            cache_capacity: 100_000_000,
            parallel: false,
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl DisambiguationConfig {
    /// The max-pair limit, if enabled.
    pub fn pair_limit(&self) -> Option<usize> {
        (self.max_pairs > 0).then_some(self.max_pairs)
    }

    /// The token limit for free text, if enabled.
    pub fn word_limit(&self) -> Option<usize> {
        (self.max_words > 0).then_some(self.max_words)
    }

    /// Check that every field holds a usable value.
    pub fn validate(&self) -> ConfigResult<()> {
        // Contributions divide by the similarity, so it must stay positive.
        if !(0.0..1.0).contains(&self.similarity_threshold) {
            return Err(invalid("similarity_threshold", "must be in [0, 1)"));
        }
        if !self.max_prob.is_finite() || self.max_prob > 0.0 {
            return Err(invalid(
                "max_prob",
                "log-probabilities are <= 0, so the cutoff must be too",
            ));
        }
        if self.star_limit == 0 {
            return Err(invalid("star_limit", "must be > 0"));
        }
        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity", "must be > 0"));
        }
        Ok(())
    }

    /// Load from a TOML file and validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_constants() {
        let c = DisambiguationConfig::default();
        assert_eq!(c.max_prob, -7.0);
        assert_eq!(c.similarity_threshold, 0.7);
        assert_eq!(c.pair_limit(), None);
        assert_eq!(c.star_limit, 1000);
        assert_eq!(c.word_limit(), Some(50));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_disables_limits() {
        let c = DisambiguationConfig {
            max_words: 0,
            max_pairs: 0,
            ..Default::default()
        };
        assert_eq!(c.word_limit(), None);
        assert_eq!(c.pair_limit(), None);
    }

    #[test]
    fn rejects_bad_threshold() {
        let c = DisambiguationConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "similarity_threshold"
        ));

        let c = DisambiguationConfig {
            similarity_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_thresholds_that_allow_non_positive_similarity() {
        for threshold in [-0.5, -0.99, 1.0] {
            let c = DisambiguationConfig {
                similarity_threshold: threshold,
                ..Default::default()
            };
            assert!(
                matches!(
                    c.validate(),
                    Err(ConfigError::InvalidValue { ref field, .. }) if field == "similarity_threshold"
                ),
                "threshold {threshold} should be rejected"
            );
        }

        let c = DisambiguationConfig {
            similarity_threshold: 0.0,
            ..Default::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_positive_max_prob_and_zero_limits() {
        let bad = [
            DisambiguationConfig {
                max_prob: 0.5,
                ..Default::default()
            },
            DisambiguationConfig {
                star_limit: 0,
                ..Default::default()
            },
            DisambiguationConfig {
                cache_capacity: 0,
                ..Default::default()
            },
        ];
        for c in bad {
            assert!(c.validate().is_err(), "{c:?} should be invalid");
        }
    }

    #[test]
    fn toml_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("sense.toml");
        let config = DisambiguationConfig {
            max_pairs: 5000,
            parallel: true,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(DisambiguationConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sense.toml");
        std::fs::write(&path, "similarity_threshold = 0.8\n").unwrap();
        let config = DisambiguationConfig::load(&path).unwrap();
        assert_eq!(config.similarity_threshold, 0.8);
        assert_eq!(config.star_limit, 1000);
    }

    #[test]
    fn unknown_keys_and_invalid_values_fail_to_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sense.toml");

        std::fs::write(&path, "max_wrods = 10\n").unwrap();
        assert!(matches!(
            DisambiguationConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));

        std::fs::write(&path, "star_limit = 0\n").unwrap();
        assert!(matches!(
            DisambiguationConfig::load(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
