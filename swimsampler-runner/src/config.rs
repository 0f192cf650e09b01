//! Serializable collection configuration.
//!
//! Every tunable of a run is a field here so a run can be reproduced from
//! its config echo alone: sample size, priority events, season, division
//! list, floors, the roster-size fallback, the swimmers-per-team heuristic,
//! and the master seed.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectConfig {
    /// Total number of swimmers to sample across all divisions.
    pub total_sample_size: usize,

    /// Events collected per swimmer, in collection order.
    pub priority_events: Vec<String>,

    /// Season year the roster and time lookups are scoped to.
    pub season: i32,

    /// Divisions surveyed, in listing order.
    pub divisions: Vec<String>,

    /// The division whose teams are selected by ranking stride rather than
    /// uniformly. Must appear in `divisions` to have any effect.
    pub ranked_division: String,

    /// Minimum sample quota for every division with a non-zero population.
    pub min_per_division: usize,

    /// Roster-size estimate used when a roster cannot be fetched.
    pub default_roster_size: usize,

    /// Breadth heuristic: one team is sampled per this many targeted
    /// swimmers.
    pub swimmers_per_team: usize,

    /// Gender filter passed to roster and ranking lookups.
    pub gender: String,

    /// Master seed for every sampling decision in the run.
    pub seed: u64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            total_sample_size: 200,
            priority_events: vec![
                "100 Breast".into(),
                "200 Breast".into(),
                "100 Free".into(),
                "200 Free".into(),
            ],
            season: 2024,
            divisions: vec![
                "Division 1".into(),
                "Division 2".into(),
                "Division 3".into(),
                "NAIA".into(),
            ],
            ranked_division: "Division 1".into(),
            min_per_division: 10,
            default_roster_size: 25,
            swimmers_per_team: 10,
            gender: "M".into(),
            seed: 42,
        }
    }
}

impl CollectConfig {
    /// Load from a TOML file and validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string and validate.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the sampler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_sample_size == 0 {
            return Err(ConfigError::Invalid("total_sample_size must be positive".into()));
        }
        if self.priority_events.is_empty() {
            return Err(ConfigError::Invalid("priority_events must not be empty".into()));
        }
        if self.divisions.is_empty() {
            return Err(ConfigError::Invalid("divisions must not be empty".into()));
        }
        if self.swimmers_per_team == 0 {
            return Err(ConfigError::Invalid("swimmers_per_team must be positive".into()));
        }
        if self.default_roster_size == 0 {
            return Err(ConfigError::Invalid("default_roster_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CollectConfig::default().validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let config = CollectConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let restored = CollectConfig::from_toml(&toml_str).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = CollectConfig::from_toml("total_sample_size = 50\nseed = 7\n").unwrap();
        assert_eq!(config.total_sample_size, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.min_per_division, 10);
        assert_eq!(config.priority_events.len(), 4);
    }

    #[test]
    fn zero_total_is_rejected() {
        let err = CollectConfig::from_toml("total_sample_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("total_sample_size"));
    }

    #[test]
    fn empty_events_are_rejected() {
        let err = CollectConfig::from_toml("priority_events = []\n").unwrap_err();
        assert!(err.to_string().contains("priority_events"));
    }

    #[test]
    fn zero_heuristic_is_rejected() {
        let err = CollectConfig::from_toml("swimmers_per_team = 0\n").unwrap_err();
        assert!(err.to_string().contains("swimmers_per_team"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(CollectConfig::from_toml("no_such_field = 1\n").is_err());
    }
}
