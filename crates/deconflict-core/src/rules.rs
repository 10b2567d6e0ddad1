//! Safety buffer and sampling configuration for conflict resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SAFETY_BUFFER_M: f64 = 50.0;
pub const PRODUCTION_SAFETY_BUFFER_M: f64 = 100.0;
pub const DEFAULT_NUM_SAMPLES: usize = 50;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("safety buffer must be a finite non-negative distance, got {0}")]
    InvalidSafetyBuffer(f64),
    #[error("sample count must be at least 1")]
    ZeroSamples,
    #[error("unknown profile '{0}' (expected development or production)")]
    UnknownProfile(String),
}

/// Deployment profile selecting default thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Development,
    /// Stricter separation
    Production,
}

impl Profile {
    /// Default tracing filter level for this profile.
    pub fn log_level(&self) -> &'static str {
        match self {
            Profile::Development => "debug",
            Profile::Production => "warn",
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

/// Parameters passed explicitly into every resolver call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Conflict when the sampled minimum distance is strictly below this (meters)
    #[serde(default = "default_safety_buffer")]
    pub safety_buffer_m: f64,
    /// Sample times per overlapping segment pair
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,
    /// Skip segment pairs whose bounding boxes are already a full buffer apart
    #[serde(default = "default_prefilter")]
    pub prefilter: bool,
}

fn default_safety_buffer() -> f64 {
    DEFAULT_SAFETY_BUFFER_M
}

fn default_num_samples() -> usize {
    DEFAULT_NUM_SAMPLES
}

fn default_prefilter() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Development)
    }
}

impl ResolverConfig {
    pub fn new(safety_buffer_m: f64, num_samples: usize) -> Self {
        Self {
            safety_buffer_m,
            num_samples,
            prefilter: true,
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        let safety_buffer_m = match profile {
            Profile::Development => DEFAULT_SAFETY_BUFFER_M,
            Profile::Production => PRODUCTION_SAFETY_BUFFER_M,
        };
        Self::new(safety_buffer_m, DEFAULT_NUM_SAMPLES)
    }

    pub fn with_prefilter(mut self, prefilter: bool) -> Self {
        self.prefilter = prefilter;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.safety_buffer_m.is_finite() || self.safety_buffer_m < 0.0 {
            return Err(ConfigError::InvalidSafetyBuffer(self.safety_buffer_m));
        }
        if self.num_samples == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_pick_buffers() {
        assert_eq!(ResolverConfig::default().safety_buffer_m, 50.0);
        assert_eq!(
            ResolverConfig::for_profile(Profile::Production).safety_buffer_m,
            100.0
        );
        assert_eq!(ResolverConfig::default().num_samples, 50);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(ResolverConfig::new(f64::NAN, 10).validate().is_err());
        assert_eq!(
            ResolverConfig::new(-1.0, 10).validate(),
            Err(ConfigError::InvalidSafetyBuffer(-1.0))
        );
        assert_eq!(
            ResolverConfig::new(5.0, 0).validate(),
            Err(ConfigError::ZeroSamples)
        );
        assert!(ResolverConfig::new(0.0, 1).validate().is_ok());
    }

    #[test]
    fn partial_json_uses_field_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"safety_buffer_m": 12.5}"#).unwrap();
        assert_eq!(config.safety_buffer_m, 12.5);
        assert_eq!(config.num_samples, DEFAULT_NUM_SAMPLES);
        assert!(config.prefilter);
    }

    #[test]
    fn profile_parsing() {
        assert_eq!("PROD".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("development".parse::<Profile>().unwrap(), Profile::Development);
        assert!("staging".parse::<Profile>().is_err());
    }
}
