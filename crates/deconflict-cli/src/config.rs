//! CLI configuration from environment and optional JSON file.

use std::env;
use std::path::{Path, PathBuf};

use deconflict_core::{ConfigError, Profile, ResolverConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub resolver: ResolverConfig,
    pub data_dir: PathBuf,
    /// Default tracing directive, overridden by RUST_LOG
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_profile(Profile::default())
    }
}

impl Config {
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            resolver: ResolverConfig::for_profile(profile),
            data_dir: PathBuf::from("data"),
            log_filter: format!("deconflict={}", profile.log_level()),
        }
    }

    pub fn from_env() -> Self {
        let profile = env::var("DECONFLICT_PROFILE")
            .ok()
            .and_then(|s| s.parse::<Profile>().ok())
            .unwrap_or_default();
        let mut config = Self::for_profile(profile);

        if let Some(buffer) = env::var("DECONFLICT_SAFETY_BUFFER")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
        {
            config.resolver.safety_buffer_m = buffer;
        }
        if let Some(samples) = env::var("DECONFLICT_NUM_SAMPLES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.resolver.num_samples = samples;
        }
        if let Ok(dir) = env::var("DECONFLICT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(filter) = env::var("DECONFLICT_LOG") {
            config.log_filter = filter;
        }
        config
    }

    /// Overlay values from a JSON config file.
    ///
    /// Runs before the subscriber exists, so it reports instead of logging:
    /// `Ok(false)` means the file was missing and the current values stand.
    /// An unreadable or malformed file is an error.
    pub fn apply_file(&mut self, path: &Path) -> Result<bool, ConfigFileError> {
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_json(&contents)?;
        Ok(true)
    }

    pub fn apply_json(&mut self, json: &str) -> Result<(), ConfigFileError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        if let Some(buffer) = file.spatial.and_then(|s| s.safety_buffer_distance) {
            self.resolver.safety_buffer_m = buffer;
        }
        if let Some(sampling) = file.sampling {
            if let Some(samples) = sampling.num_samples {
                self.resolver.num_samples = samples;
            }
            if let Some(prefilter) = sampling.prefilter {
                self.resolver.prefilter = prefilter;
            }
        }
        if let Some(level) = file.logging.and_then(|l| l.level) {
            self.log_filter = format!("deconflict={}", level.to_ascii_lowercase());
        }
        self.resolver.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    spatial: Option<SpatialSection>,
    #[serde(default)]
    sampling: Option<SamplingSection>,
    #[serde(default)]
    logging: Option<LoggingSection>,
}

#[derive(Debug, Deserialize)]
struct SpatialSection {
    safety_buffer_distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SamplingSection {
    num_samples: Option<usize>,
    prefilter: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LoggingSection {
    level: Option<String>,
}
