//! Configuration loading for Exomyx.
//! Reads exomyx.toml from the current directory or the path in the
//! EXOMYX_CONFIG env var. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV_VAR: &str = "EXOMYX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "exomyx.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExomyxConfig {
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// What the runner does when a data provider is unreachable or returns
/// malformed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorPolicy {
    /// Stop the run with a data-provider error.
    #[default]
    Abort,
    /// Record a FAIL with the provider message and carry on.
    Record,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Process genes in parallel within a step.
    #[serde(default = "bool_true")]
    pub parallel: bool,
    /// Minimum gene count before a step goes parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    /// Worker pool size; 0 uses one thread per core.
    #[serde(default)]
    pub worker_threads: usize,
    #[serde(default)]
    pub provider_error_policy: ProviderErrorPolicy,
    /// Buffer size of the progress broadcast channel.
    #[serde(default = "default_progress_capacity")]
    pub progress_capacity: usize,
}

fn bool_true()                  -> bool  { true }
fn default_parallel_threshold() -> usize { 64 }
fn default_progress_capacity()  -> usize { 64 }

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parallel: bool_true(),
            parallel_threshold: default_parallel_threshold(),
            worker_threads: 0,
            provider_error_policy: ProviderErrorPolicy::default(),
            progress_capacity: default_progress_capacity(),
        }
    }
}

impl RunnerConfig {
    /// Single-threaded, abort-on-error settings.
    pub fn sequential() -> Self {
        Self { parallel: false, ..Self::default() }
    }

    pub fn with_provider_error_policy(mut self, policy: ProviderErrorPolicy) -> Self {
        self.provider_error_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel && self.parallel_threshold == 0 {
            return Err(ConfigError::Invalid("parallel_threshold must be at least 1".to_string()));
        }
        if self.progress_capacity == 0 {
            return Err(ConfigError::Invalid("progress_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}


impl ExomyxConfig {
    /// Load configuration from exomyx.toml.
    /// Checks EXOMYX_CONFIG env var first, then current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            debug!(path, "no config file found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: ExomyxConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.runner.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExomyxConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.runner.validate()?;
        Ok(config)
    }
}
