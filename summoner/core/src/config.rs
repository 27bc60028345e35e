//! Configuration
//!
//! Loaded from a TOML file at `$XDG_CONFIG_HOME/summoner/summon.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! reveal_interval_ms = 10
//! background_interval_ms = 100
//! circle_interval_ms = 500
//! generation_timeout_secs = 60
//! offerings = 3
//! seed = 42
//!
//! [backend]
//! host = "localhost"
//! port = 11434
//! model = "llama3.2"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SUMMON_REVEAL_INTERVAL_MS` | `reveal_interval_ms` |
//! | `SUMMON_BACKGROUND_INTERVAL_MS` | `background_interval_ms` |
//! | `SUMMON_CIRCLE_INTERVAL_MS` | `circle_interval_ms` |
//! | `SUMMON_GENERATION_TIMEOUT_SECS` | `generation_timeout_secs` |
//! | `SUMMON_OFFERINGS` | `offerings` |
//! | `SUMMON_SEED` | `seed` |
//! | `OLLAMA_HOST` | `backend.host` |
//! | `OLLAMA_PORT` | `backend.port` |
//! | `SUMMON_MODEL` | `backend.model` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::PROMPTS;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Where the text generator lives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Ollama host address
    pub host: String,
    /// Ollama port number
    pub port: u16,
    /// Model used for the creature description
    pub model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 11434,
            model: "llama3.2".to_string(),
        }
    }
}

/// Runtime settings of the summoning terminal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummonConfig {
    /// Delay between revealed characters
    pub reveal_interval_ms: u64,
    /// Delay between background generations
    pub background_interval_ms: u64,
    /// Delay between summoning circle frames
    pub circle_interval_ms: u64,
    /// Deadline for the creature description
    pub generation_timeout_secs: u64,
    /// Number of offering prompts asked
    pub offerings: usize,
    /// Fixed random seed (random when absent)
    pub seed: Option<u64>,
    /// Text generation backend
    pub backend: BackendConfig,
}

impl Default for SummonConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: 10,
            background_interval_ms: 100,
            circle_interval_ms: 500,
            generation_timeout_secs: 60,
            offerings: 3,
            seed: None,
            backend: BackendConfig::default(),
        }
    }
}

impl SummonConfig {
    /// Reveal tick interval
    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    /// Background tick interval
    pub fn background_interval(&self) -> Duration {
        Duration::from_millis(self.background_interval_ms)
    }

    /// Circle frame interval
    pub fn circle_interval(&self) -> Duration {
        Duration::from_millis(self.circle_interval_ms)
    }

    /// Creature description deadline
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("reveal_interval_ms", self.reveal_interval_ms),
            ("background_interval_ms", self.background_interval_ms),
            ("circle_interval_ms", self.circle_interval_ms),
            ("generation_timeout_secs", self.generation_timeout_secs),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if !(1..=PROMPTS.len()).contains(&self.offerings) {
            return Err(ConfigError::ValidationError(format!(
                "offerings must be between 1 and {}, got {}",
                PROMPTS.len(),
                self.offerings
            )));
        }
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; unparsable values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "Ignoring unparsable environment override");
                    None
                }
            }
        }

        if let Some(ms) = parsed(&lookup, "SUMMON_REVEAL_INTERVAL_MS") {
            self.reveal_interval_ms = ms;
        }
        if let Some(ms) = parsed(&lookup, "SUMMON_BACKGROUND_INTERVAL_MS") {
            self.background_interval_ms = ms;
        }
        if let Some(ms) = parsed(&lookup, "SUMMON_CIRCLE_INTERVAL_MS") {
            self.circle_interval_ms = ms;
        }
        if let Some(secs) = parsed(&lookup, "SUMMON_GENERATION_TIMEOUT_SECS") {
            self.generation_timeout_secs = secs;
        }
        if let Some(n) = parsed(&lookup, "SUMMON_OFFERINGS") {
            self.offerings = n;
        }
        if let Some(seed) = parsed(&lookup, "SUMMON_SEED") {
            self.seed = Some(seed);
        }
        if let Some(host) = lookup("OLLAMA_HOST") {
            self.backend.host = host;
        }
        if let Some(port) = parsed(&lookup, "OLLAMA_PORT") {
            self.backend.port = port;
        }
        if let Some(model) = lookup("SUMMON_MODEL") {
            self.backend.model = model;
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/summoner/summon.toml` or
/// `~/.config/summoner/summon.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("summoner").join("summon.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed,
/// or if the resulting values are out of range.
pub fn load_config() -> Result<SummonConfig, ConfigError> {
    let mut config = load_config_from_path(default_config_path())?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific path (defaults when absent)
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SummonConfig, ConfigError> {
    let Some(config_path) = path else {
        return Ok(SummonConfig::default());
    };

    if !config_path.exists() {
        tracing::debug!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        return Ok(SummonConfig::default());
    }

    let toml_content =
        std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
            path: config_path.clone(),
            source: e,
        })?;
    let config: SummonConfig = toml::from_str(&toml_content)?;

    tracing::info!(
        path = %config_path.display(),
        "Loaded configuration from file"
    );
    Ok(config)
}
