//! Configuration loading and typed config structures for the Roost simulation.
//!
//! The canonical configuration lives in `roost-config.yaml` at the project
//! root. Every field has a default, so an empty file (or no file at all)
//! yields a runnable barnyard. [`SimulationConfig::validate`] is run by the
//! loaders; behavior code trusts the ranges it checks.

use std::path::Path;

use roost_agents::{AgentError, Tunables};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A world or logging setting is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// A behavior tunable is out of range.
    #[error("invalid tunables: {source}")]
    Tunables {
        /// The underlying validation error.
        #[from]
        source: AgentError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `roost-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, population, viewport, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Behavior parameters for adults, juveniles, eggs, and feed.
    #[serde(default)]
    pub tunables: Tunables,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.tunables.validate()?;
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable barnyard name, used in logs.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed. Unset means seed from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Adults spawned at bootstrap.
    #[serde(default = "default_initial_population")]
    pub initial_population: u32,

    /// Viewport width in pixels.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    /// Viewport height in pixels.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: None,
            initial_population: default_initial_population(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl WorldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let dimensions_ok = self.viewport_width.is_finite()
            && self.viewport_height.is_finite()
            && self.viewport_width > 0.0
            && self.viewport_height > 0.0;
        if !dimensions_ok {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "viewport must be finite and positive, got {}x{}",
                    self.viewport_width, self.viewport_height
                ),
            });
        }
        Ok(())
    }
}

/// Run boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = run until stopped).
    #[serde(default)]
    pub max_ticks: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit a tick summary every N ticks (0 = never).
    #[serde(default = "default_summary_interval_ticks")]
    pub summary_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            summary_interval_ticks: default_summary_interval_ticks(),
        }
    }
}

fn default_world_name() -> String {
    "Roost".to_owned()
}

const fn default_initial_population() -> u32 {
    20
}

const fn default_viewport_width() -> f64 {
    1280.0
}

const fn default_viewport_height() -> f64 {
    720.0
}

const fn default_tick_interval_ms() -> u64 {
    16
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_summary_interval_ticks() -> u64 {
    600
}
