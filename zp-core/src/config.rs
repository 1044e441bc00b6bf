//! Configuration schema for generating and running permutation programs.
//!
//! The CLI reads one YAML file and lets flags override individual fields.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::register::Register;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid seed (expected hex): {0}")]
    Seed(#[from] hex::FromHexError),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure. Every section is optional; `zp run` only reads
/// `run` and `logging`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Permutation generation settings.
    #[serde(default)]
    pub generate: GenerateConfig,

    /// Program execution settings.
    #[serde(default)]
    pub run: RunConfig,

    /// Event logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Permutation generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerateConfig {
    /// Number of Feistel rounds. No default: generation needs it here or as a flag.
    #[serde(default)]
    pub rounds: Option<u32>,
    /// Hex-encoded seed. If absent, a fresh seed is taken from the OS.
    #[serde(default)]
    pub seed: Option<String>,
    /// Register holding the high 15 bits of the value.
    #[serde(default = "default_value_register_a")]
    pub value_register_a: Register,
    /// Register holding the low 15 bits of the value.
    #[serde(default = "default_value_register_b")]
    pub value_register_b: Register,
    /// Scratch register; must be 0 on entry and is 0 on exit.
    #[serde(default = "default_temp_register")]
    pub temp_register: Register,
    /// Prepended to every generated label.
    #[serde(default)]
    pub label_prefix: String,
}

fn default_value_register_a() -> Register {
    Register::Ammo
}

fn default_value_register_b() -> Register {
    Register::Gems
}

fn default_temp_register() -> Register {
    Register::Score
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            rounds: None,
            seed: None,
            value_register_a: default_value_register_a(),
            value_register_b: default_value_register_b(),
            temp_register: default_temp_register(),
            label_prefix: String::new(),
        }
    }
}

impl GenerateConfig {
    pub fn new(rounds: u32) -> Self {
        Self {
            rounds: Some(rounds),
            ..Self::default()
        }
    }

    /// The round count, once config and flags have been merged.
    pub fn required_rounds(&self) -> Result<u32, ConfigError> {
        match self.rounds {
            Some(r) if r >= 1 => Ok(r),
            Some(_) => Err(ConfigError::Invalid("generate.rounds must be >= 1".to_string())),
            None => Err(ConfigError::Invalid("generate.rounds is not set".to_string())),
        }
    }

    /// Decoded seed bytes, if a seed is configured.
    pub fn seed_bytes(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        match &self.seed {
            Some(s) => Ok(Some(hex::decode(s.trim())?)),
            None => Ok(None),
        }
    }
}

/// Program execution configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunConfig {
    /// Abort after this many executed instructions. Unbounded if None.
    #[serde(default)]
    pub max_steps: Option<u64>,
}

/// Event logging configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append NDJSON events to this file, if set.
    #[serde(default)]
    pub events_path: Option<String>,
    /// Flush the event log every N lines (0 disables periodic flushing).
    #[serde(default)]
    pub flush_every_lines: u64,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Checks the fields that are set. A missing `generate.rounds` is not an
    /// error here; see [`GenerateConfig::required_rounds`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generate;
        if g.rounds == Some(0) {
            return Err(ConfigError::Invalid("generate.rounds must be >= 1".to_string()));
        }
        let regs = [g.value_register_a, g.value_register_b, g.temp_register];
        if regs[0] == regs[1] || regs[0] == regs[2] || regs[1] == regs[2] {
            return Err(ConfigError::Invalid(format!(
                "generate registers must be distinct, got {}, {}, {}",
                regs[0], regs[1], regs[2]
            )));
        }
        if !g.label_prefix.bytes().all(crate::is_word_byte) {
            return Err(ConfigError::Invalid(format!(
                "generate.label_prefix must match [A-Za-z0-9_]*, got {:?}",
                g.label_prefix
            )));
        }
        g.seed_bytes()?;
        if self.run.max_steps == Some(0) {
            return Err(ConfigError::Invalid("run.max_steps must be >= 1 when set".to_string()));
        }
        Ok(())
    }
}
