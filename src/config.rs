/*!
 * Configuration types for mpkg
 */

use crate::error::Result;
use mpkg_core_manifest::{IdentifierGenerator, MergeMode, SequentialGenerator, UuidGenerator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Tool configuration, loaded from TOML and overridden by CLI flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpkgConfig {
    /// Conflict policy used by `merge` when no --mode is given
    #[serde(default)]
    pub merge_mode: MergeMode,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Prefix for fresh element identifiers (None = random UUIDs)
    #[serde(default)]
    pub id_prefix: Option<String>,
}

impl Default for MpkgConfig {
    fn default() -> Self {
        Self {
            merge_mode: MergeMode::default(),
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            pretty: true,
            id_prefix: None,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

impl MpkgConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: MpkgConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Identifier generator for packages read by the tool
    pub fn id_generator(&self) -> Arc<dyn IdentifierGenerator> {
        match &self.id_prefix {
            Some(prefix) => Arc::new(SequentialGenerator::new(prefix.clone())),
            None => Arc::new(UuidGenerator),
        }
    }
}
