// Test Environment Configuration
//
// This crate resolves the settings the ibis test suite runs against.
// It provides:
// - The `IbisTestEnv` record and its documented defaults
// - Environment sources (process env, maps, YAML override files)
// - Logging configuration for the reporting binary
//
// Everything is read once, up front, so tests never touch the environment directly.

use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

pub mod logging;
pub mod source;
pub mod types;

pub use logging::LoggingConfig;
pub use source::{EnvSource, FileEnv, Layered, ProcessEnv};
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a valid integer, got {value:?}: {source}")]
    ParseError {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Failed to read environment file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse environment file: {source}")]
    FileParseError {
        #[from]
        source: serde_yaml::Error,
    },
}

/// Main configuration loading interface
impl IbisTestEnv {
    /// Load configuration from the current process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ProcessEnv)
    }

    /// Load configuration with the process environment taking precedence over a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = FileEnv::load_from_file(path)?;
        Self::load_from(&Layered::new(ProcessEnv, file))
    }
}
