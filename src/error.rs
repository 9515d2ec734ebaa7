//! Error types.
//!
//! The simulation itself cannot fail: degenerate inputs are clamped or
//! treated as no-ops.  Only loading configuration from disk is fallible.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A tunable is outside the range the simulation can work with.
    #[error("config value '{name}' = {value} is invalid: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
