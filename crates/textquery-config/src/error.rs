//! Error types for textquery configuration.

use std::{io, path::PathBuf};

use textquery::SyntaxError;
use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or rendering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// The `[syntax]` table describes an unusable query syntax.
    #[error("invalid query syntax in {path}: {source}")]
    InvalidSyntax {
        /// Path to the offending file.
        path: PathBuf,
        /// What is wrong with the syntax.
        source: SyntaxError,
    },

    /// Failed to render the configuration as TOML.
    #[error("failed to serialize config: {0}")]
    SerializeToml(#[from] ser::Error),
}
