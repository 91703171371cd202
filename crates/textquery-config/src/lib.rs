//! Configuration system for textquery.
//!
//! The query syntax can be customized with a TOML file named `.textquery.toml`. The file
//! closest to the working directory wins; `~/.textquery.toml` applies when no directory
//! on the way up has one.
//!
//! ```toml
//! [syntax]
//! group = { open = "(", close = ")" }
//! quote = '"'
//!
//! [syntax.keywords]
//! and = "&&"
//! or = "||"
//! not = "!"
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod parse;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_file, global_config_path, is_global_config};
pub use error::ConfigError;
pub use parse::{RawConfig, parse_config_file, parse_config_str};
use serde::Serialize;
use textquery::{Parser, SyntaxError};
pub use textquery::Syntax;

/// Resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Query syntax in force.
    pub syntax: Syntax,
    /// File the configuration was loaded from, `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration that applies to `cwd`.
    ///
    /// Returns `Ok(Config::default())` if no configuration file is found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        match discover_config_file(cwd) {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file, skipping discovery.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_config_file(path)?;
        Ok(Self {
            syntax: raw.syntax,
            source: Some(path.to_path_buf()),
        })
    }

    /// Builds a parser for the configured syntax.
    pub fn parser(&self) -> Result<Parser, SyntaxError> {
        Parser::new(self.syntax.clone())
    }

    /// Serializes the effective configuration to TOML, in the same shape as a
    /// `.textquery.toml` file.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&SerializableConfig {
            syntax: &self.syntax,
        })?)
    }
}

/// Internal struct for TOML serialization.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Query syntax.
    syntax: &'a Syntax,
}
