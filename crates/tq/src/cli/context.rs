//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use textquery::Parser;
use textquery_config::Config;
use tracing::debug;

use super::commands::EXIT_ERROR;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Loaded configuration (default if no config file was found).
    pub config: Config,
    /// Parser for the configured syntax.
    pub parser: Parser,
}

impl CommandContext {
    /// Loads configuration from `config_path`, or by discovery from the working
    /// directory when no path is given.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ExitCode> {
        let config = match config_path {
            Some(path) => Config::load_from_file(path),
            None => Config::load(&current_dir_or_failure()?),
        }
        .map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::from(EXIT_ERROR)
        })?;

        match &config.source {
            Some(path) => debug!(path = %path.display(), "loaded configuration"),
            None => debug!("no configuration file, using default syntax"),
        }

        let parser = config.parser().map_err(|e| {
            eprintln!("error: invalid query syntax: {e}");
            ExitCode::from(EXIT_ERROR)
        })?;

        Ok(Self { config, parser })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::from(EXIT_ERROR)
    })
}
