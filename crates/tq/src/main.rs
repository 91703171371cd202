//! Command-line interface for textquery.
//!
//! Logs go to stderr; `-v` raises the level, `RUST_LOG` overrides it.

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tq::cli::{CommandContext, args::Cli, commands};

/// Log filter for the given `-v` count.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose))),
        )
        .with_writer(io::stderr)
        .init();

    let ctx = match CommandContext::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}
