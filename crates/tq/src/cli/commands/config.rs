//! Implementation of `tq config`.

use std::process::ExitCode;

use crate::cli::context::CommandContext;

/// Shows where the configuration came from and the effective syntax.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    let toml = match config.to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &config.source {
        Some(path) => println!("# source: {}", path.display()),
        None => println!("# source: (default)"),
    }
    print!("{toml}");
    ExitCode::SUCCESS
}
