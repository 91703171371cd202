//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod filter;
pub mod parse;
pub mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Exit status for usage, I/O and query errors.
pub const EXIT_ERROR: u8 = 2;

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Tokens(cmd) => tokens::run(ctx, &cmd),
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Check(cmd) => check::run(ctx, &cmd),
        Commands::Filter(cmd) => filter::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
