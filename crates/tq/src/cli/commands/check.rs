//! Implementation of `tq check`.

use std::process::ExitCode;

use crate::cli::{args::CheckCommand, context::CommandContext};

/// Checks that a query parses.
///
/// Prints the canonical form on success. On failure, prints the query with a caret
/// under the offending character and exits with status 1.
pub fn run(ctx: &CommandContext, cmd: &CheckCommand) -> ExitCode {
    match ctx.parser.parse(&cmd.query) {
        Ok(query) => {
            println!("ok: {}", query.to_query_string_with(ctx.parser.syntax()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.format_with_context());
            ExitCode::FAILURE
        }
    }
}
