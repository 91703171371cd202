//! Implementation of `tq parse`.

use std::process::ExitCode;

use crate::cli::{args::ParseCommand, context::CommandContext};

/// Prints the expression tree of a query, as an indented outline or JSON.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let query = match ctx.parser.parse(&cmd.query) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{}", e.format_with_context());
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        match serde_json::to_string_pretty(&query) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize query: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{query}");
    }
    ExitCode::SUCCESS
}
