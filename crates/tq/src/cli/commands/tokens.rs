//! Implementation of `tq tokens`.

use std::process::ExitCode;

use textquery::TokenKind;

use crate::cli::{args::TokensCommand, context::CommandContext};

/// Prints each token on its own line, prefixed with its byte offset.
///
/// Operators are shown with the keyword of the active syntax.
pub fn run(ctx: &CommandContext, cmd: &TokensCommand) -> ExitCode {
    let tokens = match ctx.parser.tokenize(&cmd.query) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e.format_with_context());
            return ExitCode::FAILURE;
        }
    };

    let syntax = ctx.parser.syntax();
    for token in &tokens {
        match token.kind {
            TokenKind::Operator(op) => {
                println!("{:>4}  Operator({})", token.position, syntax.keyword(op));
            }
            _ => println!("{:>4}  {token}", token.position),
        }
    }
    ExitCode::SUCCESS
}
