//! Clap argument definitions for the `tq` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "tq")]
#[command(about = "Boolean text queries - inspect queries and filter lines")]
pub struct Cli {
    /// Use this config file instead of discovering .textquery.toml
    #[arg(long, global = true, env = "TQ_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `tq tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize
    pub query: String,
}

/// Arguments for `tq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query to parse
    pub query: String,

    /// Output the tree as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tq check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Query to check
    pub query: String,
}

/// Arguments for `tq filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    /// Query each line is matched against
    pub query: String,

    /// Files to read (standard input when omitted)
    pub files: Vec<PathBuf>,

    /// Print the number of selected lines instead of the lines
    #[arg(short = 'c', long)]
    pub count: bool,

    /// Select lines that do not match
    #[arg(long)]
    pub invert: bool,
}

/// Supported `tq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the tokens of a query with their positions
    Tokens(TokensCommand),

    /// Print the expression tree of a query
    Parse(ParseCommand),

    /// Check that a query parses, pointing at the error if not
    Check(CheckCommand),

    /// Print the lines that match a query
    Filter(FilterCommand),

    /// Show the configuration in force
    Config,
}
