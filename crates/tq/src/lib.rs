//! tq: boolean queries over lines of text
//!
//! `tq` parses boolean queries (`(a OR b) AND NOT c`) with the `textquery` library and
//! uses them to filter lines of text. The command-line surface lives in [`cli`]; the
//! binary only sets up logging and dispatches.

#![warn(missing_docs)]

pub mod cli;
