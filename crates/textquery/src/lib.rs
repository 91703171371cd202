//! An embeddable boolean query language.
//!
//! Queries combine search terms with boolean operators:
//!
//! - **Terms**: `rust` - text that must appear in the candidate
//! - **Phrases**: `"error handling"` - quoted text, taken literally
//! - **Operators**: `AND`, `OR`, `NOT` - `NOT` binds tightest, then `AND`, then `OR`
//! - **Grouping**: `(a OR b) AND c` - precedence control
//! - **Fields**: `title:guide`, `title[exact]:guide`, `title{lower}[exact]:guide` -
//!   field, operator and modifier are kept on the term for callers to interpret
//!
//! A parsed [`Query`] is immutable and can be matched against any number of
//! candidate strings. Leaves match by case-sensitive substring containment unless a
//! custom [`TermMatcher`] is supplied.
//!
//! # Example
//!
//! ```
//! use textquery::parse;
//!
//! let query = parse("(a AND b AND NOT c) OR (c AND g)").unwrap();
//! assert!(query.matches("a b d"));
//! assert!(!query.matches("a b c"));
//!
//! let err = parse("(title[exact]:guide OR rust").unwrap_err();
//! assert_eq!(err.message(), "close parenthesis is not found");
//! assert_eq!(err.position(), 0);
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod matcher;
mod parser;
mod syntax;
mod validate;

pub use ast::{Node, Query, Term};
pub use error::{ParseError, ParseErrorKind, SyntaxError};
pub use lexer::{Operator, Token, TokenKind, tokenize};
pub use matcher::{Substring, TermMatcher};
pub use parser::{MAX_DEPTH, Parser, build_tree, parse, to_postfix};
pub use syntax::{Bracket, BracketKind, BracketPair, BracketSide, Keywords, Syntax};
pub use validate::validate_brackets;
