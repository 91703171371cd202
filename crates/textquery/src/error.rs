//! Error types for query parsing and syntax configuration.

use std::fmt;

use thiserror::Error;

use crate::lexer::Operator;

/// The structural problem a [`ParseError`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A closing bracket has no opening bracket of the same kind before it.
    MissingOpen,
    /// An opening bracket is never closed.
    MissingClose,
    /// A quoted phrase runs to the end of the query.
    UnclosedQuote,
    /// A field specification is not `field`, `field[op]`, `field{mod}` or
    /// `field{mod}[op]`, or the field has no value.
    MalformedField,
    /// An operator lacks an operand, or a group is empty.
    MissingOperand,
    /// Two expressions are adjacent without an operator between them.
    MissingOperator,
    /// The expression tree would be deeper than [`MAX_DEPTH`](crate::MAX_DEPTH).
    TooDeep,
}

impl ParseErrorKind {
    /// Human-readable message for this kind.
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingOpen => "open parenthesis is not found",
            Self::MissingClose => "close parenthesis is not found",
            Self::UnclosedQuote => "close quote is not found",
            Self::MalformedField => "malformed field expression",
            Self::MissingOperand => "operand is not found",
            Self::MissingOperator => "operator is not found",
            Self::TooDeep => "query is nested too deeply",
        }
    }

    /// A short hint on how to fix the query.
    pub const fn hint(self) -> &'static str {
        match self {
            Self::MissingOpen => "Remove the stray closing bracket or add its opening counterpart",
            Self::MissingClose => "Add a closing bracket to match the opening one",
            Self::UnclosedQuote => "Add a closing quote to complete the phrase",
            Self::MalformedField => {
                "Field terms look like field:value, field[operator]:value or field{modifier}[operator]:value"
            }
            Self::MissingOperand => {
                "AND and OR need an expression on both sides, NOT needs one after it"
            }
            Self::MissingOperator => "Join adjacent expressions with AND or OR",
            Self::TooDeep => {
                "Every operator adds a level; split very long chains into separate queries"
            }
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A structural query error with the offending position.
///
/// `Display` renders only the message; [`ParseError::format_with_context`] adds the
/// query with a caret under the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// What went wrong.
    kind: ParseErrorKind,
    /// The offending character, when known.
    character: Option<char>,
    /// 0-based byte offset into the query.
    position: usize,
    /// The query being parsed (empty when the error came from a token-level entry point).
    query: String,
}

impl ParseError {
    /// Creates an error at a byte position.
    pub(crate) fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self {
            kind,
            character: None,
            position,
            query: String::new(),
        }
    }

    /// Sets the offending character.
    pub(crate) fn with_character(mut self, character: char) -> Self {
        self.character = Some(character);
        self
    }

    /// Attaches the source query, filling in the offending character from it if unset.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        if self.character.is_none() {
            self.character = self
                .query
                .get(self.position..)
                .and_then(|rest| rest.chars().next());
        }
        self
    }

    /// The kind of error.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The error message without context.
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    /// The offending character.
    pub fn character(&self) -> Option<char> {
        self.character
    }

    /// 0-based byte offset of the offending character.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The query the error refers to.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Formats the error with the query and a position indicator.
    pub fn format_with_context(&self) -> String {
        let column = self
            .query
            .get(..self.position)
            .map_or(self.position, |prefix| prefix.chars().count());
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self.message()));
        result.push_str(&format!("  {}\n", self.query));
        result.push_str(&format!("  {}^\n", " ".repeat(column)));
        result.push_str(&format!("hint: {}", self.kind.hint()));
        result
    }
}

/// An invalid [`Syntax`](crate::Syntax).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A special character is whitespace.
    #[error("syntax character {character:?} is whitespace")]
    WhitespaceCharacter {
        /// The offending character.
        character: char,
    },

    /// A character is assigned to more than one role.
    #[error("syntax character {character:?} is used more than once")]
    DuplicateCharacter {
        /// The offending character.
        character: char,
    },

    /// An operator has an empty keyword.
    #[error("keyword for {operator} is empty")]
    EmptyKeyword {
        /// The operator without a keyword.
        operator: Operator,
    },

    /// A keyword contains whitespace or a special character.
    #[error("keyword {keyword:?} contains whitespace or a syntax character")]
    InvalidKeyword {
        /// The offending keyword.
        keyword: String,
    },

    /// Two operators share a keyword.
    #[error("keyword {keyword:?} is used for more than one operator")]
    DuplicateKeyword {
        /// The shared keyword.
        keyword: String,
    },
}
