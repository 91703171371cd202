//! Bracket balance validation.
//!
//! Grouping parentheses, field operator brackets and modifier brackets are checked
//! together on one stack, so `(a[b)]` is rejected even though each class on its own is
//! balanced. Quoted text is skipped.

use crate::{
    error::{ParseError, ParseErrorKind},
    syntax::{BracketKind, BracketSide, DEFAULT_SYNTAX, Syntax},
};

/// An open bracket waiting for its counterpart.
#[derive(Debug, Clone, Copy)]
struct OpenBracket {
    /// Byte offset in the query.
    position: usize,
    /// The bracket character.
    character: char,
    /// Its class.
    kind: BracketKind,
}

/// Checks bracket balance with the given syntax.
pub(crate) fn validate_brackets_with(syntax: &Syntax, query: &str) -> Result<(), ParseError> {
    let mut stack: Vec<OpenBracket> = Vec::new();
    let mut in_quote = false;

    for (position, character) in query.char_indices() {
        if character == syntax.quote {
            in_quote = !in_quote;
            continue;
        }
        if in_quote {
            continue;
        }

        let Some(bracket) = syntax.bracket(character) else {
            continue;
        };

        match bracket.side {
            BracketSide::Open => stack.push(OpenBracket {
                position,
                character,
                kind: bracket.kind,
            }),
            BracketSide::Close => match stack.pop() {
                Some(open) if open.kind == bracket.kind => {}
                _ => {
                    return Err(ParseError::new(ParseErrorKind::MissingOpen, position)
                        .with_character(character));
                }
            },
        }
    }

    // Innermost unmatched bracket
    if let Some(open) = stack.pop() {
        return Err(
            ParseError::new(ParseErrorKind::MissingClose, open.position)
                .with_character(open.character),
        );
    }

    Ok(())
}

/// Checks that every bracket in `query` is matched, using the default syntax.
///
/// Fails with `open parenthesis is not found` at a closing bracket that has no opening
/// bracket of its kind, or with `close parenthesis is not found` at the innermost
/// opening bracket left unclosed.
pub fn validate_brackets(query: &str) -> Result<(), ParseError> {
    validate_brackets_with(&DEFAULT_SYNTAX, query).map_err(|err| err.with_query(query))
}
