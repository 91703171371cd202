//! Query parser.
//!
//! Parses a token stream into a binary expression tree in two passes: the
//! shunting-yard algorithm reorders infix tokens into postfix (reverse Polish)
//! order, then a node stack folds the postfix stream into a tree.
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. `NOT` (right-associative)
//! 3. `AND` (left-associative)
//! 4. `OR` (left-associative)

use std::sync::LazyLock;

use tracing::{debug, trace};

use crate::{
    ast::{Node, Query},
    error::{ParseError, ParseErrorKind, SyntaxError},
    lexer::{Operator, Token, TokenKind, tokenize_with},
    syntax::Syntax,
    validate::validate_brackets_with,
};

/// Parser for the default syntax.
static DEFAULT_PARSER: LazyLock<Parser> = LazyLock::new(Parser::default);

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    /// `a OR b OR c` is `(a OR b) OR c`.
    Left,
    /// `NOT NOT a` is `NOT (NOT a)`.
    Right,
}

/// Precedence and associativity of each operator.
const fn binding(operator: Operator) -> (u8, Associativity) {
    match operator {
        Operator::Not => (3, Associativity::Right),
        Operator::And => (2, Associativity::Left),
        Operator::Or => (1, Associativity::Left),
    }
}

/// True when `top` (already on the operator stack) must be emitted before `incoming`
/// is pushed.
fn has_precedence(top: Operator, incoming: Operator) -> bool {
    let (top_precedence, associativity) = binding(top);
    let (incoming_precedence, _) = binding(incoming);
    match associativity {
        Associativity::Left => top_precedence >= incoming_precedence,
        Associativity::Right => top_precedence > incoming_precedence,
    }
}

/// Reorders infix tokens into postfix order (shunting-yard).
///
/// Operands go straight to the output, operators wait on a stack until an operator
/// of lower precedence or a closing parenthesis releases them. Parentheses do not
/// appear in the output.
///
/// Alongside the reordering, the token sequence is checked for operands and
/// operators in the right places: an operator or `)` where an operand belongs is
/// `operand is not found`, an operand, `(` or `NOT` right after a complete
/// expression is `operator is not found`.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut expect_operand = true;
    let mut last_position = None;

    for token in tokens {
        let position = token.position;
        last_position = Some(position);

        match token.kind {
            TokenKind::Term(_) => {
                if !expect_operand {
                    return Err(ParseError::new(ParseErrorKind::MissingOperator, position));
                }
                output.push(token);
                expect_operand = false;
            }
            TokenKind::OpenGroup => {
                if !expect_operand {
                    return Err(ParseError::new(ParseErrorKind::MissingOperator, position));
                }
                stack.push(token);
            }
            TokenKind::CloseGroup => {
                if expect_operand {
                    return Err(ParseError::new(ParseErrorKind::MissingOperand, position));
                }
                loop {
                    match stack.pop() {
                        Some(Token {
                            kind: TokenKind::OpenGroup,
                            ..
                        }) => break,
                        Some(top) => output.push(top),
                        None => {
                            return Err(ParseError::new(ParseErrorKind::MissingOpen, position));
                        }
                    }
                }
            }
            TokenKind::Operator(incoming) => {
                match (incoming, expect_operand) {
                    (Operator::Not, false) => {
                        return Err(ParseError::new(ParseErrorKind::MissingOperator, position));
                    }
                    (Operator::And | Operator::Or, true) => {
                        return Err(ParseError::new(ParseErrorKind::MissingOperand, position));
                    }
                    _ => {}
                }
                while let Some(Token {
                    kind: TokenKind::Operator(top),
                    ..
                }) = stack.last()
                {
                    if !has_precedence(*top, incoming) {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(token);
                expect_operand = true;
            }
        }
    }

    if expect_operand && let Some(position) = last_position {
        return Err(ParseError::new(ParseErrorKind::MissingOperand, position));
    }

    while let Some(token) = stack.pop() {
        if token.kind == TokenKind::OpenGroup {
            return Err(ParseError::new(
                ParseErrorKind::MissingClose,
                token.position,
            ));
        }
        output.push(token);
    }

    Ok(output)
}

/// Maximum depth of a parsed expression tree.
///
/// Matching, rendering and dropping a tree recurse once per level, so deeper trees
/// are rejected while building. A leaf is one level; each operator adds one, which
/// makes a chain of `n` terms joined by `AND` `n` levels deep.
pub const MAX_DEPTH: usize = 1000;

/// A subtree on the build stack.
struct Built {
    /// The subtree.
    node: Node,
    /// Byte offset of the token that produced it.
    position: usize,
    /// Levels in the subtree.
    depth: usize,
}

/// Folds postfix tokens into a tree.
///
/// Each stack entry remembers the position of the token that produced it, so
/// structural errors point into the query. Trees deeper than [`MAX_DEPTH`] are
/// rejected at the operator that would exceed it.
pub fn build_tree(postfix: Vec<Token>) -> Result<Query, ParseError> {
    let mut stack: Vec<Built> = Vec::with_capacity(postfix.len());

    for token in postfix {
        let position = token.position;
        let (node, depth) = match token.kind {
            TokenKind::Term(term) => (Node::Term(term), 1),
            TokenKind::Operator(operator) => {
                let right = pop_operand(&mut stack, position)?;
                let (node, depth) = match operator {
                    // NOT has only a right child
                    Operator::Not => (Node::not(right.node), right.depth),
                    Operator::And | Operator::Or => {
                        let left = pop_operand(&mut stack, position)?;
                        let depth = left.depth.max(right.depth);
                        let node = if operator == Operator::And {
                            Node::and(left.node, right.node)
                        } else {
                            Node::or(left.node, right.node)
                        };
                        (node, depth)
                    }
                };
                if depth >= MAX_DEPTH {
                    return Err(ParseError::new(ParseErrorKind::TooDeep, position));
                }
                (node, depth + 1)
            }
            TokenKind::OpenGroup => {
                return Err(ParseError::new(ParseErrorKind::MissingClose, position));
            }
            TokenKind::CloseGroup => {
                return Err(ParseError::new(ParseErrorKind::MissingOpen, position));
            }
        };
        stack.push(Built {
            node,
            position,
            depth,
        });
    }

    let mut roots = stack.into_iter();
    let Some(root) = roots.next() else {
        return Ok(Query::empty());
    };
    if let Some(extra) = roots.next() {
        return Err(ParseError::new(ParseErrorKind::MissingOperator, extra.position));
    }

    Ok(Query::new(root.node))
}

/// Pops the operand an operator at `position` needs.
fn pop_operand(stack: &mut Vec<Built>, position: usize) -> Result<Built, ParseError> {
    stack
        .pop()
        .ok_or_else(|| ParseError::new(ParseErrorKind::MissingOperand, position))
}

/// A query parser for one [`Syntax`].
///
/// Parsers are immutable and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    /// Special characters and keywords.
    syntax: Syntax,
}

impl Parser {
    /// Creates a parser, rejecting an ambiguous syntax.
    pub fn new(syntax: Syntax) -> Result<Self, SyntaxError> {
        syntax.validate()?;
        Ok(Self { syntax })
    }

    /// The syntax this parser recognizes.
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Checks bracket balance.
    pub fn validate(&self, query: &str) -> Result<(), ParseError> {
        validate_brackets_with(&self.syntax, query).map_err(|err| err.with_query(query))
    }

    /// Splits a query into tokens without checking bracket balance.
    pub fn tokenize(&self, query: &str) -> Result<Vec<Token>, ParseError> {
        tokenize_with(&self.syntax, query).map_err(|err| err.with_query(query))
    }

    /// Parses a query into a tree.
    ///
    /// Returns the empty query for blank input. Parsing stops at the first
    /// structural error; no partial tree is returned.
    pub fn parse(&self, query: &str) -> Result<Query, ParseError> {
        debug!(query, "parsing query");

        let result = validate_brackets_with(&self.syntax, query)
            .and_then(|()| tokenize_with(&self.syntax, query))
            .and_then(|tokens| {
                trace!(count = tokens.len(), "tokenized");
                to_postfix(tokens)
            })
            .and_then(build_tree)
            .map_err(|err| err.with_query(query));

        if let Err(err) = &result {
            debug!(position = err.position(), "query rejected: {err}");
        }
        result
    }
}

/// Parses a query string with the default syntax.
///
/// Returns the empty query (which matches nothing) for blank input, or a
/// [`ParseError`] pointing at the offending character.
pub fn parse(input: &str) -> Result<Query, ParseError> {
    DEFAULT_PARSER.parse(input)
}
