//! Query lexer (tokenizer).
//!
//! Converts a query string into position-tagged tokens in a single left-to-right pass.
//!
//! Token classes, in order of precedence at any position:
//!
//! 1. Quoted text: copied literally into the current operand
//! 2. Grouping parentheses
//! 3. Operator keywords, recognized only as whole words
//! 4. The field delimiter, turning the text before it into a field specification
//! 5. Anything else, accumulated into the current operand
//!
//! Operand text runs until the next parenthesis or keyword, so `salt and pepper AND x`
//! yields the terms `salt and pepper` and `x`.

use std::{fmt, iter::Peekable, mem, str::CharIndices};

use serde::Serialize;

use crate::{
    ast::Term,
    error::{ParseError, ParseErrorKind},
    syntax::{DEFAULT_SYNTAX, Syntax},
};

/// A boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation.
    Not,
}

impl Operator {
    /// Every operator.
    pub const ALL: [Self; 3] = [Self::And, Self::Or, Self::Not];

    /// The default keyword.
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a token is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// An operand.
    Term(Term),
    /// An operator keyword.
    Operator(Operator),
    /// Opening grouping parenthesis.
    OpenGroup,
    /// Closing grouping parenthesis.
    CloseGroup,
}

/// A token with its byte offset in the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token payload.
    pub kind: TokenKind,
    /// Byte offset of the token's first character.
    pub position: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Term(term) => write!(f, "{term}"),
            TokenKind::Operator(op) => write!(f, "Operator({op})"),
            TokenKind::OpenGroup => f.write_str("OpenGroup"),
            TokenKind::CloseGroup => f.write_str("CloseGroup"),
        }
    }
}

/// A parsed `name{modifier}[operator]` specification.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSpec {
    /// Field name.
    name: String,
    /// Field operator.
    operator: Option<String>,
    /// Field modifier.
    modifier: Option<String>,
    /// Byte offset of the field delimiter.
    position: usize,
}

/// The operand being accumulated.
#[derive(Debug, Default)]
struct Pending {
    /// Operand text so far.
    text: String,
    /// Byte offset of the operand's first character.
    start: Option<usize>,
    /// Whether the current text (field name or value) contains quoted text.
    quoted: bool,
    /// Length of `text` at the end of the last quoted section; trailing whitespace
    /// before this point is kept.
    quoted_end: usize,
    /// Field specification, once a delimiter was seen.
    field: Option<FieldSpec>,
}

impl Pending {
    /// Appends an unquoted character, dropping leading whitespace.
    fn push(&mut self, position: usize, ch: char) {
        if ch.is_whitespace() && self.text.is_empty() && !self.quoted {
            return;
        }
        self.start.get_or_insert(position);
        self.text.push(ch);
    }

    /// True when a field delimiter here starts a field specification.
    fn can_start_field(&self) -> bool {
        self.field.is_none() && !self.quoted
    }

    /// Text with unquoted trailing whitespace removed.
    fn trimmed_text(&mut self) -> String {
        let keep = self.text.trim_end().len().max(self.quoted_end);
        self.text.truncate(keep);
        mem::take(&mut self.text)
    }
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// Special characters and keywords.
    syntax: &'a Syntax,
    /// The original input string.
    input: &'a str,
    /// Characters with their byte offsets.
    chars: Peekable<CharIndices<'a>>,
    /// Whether the previous character ended a word, so a keyword may start here.
    at_boundary: bool,
    /// The operand being accumulated.
    pending: Pending,
    /// Tokens produced so far.
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(syntax: &'a Syntax, input: &'a str) -> Self {
        Self {
            syntax,
            input,
            chars: input.char_indices().peekable(),
            at_boundary: true,
            pending: Pending::default(),
            tokens: Vec::new(),
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(&(position, ch)) = self.chars.peek() {
            if ch == self.syntax.quote {
                self.read_quoted(position)?;
            } else if ch == self.syntax.group.open || ch == self.syntax.group.close {
                self.flush()?;
                self.chars.next();
                let kind = if ch == self.syntax.group.open {
                    TokenKind::OpenGroup
                } else {
                    TokenKind::CloseGroup
                };
                self.tokens.push(Token::new(kind, position));
                self.at_boundary = true;
            } else if let Some(operator) = self.keyword_at(position) {
                self.flush()?;
                self.skip_to(position + self.syntax.keyword(operator).len());
                self.tokens
                    .push(Token::new(TokenKind::Operator(operator), position));
                self.at_boundary = true;
            } else if ch == self.syntax.field_delimiter && self.pending.can_start_field() {
                self.chars.next();
                self.start_field(position)?;
                self.at_boundary = false;
            } else {
                self.chars.next();
                self.pending.push(position, ch);
                self.at_boundary = ch.is_whitespace();
            }
        }

        self.flush()?;
        Ok(self.tokens)
    }

    /// Returns the operator whose keyword starts at `position` as a whole word.
    fn keyword_at(&self, position: usize) -> Option<Operator> {
        if !self.at_boundary {
            return None;
        }

        let rest = &self.input[position..];
        Operator::ALL
            .into_iter()
            .filter(|&op| {
                let keyword = self.syntax.keyword(op);
                rest.starts_with(keyword)
                    && rest[keyword.len()..]
                        .chars()
                        .next()
                        .is_none_or(|next| self.syntax.is_word_boundary(next))
            })
            .max_by_key(|&op| self.syntax.keyword(op).len())
    }

    /// Reads a quoted section into the pending operand.
    fn read_quoted(&mut self, start: usize) -> Result<(), ParseError> {
        self.chars.next(); // consume opening quote
        self.pending.start.get_or_insert(start);
        self.pending.quoted = true;

        loop {
            match self.chars.next() {
                Some((_, ch)) if ch == self.syntax.quote => break,
                Some((_, ch)) => self.pending.text.push(ch),
                None => {
                    return Err(ParseError::new(ParseErrorKind::UnclosedQuote, start)
                        .with_character(self.syntax.quote));
                }
            }
        }

        self.pending.quoted_end = self.pending.text.len();
        self.at_boundary = false;
        Ok(())
    }

    /// Turns the pending text into a field specification.
    fn start_field(&mut self, position: usize) -> Result<(), ParseError> {
        let spec = self.pending.trimmed_text();
        let field = parse_field_spec(self.syntax, &spec, position).ok_or_else(|| {
            ParseError::new(ParseErrorKind::MalformedField, position)
                .with_character(self.syntax.field_delimiter)
        })?;
        self.pending.start.get_or_insert(position);
        self.pending.field = Some(field);
        Ok(())
    }

    /// Emits the pending operand, if any.
    fn flush(&mut self) -> Result<(), ParseError> {
        let mut pending = mem::take(&mut self.pending);
        let Some(start) = pending.start else {
            return Ok(());
        };
        let value = pending.trimmed_text();

        let term = match pending.field {
            Some(field) => {
                if value.is_empty() && !pending.quoted {
                    return Err(ParseError::new(ParseErrorKind::MalformedField, field.position)
                        .with_character(self.syntax.field_delimiter));
                }
                Term {
                    value,
                    field: Some(field.name),
                    operator: field.operator,
                    modifier: field.modifier,
                }
            }
            None => Term::new(value),
        };

        self.tokens.push(Token::new(TokenKind::Term(term), start));
        Ok(())
    }

    /// Advances until the next character starts at or after `position`.
    fn skip_to(&mut self, position: usize) {
        while self.chars.next_if(|&(at, _)| at < position).is_some() {}
    }
}

/// Parses `name`, `name[operator]`, `name{modifier}` or `name{modifier}[operator]`.
///
/// Returns `None` for any other shape, an empty name, or an empty operator or modifier.
fn parse_field_spec(syntax: &Syntax, spec: &str, position: usize) -> Option<FieldSpec> {
    let field_operator = syntax.field_operator;
    let (rest, operator) = split_bracketed(spec, field_operator.open, field_operator.close)?;
    let (name, modifier) = split_bracketed(rest, syntax.modifier.open, syntax.modifier.close)?;

    let valid =
        |part: &str| !part.is_empty() && !part.chars().any(|ch| syntax.is_field_bracket(ch));
    if !valid(name) || !operator.is_none_or(valid) || !modifier.is_none_or(valid) {
        return None;
    }

    Some(FieldSpec {
        name: name.to_string(),
        operator: operator.map(str::to_string),
        modifier: modifier.map(str::to_string),
        position,
    })
}

/// Splits a trailing `open ... close` section off `spec`.
///
/// Returns the text before the section and the section's content, `(spec, None)` when
/// `spec` does not end in `close`, and `None` when `close` has no `open`.
fn split_bracketed(spec: &str, open: char, close: char) -> Option<(&str, Option<&str>)> {
    match spec.strip_suffix(close) {
        Some(inner) => {
            let (head, content) = inner.rsplit_once(open)?;
            Some((head, Some(content)))
        }
        None => Some((spec, None)),
    }
}

/// Tokenizes a query with the given syntax.
pub(crate) fn tokenize_with(syntax: &Syntax, input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(syntax, input).tokenize()
}

/// Tokenizes a query string with the default syntax.
///
/// Bracket balance is not checked here; [`parse`](crate::parse) validates it first.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    tokenize_with(&DEFAULT_SYNTAX, input).map_err(|err| err.with_query(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Token kinds only, for comparisons that ignore positions.
    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn term(s: &str) -> TokenKind {
        TokenKind::Term(Term::new(s))
    }

    fn op(operator: Operator) -> TokenKind {
        TokenKind::Operator(operator)
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn chained_and() {
        assert_eq!(
            kinds("a AND b AND c"),
            vec![
                term("a"),
                op(Operator::And),
                term("b"),
                op(Operator::And),
                term("c")
            ]
        );
    }

    #[test]
    fn positions() {
        let tokens = tokenize("(a OR bc) AND NOT d").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, [0, 1, 3, 6, 8, 10, 14, 18]);
    }

    #[test]
    fn quoted_phrases() {
        assert_eq!(
            kinds("\"a b\" AND \"c d\""),
            vec![term("a b"), op(Operator::And), term("c d")]
        );
    }

    #[test]
    fn quoted_and_bare_mix() {
        assert_eq!(
            kinds("\"a\" AND \"bc\" AND c AND NOT \"d e\""),
            vec![
                term("a"),
                op(Operator::And),
                term("bc"),
                op(Operator::And),
                term("c"),
                op(Operator::And),
                op(Operator::Not),
                term("d e")
            ]
        );
    }

    #[test]
    fn keywords_inside_quotes_are_literal() {
        assert_eq!(kinds("\"salt AND (pepper)\""), vec![term("salt AND (pepper)")]);
    }

    #[test]
    fn quoted_whitespace_is_kept() {
        assert_eq!(kinds("\" padded \""), vec![term(" padded ")]);
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("a AND \"hello world").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnclosedQuote);
        assert_eq!(err.position(), 6);
        assert_eq!(err.character(), Some('"'));
    }

    #[test]
    fn operand_text_keeps_inner_spaces() {
        assert_eq!(
            kinds("  salt and  pepper   OR x "),
            vec![term("salt and  pepper"), op(Operator::Or), term("x")]
        );
    }

    #[test]
    fn keywords_need_word_boundaries() {
        assert_eq!(kinds("ANDROID"), vec![term("ANDROID")]);
        assert_eq!(
            kinds("ORACLE OR NOTHING"),
            vec![term("ORACLE"), op(Operator::Or), term("NOTHING")]
        );
        assert_eq!(kinds("BRAND"), vec![term("BRAND")]);
    }

    #[test]
    fn keywords_next_to_parentheses() {
        assert_eq!(
            kinds("(a)AND(b)"),
            vec![
                TokenKind::OpenGroup,
                term("a"),
                TokenKind::CloseGroup,
                op(Operator::And),
                TokenKind::OpenGroup,
                term("b"),
                TokenKind::CloseGroup
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(kinds("a and b"), vec![term("a and b")]);
    }

    #[test]
    fn field_with_operator() {
        assert_eq!(
            kinds("e[f]:g"),
            vec![TokenKind::Term(Term::new("g").with_field("e").with_operator("f"))]
        );
    }

    #[test]
    fn field_with_modifier_and_operator() {
        assert_eq!(
            kinds("field{lower}[equal]:data"),
            vec![TokenKind::Term(
                Term::new("data")
                    .with_field("field")
                    .with_operator("equal")
                    .with_modifier("lower")
            )]
        );
    }

    #[test]
    fn fields_in_expression() {
        assert_eq!(
            kinds("field{lower}[equal]:data AND d OR e[f]:g"),
            vec![
                TokenKind::Term(
                    Term::new("data")
                        .with_field("field")
                        .with_operator("equal")
                        .with_modifier("lower")
                ),
                op(Operator::And),
                term("d"),
                op(Operator::Or),
                TokenKind::Term(Term::new("g").with_field("e").with_operator("f")),
            ]
        );
    }

    #[test]
    fn plain_field() {
        assert_eq!(
            kinds("title:guide"),
            vec![TokenKind::Term(Term::new("guide").with_field("title"))]
        );
    }

    #[test]
    fn field_with_modifier_only() {
        assert_eq!(
            kinds("title{lower}:guide"),
            vec![TokenKind::Term(
                Term::new("guide").with_field("title").with_modifier("lower")
            )]
        );
    }

    #[test]
    fn field_with_quoted_value() {
        assert_eq!(
            kinds("title:\"getting started\""),
            vec![TokenKind::Term(
                Term::new("getting started").with_field("title")
            )]
        );
    }

    #[test]
    fn later_delimiters_are_literal() {
        assert_eq!(
            kinds("url:http://example.com"),
            vec![TokenKind::Term(
                Term::new("http://example.com").with_field("url")
            )]
        );
    }

    #[test]
    fn quoted_delimiter_is_literal() {
        assert_eq!(kinds("\"a:b\""), vec![term("a:b")]);
    }

    #[test]
    fn field_position_is_field_start() {
        let tokens = tokenize("x OR title:guide").unwrap();
        assert_eq!(tokens[2].position, 5);
    }

    #[test]
    fn malformed_field_specs() {
        for (query, position) in [
            (":value", 0),
            ("title:", 5),
            ("title: AND x", 5),
            ("f[]:v", 3),
            ("f[a]b:v", 5),
            ("f[a]{b}:v", 7),
            ("f{a}{b}:v", 7),
            ("[a]:v", 3),
        ] {
            let err = tokenize(query).unwrap_err();
            assert_eq!(err.kind(), ParseErrorKind::MalformedField, "{query}");
            assert_eq!(err.position(), position, "{query}");
            assert_eq!(err.character(), Some(':'), "{query}");
        }
    }

    #[test]
    fn custom_syntax() {
        let syntax = Syntax::default()
            .with_group('<', '>')
            .with_keywords("&&", "||", "!");
        let kinds: Vec<TokenKind> = tokenize_with(&syntax, "<a && b> || ! c")
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::OpenGroup,
                term("a"),
                op(Operator::And),
                term("b"),
                TokenKind::CloseGroup,
                op(Operator::Or),
                op(Operator::Not),
                term("c")
            ]
        );
    }

    #[test]
    fn multibyte_positions() {
        let tokens = tokenize("café OR thé").unwrap();
        assert_eq!(tokens[1].position, 6);
        assert_eq!(tokens[2].position, 9);
    }
}
