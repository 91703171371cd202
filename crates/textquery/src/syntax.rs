//! Query syntax configuration.
//!
//! A [`Syntax`] names every special character and keyword the lexer and the bracket
//! validator recognize. The default is the classic set:
//!
//! - grouping: `(` `)`
//! - field operator: `[` `]` (as in `title[exact]:guide`)
//! - modifier: `{` `}` (as in `title{lower}[exact]:guide`)
//! - field delimiter: `:`
//! - quote: `"`
//! - keywords: `AND`, `OR`, `NOT`

use std::{collections::HashSet, sync::LazyLock};

use serde::{Deserialize, Serialize};

use crate::{error::SyntaxError, lexer::Operator};

/// The default syntax, shared by the free-standing entry points.
pub(crate) static DEFAULT_SYNTAX: LazyLock<Syntax> = LazyLock::new(Syntax::default);

/// An open/close character pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BracketPair {
    /// Opening character.
    pub open: char,
    /// Closing character.
    pub close: char,
}

impl BracketPair {
    /// Creates a new pair.
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}

/// The three independent bracket classes tracked by the balance validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    /// Grouping parentheses around sub-expressions.
    Group,
    /// Field operator brackets (`field[operator]:value`).
    FieldOperator,
    /// Modifier brackets (`field{modifier}:value`).
    Modifier,
}

/// Which side of a pair a bracket character is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSide {
    /// An opening bracket.
    Open,
    /// A closing bracket.
    Close,
}

/// A classified bracket character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Bracket class.
    pub kind: BracketKind,
    /// Opening or closing.
    pub side: BracketSide,
}

/// Keyword text for each boolean operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    /// Conjunction keyword.
    pub and: String,
    /// Disjunction keyword.
    pub or: String,
    /// Negation keyword.
    pub not: String,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            and: "AND".into(),
            or: "OR".into(),
            not: "NOT".into(),
        }
    }
}

/// Special characters and keywords of the query language.
///
/// Build one with the `with_*` methods and hand it to [`Parser::new`](crate::Parser::new),
/// which validates it. Deserializing from a partial table only overrides the named
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Separates a field specification from its value.
    pub field_delimiter: char,
    /// Delimits literal phrases.
    pub quote: char,
    /// Grouping parentheses.
    pub group: BracketPair,
    /// Brackets around a field operator.
    pub field_operator: BracketPair,
    /// Brackets around a field modifier.
    pub modifier: BracketPair,
    /// Operator keywords.
    pub keywords: Keywords,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            group: BracketPair::new('(', ')'),
            field_operator: BracketPair::new('[', ']'),
            modifier: BracketPair::new('{', '}'),
            field_delimiter: ':',
            quote: '"',
            keywords: Keywords::default(),
        }
    }
}

impl Syntax {
    /// Replaces the grouping parentheses.
    pub fn with_group(mut self, open: char, close: char) -> Self {
        self.group = BracketPair::new(open, close);
        self
    }

    /// Replaces the field operator brackets.
    pub fn with_field_operator(mut self, open: char, close: char) -> Self {
        self.field_operator = BracketPair::new(open, close);
        self
    }

    /// Replaces the modifier brackets.
    pub fn with_modifier(mut self, open: char, close: char) -> Self {
        self.modifier = BracketPair::new(open, close);
        self
    }

    /// Replaces the field delimiter.
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    /// Replaces the quote character.
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Replaces the operator keywords.
    pub fn with_keywords(
        mut self,
        and: impl Into<String>,
        or: impl Into<String>,
        not: impl Into<String>,
    ) -> Self {
        self.keywords = Keywords {
            and: and.into(),
            or: or.into(),
            not: not.into(),
        };
        self
    }

    /// Returns the keyword for an operator.
    pub fn keyword(&self, operator: Operator) -> &str {
        match operator {
            Operator::And => &self.keywords.and,
            Operator::Or => &self.keywords.or,
            Operator::Not => &self.keywords.not,
        }
    }

    /// Returns the pair for a bracket class.
    pub const fn pair(&self, kind: BracketKind) -> BracketPair {
        match kind {
            BracketKind::Group => self.group,
            BracketKind::FieldOperator => self.field_operator,
            BracketKind::Modifier => self.modifier,
        }
    }

    /// Classifies a character as one of the bracket kinds, if it is one.
    pub fn bracket(&self, ch: char) -> Option<Bracket> {
        [
            BracketKind::Group,
            BracketKind::FieldOperator,
            BracketKind::Modifier,
        ]
        .into_iter()
        .find_map(|kind| {
            let pair = self.pair(kind);
            if ch == pair.open {
                Some(Bracket {
                    kind,
                    side: BracketSide::Open,
                })
            } else if ch == pair.close {
                Some(Bracket {
                    kind,
                    side: BracketSide::Close,
                })
            } else {
                None
            }
        })
    }

    /// True for characters that end a bare word: whitespace, grouping parentheses and
    /// the quote.
    pub(crate) fn is_word_boundary(&self, ch: char) -> bool {
        ch.is_whitespace() || ch == self.group.open || ch == self.group.close || ch == self.quote
    }

    /// True for the characters of the field operator and modifier brackets.
    pub(crate) fn is_field_bracket(&self, ch: char) -> bool {
        ch == self.field_operator.open
            || ch == self.field_operator.close
            || ch == self.modifier.open
            || ch == self.modifier.close
    }

    /// All single special characters, in a fixed order.
    fn special_characters(&self) -> [char; 8] {
        [
            self.group.open,
            self.group.close,
            self.field_operator.open,
            self.field_operator.close,
            self.modifier.open,
            self.modifier.close,
            self.field_delimiter,
            self.quote,
        ]
    }

    /// Checks that the syntax is unambiguous.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        let specials = self.special_characters();
        let mut seen = HashSet::with_capacity(specials.len());
        for character in specials {
            if character.is_whitespace() {
                return Err(SyntaxError::WhitespaceCharacter { character });
            }
            if !seen.insert(character) {
                return Err(SyntaxError::DuplicateCharacter { character });
            }
        }

        let mut keywords = HashSet::with_capacity(Operator::ALL.len());
        for operator in Operator::ALL {
            let keyword = self.keyword(operator);
            if keyword.is_empty() {
                return Err(SyntaxError::EmptyKeyword { operator });
            }
            if keyword
                .chars()
                .any(|ch| ch.is_whitespace() || specials.contains(&ch))
            {
                return Err(SyntaxError::InvalidKeyword {
                    keyword: keyword.to_string(),
                });
            }
            if !keywords.insert(keyword) {
                return Err(SyntaxError::DuplicateKeyword {
                    keyword: keyword.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Syntax::default().validate(), Ok(()));
    }

    #[test]
    fn classifies_brackets() {
        let syntax = Syntax::default();
        assert_eq!(
            syntax.bracket(']'),
            Some(Bracket {
                kind: BracketKind::FieldOperator,
                side: BracketSide::Close,
            })
        );
        assert_eq!(
            syntax.bracket('{'),
            Some(Bracket {
                kind: BracketKind::Modifier,
                side: BracketSide::Open,
            })
        );
        assert_eq!(syntax.bracket(':'), None);
        assert_eq!(syntax.bracket('a'), None);
    }

    #[test]
    fn custom_brackets_replace_defaults() {
        let syntax = Syntax::default().with_group('<', '>');
        assert_eq!(syntax.bracket('(').map(|b| b.kind), None);
        assert_eq!(syntax.bracket('<').map(|b| b.kind), Some(BracketKind::Group));
    }

    #[test]
    fn rejects_duplicate_character() {
        let syntax = Syntax::default().with_field_delimiter('[');
        assert_eq!(
            syntax.validate(),
            Err(SyntaxError::DuplicateCharacter { character: '[' })
        );
    }

    #[test]
    fn rejects_whitespace_character() {
        let syntax = Syntax::default().with_quote(' ');
        assert_eq!(
            syntax.validate(),
            Err(SyntaxError::WhitespaceCharacter { character: ' ' })
        );
    }

    #[test]
    fn rejects_bad_keywords() {
        let empty = Syntax::default().with_keywords("AND", "", "NOT");
        assert_eq!(
            empty.validate(),
            Err(SyntaxError::EmptyKeyword {
                operator: Operator::Or
            })
        );

        let spaced = Syntax::default().with_keywords("AND ALSO", "OR", "NOT");
        assert!(matches!(
            spaced.validate(),
            Err(SyntaxError::InvalidKeyword { .. })
        ));

        let special = Syntax::default().with_keywords("A:ND", "OR", "NOT");
        assert!(matches!(
            special.validate(),
            Err(SyntaxError::InvalidKeyword { .. })
        ));

        let duplicate = Syntax::default().with_keywords("X", "X", "NOT");
        assert_eq!(
            duplicate.validate(),
            Err(SyntaxError::DuplicateKeyword { keyword: "X".into() })
        );
    }

    #[test]
    fn keyword_lookup() {
        let syntax = Syntax::default().with_keywords("&&", "||", "!");
        assert_eq!(syntax.keyword(Operator::And), "&&");
        assert_eq!(syntax.keyword(Operator::Or), "||");
        assert_eq!(syntax.keyword(Operator::Not), "!");
    }
}
