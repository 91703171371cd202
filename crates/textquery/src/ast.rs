//! Query expression tree.
//!
//! A parsed query is a strict binary tree: leaves are [`Term`]s, `NOT` has one child,
//! `AND` and `OR` have two. Every node owns its children.

use std::fmt;

use serde::Serialize;

use crate::{
    lexer::Operator,
    matcher::{Substring, TermMatcher},
    syntax::{DEFAULT_SYNTAX, Syntax},
};

/// An operand: the literal text to look for plus optional field metadata.
///
/// The default matcher only looks at `value`; `field`, `operator` and `modifier` are
/// carried for callers that layer field-aware matching on top (see
/// [`TermMatcher`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Term {
    /// Literal text (quotes removed).
    pub value: String,
    /// Field name from `field:value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Field operator from `field[operator]:value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Field modifier from `field{modifier}:value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

impl Term {
    /// Creates a term without field metadata.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Sets the field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the field operator.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    /// Sets the field modifier.
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    /// Renders the term as query text in the given syntax.
    fn to_query_string(&self, syntax: &Syntax) -> String {
        let mut out = String::new();
        if let Some(field) = &self.field {
            out.push_str(field);
            if let Some(modifier) = &self.modifier {
                out.push(syntax.modifier.open);
                out.push_str(modifier);
                out.push(syntax.modifier.close);
            }
            if let Some(operator) = &self.operator {
                out.push(syntax.field_operator.open);
                out.push_str(operator);
                out.push(syntax.field_operator.close);
            }
            out.push(syntax.field_delimiter);
        }

        if self.needs_quotes(syntax) {
            out.push(syntax.quote);
            out.push_str(&self.value);
            out.push(syntax.quote);
        } else {
            out.push_str(&self.value);
        }
        out
    }

    /// True when the value would not survive re-lexing as bare text.
    fn needs_quotes(&self, syntax: &Syntax) -> bool {
        self.value.is_empty()
            || Operator::ALL
                .iter()
                .any(|&op| self.value.split_whitespace().any(|w| w == syntax.keyword(op)))
            || self.value.chars().any(|ch| {
                ch.is_whitespace()
                    || ch == syntax.field_delimiter
                    || syntax.bracket(ch).is_some()
            })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({:?}", self.value)?;
        if let Some(field) = &self.field {
            write!(f, " field={field:?}")?;
        }
        if let Some(operator) = &self.operator {
            write!(f, " operator={operator:?}")?;
        }
        if let Some(modifier) = &self.modifier {
            write!(f, " modifier={modifier:?}")?;
        }
        f.write_str(")")
    }
}

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    /// A leaf operand.
    Term(Term),
    /// Negation of its only child.
    Not(Box<Self>),
    /// Conjunction: left and right must match.
    And(Box<Self>, Box<Self>),
    /// Disjunction: left or right must match.
    Or(Box<Self>, Box<Self>),
}

impl Node {
    /// Creates a leaf.
    pub fn term(term: Term) -> Self {
        Self::Term(term)
    }

    /// Creates a negation.
    pub fn not(child: Self) -> Self {
        Self::Not(Box::new(child))
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// The operator at this node, or `None` for a leaf.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Term(_) => None,
            Self::Not(_) => Some(Operator::Not),
            Self::And(..) => Some(Operator::And),
            Self::Or(..) => Some(Operator::Or),
        }
    }

    /// Matches a candidate with plain substring containment.
    pub fn matches(&self, candidate: &str) -> bool {
        self.matches_with(candidate, &Substring)
    }

    /// Matches a candidate, deciding each leaf with `matcher`.
    ///
    /// An empty candidate matches nothing. Both sides of `AND`/`OR` are always
    /// evaluated.
    pub fn matches_with<M>(&self, candidate: &str, matcher: &M) -> bool
    where
        M: TermMatcher + ?Sized,
    {
        if candidate.is_empty() {
            return false;
        }

        match self {
            Self::Term(term) => matcher.matches(term, candidate),
            Self::Not(child) => !child.matches_with(candidate, matcher),
            Self::And(left, right) => {
                let left = left.matches_with(candidate, matcher);
                let right = right.matches_with(candidate, matcher);
                left && right
            }
            Self::Or(left, right) => {
                let left = left.matches_with(candidate, matcher);
                let right = right.matches_with(candidate, matcher);
                left || right
            }
        }
    }

    /// Visits every leaf term, left to right.
    pub fn for_each_term<'a>(&'a self, f: &mut impl FnMut(&'a Term)) {
        match self {
            Self::Term(term) => f(term),
            Self::Not(child) => child.for_each_term(f),
            Self::And(left, right) | Self::Or(left, right) => {
                left.for_each_term(f);
                right.for_each_term(f);
            }
        }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(term) => writeln!(f, "{prefix}{term}"),
            Self::Not(child) => {
                writeln!(f, "{prefix}Not")?;
                child.fmt_tree(f, indent + 1)
            }
            Self::And(left, right) => {
                writeln!(f, "{prefix}And")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Or(left, right) => {
                writeln!(f, "{prefix}Or")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Renders the node as fully parenthesized query text.
    fn fmt_query_string(&self, syntax: &Syntax) -> String {
        let group = syntax.group;
        match self {
            Self::Term(term) => term.to_query_string(syntax),
            Self::Not(child) => format!(
                "{} {}",
                syntax.keyword(Operator::Not),
                child.fmt_query_string(syntax)
            ),
            Self::And(left, right) | Self::Or(left, right) => {
                let keyword = self.operator().map_or("", |op| syntax.keyword(op));
                format!(
                    "{}{} {keyword} {}{}",
                    group.open,
                    left.fmt_query_string(syntax),
                    right.fmt_query_string(syntax),
                    group.close
                )
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// A parsed query, ready for repeated matching.
///
/// The empty query has no root and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query {
    /// Tree root.
    root: Option<Node>,
}

impl Query {
    /// Wraps a tree.
    pub fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    /// The query that matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tree root, if any.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Consumes the query, returning the tree root.
    pub fn into_root(self) -> Option<Node> {
        self.root
    }

    /// True for the empty query.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Matches a candidate with plain substring containment.
    pub fn matches(&self, candidate: &str) -> bool {
        self.matches_with(candidate, &Substring)
    }

    /// Matches a candidate, deciding each leaf with `matcher`.
    pub fn matches_with<M>(&self, candidate: &str, matcher: &M) -> bool
    where
        M: TermMatcher + ?Sized,
    {
        self.root
            .as_ref()
            .is_some_and(|root| root.matches_with(candidate, matcher))
    }

    /// Collects the leaf terms, left to right.
    pub fn terms(&self) -> Vec<&Term> {
        let mut terms = Vec::new();
        if let Some(root) = &self.root {
            root.for_each_term(&mut |term| terms.push(term));
        }
        terms
    }

    /// Formats the query as fully parenthesized text in the default syntax.
    ///
    /// This produces output like: `(a OR (b AND NOT c))`
    pub fn to_query_string(&self) -> String {
        self.to_query_string_with(&DEFAULT_SYNTAX)
    }

    /// Formats the query as fully parenthesized text in the given syntax.
    pub fn to_query_string_with(&self, syntax: &Syntax) -> String {
        self.root
            .as_ref()
            .map(|root| root.fmt_query_string(syntax))
            .unwrap_or_default()
    }
}

impl From<Node> for Query {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => root.fmt_tree(f, 0),
            None => writeln!(f, "(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Node {
        Node::term(Term::new(s))
    }

    #[test]
    fn leaf_matches_substring() {
        assert!(term("rust").matches("trusty rusty"));
        assert!(!term("Rust").matches("rust"));
    }

    #[test]
    fn empty_candidate_matches_nothing() {
        assert!(!term("a").matches(""));
        assert!(!Node::not(term("a")).matches(""));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let query = Query::empty();
        assert!(query.is_empty());
        assert!(!query.matches("anything"));
    }

    #[test]
    fn not_negates_child() {
        let tree = Node::and(term("a"), Node::not(term("c")));
        assert!(tree.matches("a b"));
        assert!(!tree.matches("a c"));
    }

    #[test]
    fn leading_not_negates() {
        let tree = Node::and(Node::not(term("a")), term("b"));
        assert!(tree.matches("b"));
        assert!(!tree.matches("a b"));
    }

    #[test]
    fn tree_display() {
        let tree = Node::or(
            term("a"),
            Node::and(term("b"), Node::not(term("c"))),
        );
        assert_eq!(
            tree.to_string(),
            "Or\n  Term(\"a\")\n  And\n    Term(\"b\")\n    Not\n      Term(\"c\")\n"
        );
    }

    #[test]
    fn term_display_includes_metadata() {
        let leaf = Term::new("data")
            .with_field("field")
            .with_operator("equal")
            .with_modifier("lower");
        assert_eq!(
            leaf.to_string(),
            "Term(\"data\" field=\"field\" operator=\"equal\" modifier=\"lower\")"
        );
    }

    #[test]
    fn query_string_is_fully_parenthesized() {
        let query = Query::new(Node::or(
            term("a"),
            Node::and(term("b"), Node::not(term("c d"))),
        ));
        assert_eq!(query.to_query_string(), "(a OR (b AND NOT \"c d\"))");
    }

    #[test]
    fn query_string_renders_fields() {
        let query = Query::new(Node::term(
            Term::new("data")
                .with_field("field")
                .with_operator("equal")
                .with_modifier("lower"),
        ));
        assert_eq!(query.to_query_string(), "field{lower}[equal]:data");
    }

    #[test]
    fn query_string_quotes_keywords() {
        let query = Query::new(term("salt AND pepper"));
        assert_eq!(query.to_query_string(), "\"salt AND pepper\"");
    }

    #[test]
    fn collects_terms_in_order() {
        let query = Query::new(Node::or(term("a"), Node::and(term("b"), term("c"))));
        let values: Vec<&str> = query.terms().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn serializes_to_json() {
        let query = Query::new(Node::and(
            term("a"),
            Node::term(Term::new("b").with_field("title")),
        ));
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(
            json,
            r#"{"and":[{"term":{"value":"a"}},{"term":{"value":"b","field":"title"}}]}"#
        );
        assert_eq!(serde_json::to_string(&Query::empty()).unwrap(), "null");
    }
}
