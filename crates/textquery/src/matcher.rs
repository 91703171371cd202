//! Leaf matching.
//!
//! The tree evaluator in [`Node::matches_with`](crate::Node::matches_with) decides the
//! boolean structure; a [`TermMatcher`] decides whether a single leaf matches. The
//! default, [`Substring`], ignores field metadata entirely.

use crate::ast::Term;

/// Decides whether one leaf term matches a candidate string.
///
/// Implemented for [`Substring`] and for any `Fn(&Term, &str) -> bool`, so a caller
/// can interpret `field`, `operator` and `modifier` without touching the parser:
///
/// ```
/// use textquery::{Term, parse};
///
/// let query = parse("title{lower}:guide AND rust").unwrap();
/// let lowercase_aware = |term: &Term, candidate: &str| match term.modifier.as_deref() {
///     Some("lower") => candidate.to_lowercase().contains(&term.value),
///     _ => candidate.contains(&term.value),
/// };
/// assert!(query.matches_with("The rust GUIDE", &lowercase_aware));
/// assert!(!query.matches("The rust GUIDE"));
/// ```
pub trait TermMatcher {
    /// Returns true when `term` matches `candidate`.
    fn matches(&self, term: &Term, candidate: &str) -> bool;
}

/// Case-sensitive substring containment of the term value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Substring;

impl TermMatcher for Substring {
    fn matches(&self, term: &Term, candidate: &str) -> bool {
        candidate.contains(term.value.as_str())
    }
}

impl<F> TermMatcher for F
where
    F: Fn(&Term, &str) -> bool,
{
    fn matches(&self, term: &Term, candidate: &str) -> bool {
        self(term, candidate)
    }
}
