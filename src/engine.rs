//! Common matcher contract
//!
//! All three matchers answer the same question (does any denylist phrase
//! occur as a whole word in this line?) and must agree on every input. They
//! differ only in how they get there. Callers hold a `Box<dyn Matcher>` and
//! never look at a matcher's internals.
//!
//! A matcher is bound to its phrase list at construction. Its search
//! structure is built lazily on the first query (or on [`Matcher::warm`])
//! and reused for every query after that. To search with a different list,
//! build a new matcher.

use crate::automaton::AutomatonMatcher;
use crate::error::BlockscanError;
use crate::index::IndexMatcher;
use crate::normalize::PhraseSet;
use crate::vector::VectorMatcher;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Phrase matcher over lines and blocks of text
pub trait Matcher: Send + Sync {
    /// Human-readable name for reports
    fn name(&self) -> &'static str;

    /// Which strategy this matcher implements
    fn kind(&self) -> MatcherKind;

    /// The normalized denylist this matcher searches for
    fn phrases(&self) -> &PhraseSet;

    /// Build the search structure now instead of on the first query
    fn warm(&self);

    /// True if any phrase occurs as a whole word in `line`
    fn check_line(&self, line: &str) -> bool;

    /// True if any line of the block matches
    fn check_block(&self, lines: &[String]) -> bool {
        lines.iter().any(|line| self.check_line(line))
    }
}

/// The available matching strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// Trie with Aho-Corasick failure links, one pass per line
    Automaton,
    /// Token to phrase inverted index with candidate pruning
    Index,
    /// Lane-width byte comparison with boundary re-check
    Vector,
}

impl MatcherKind {
    /// Every strategy, in report order
    pub const ALL: [MatcherKind; 3] = [
        MatcherKind::Automaton,
        MatcherKind::Index,
        MatcherKind::Vector,
    ];

    /// Short identifier used on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            MatcherKind::Automaton => "automaton",
            MatcherKind::Index => "index",
            MatcherKind::Vector => "vector",
        }
    }

    /// Build a matcher of this kind for the given phrases
    pub fn build(self, phrases: PhraseSet) -> Box<dyn Matcher> {
        match self {
            MatcherKind::Automaton => Box::new(AutomatonMatcher::new(phrases)),
            MatcherKind::Index => Box::new(IndexMatcher::new(phrases)),
            MatcherKind::Vector => Box::new(VectorMatcher::new(phrases)),
        }
    }

    /// Parse a comma-separated list such as `"automaton,vector"` or `"all"`
    pub fn parse_list(list: &str) -> Result<Vec<MatcherKind>, BlockscanError> {
        let mut kinds = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if item.eq_ignore_ascii_case("all") {
                return Ok(MatcherKind::ALL.to_vec());
            }
            let kind: MatcherKind = item.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return Err(BlockscanError::InvalidInput(
                "no matchers selected".to_string(),
            ));
        }
        Ok(kinds)
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatcherKind {
    type Err = BlockscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "automaton" | "aho-corasick" | "ac" => Ok(MatcherKind::Automaton),
            "index" | "inverted-index" => Ok(MatcherKind::Index),
            "vector" | "simd" => Ok(MatcherKind::Vector),
            other => Err(BlockscanError::InvalidInput(format!(
                "unknown matcher '{}' (expected automaton, index or vector)",
                other
            ))),
        }
    }
}

/// One-shot line check with a fresh matcher
///
/// Builds the matcher for `phrases` on every call. Hold a matcher from
/// [`MatcherKind::build`] instead when checking more than a handful of lines.
pub fn check_line<S: AsRef<str>>(kind: MatcherKind, line: &str, phrases: &[S]) -> bool {
    kind.build(PhraseSet::new(phrases)).check_line(line)
}

/// One-shot block check with a fresh matcher
pub fn check_block<S: AsRef<str>>(kind: MatcherKind, lines: &[String], phrases: &[S]) -> bool {
    kind.build(PhraseSet::new(phrases)).check_block(lines)
}
