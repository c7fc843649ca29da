//! Inverted index matcher
//!
//! Builds a token to phrase-id index from the denylist and uses it to
//! narrow the phrases worth verifying against a line. A direct scan over
//! every phrase runs first; the index pass runs when that finds nothing.

use crate::engine::{Matcher, MatcherKind};
use crate::normalize::{is_exact_normalized, normalize, PhraseSet};
use memchr::memmem;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::OnceLock;

/// Characters stripped from both ends of a token. Dashes are kept.
const EDGE_PUNCTUATION: &[char] = &[
    '"', '\'', '«', '»', '(', ')', '[', ']', '{', '}', '.', ',', ';', ':', '!', '?',
];

/// Strip edge punctuation from a word
pub fn clean_token(word: &str) -> &str {
    word.trim_matches(EDGE_PUNCTUATION)
}

/// Distinct non-empty cleaned tokens of normalized text
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    text.split(' ')
        .map(clean_token)
        .filter(|token| !token.is_empty() && seen.insert(*token))
        .collect()
}

/// Token to phrase-id postings
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: FxHashMap<String, Vec<u32>>,
}

impl InvertedIndex {
    /// Index every phrase under each of its distinct cleaned words
    pub fn build(phrases: &PhraseSet) -> Self {
        let mut postings: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        for (id, phrase) in phrases.iter() {
            for token in tokenize(phrase) {
                postings.entry(token.to_string()).or_default().push(id);
            }
        }

        tracing::debug!(
            phrases = phrases.len(),
            tokens = postings.len(),
            "built inverted index"
        );
        Self { postings }
    }

    /// Phrase ids indexed under `token`
    pub fn lookup(&self, token: &str) -> &[u32] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct tokens
    pub fn token_count(&self) -> usize {
        self.postings.len()
    }
}

/// Matcher backed by an [`InvertedIndex`]
pub struct IndexMatcher {
    phrases: PhraseSet,
    index: OnceLock<InvertedIndex>,
}

impl IndexMatcher {
    /// Create a matcher; the index is built on first use
    pub fn new(phrases: PhraseSet) -> Self {
        Self {
            phrases,
            index: OnceLock::new(),
        }
    }

    fn index(&self) -> &InvertedIndex {
        self.index.get_or_init(|| InvertedIndex::build(&self.phrases))
    }

    /// Number of distinct index tokens (builds the index if needed)
    pub fn token_count(&self) -> usize {
        self.index().token_count()
    }

    fn verify(line: &str, phrase: &str) -> bool {
        memmem::find(line.as_bytes(), phrase.as_bytes()).is_some()
            && is_exact_normalized(line, phrase)
    }

    fn direct_scan(&self, line: &str) -> bool {
        self.phrases
            .as_slice()
            .iter()
            .any(|phrase| Self::verify(line, phrase))
    }

    fn indexed_scan(&self, line: &str) -> bool {
        let index = self.index();
        let mut candidates = FxHashSet::default();
        for token in tokenize(line) {
            for &id in index.lookup(token) {
                if self.phrases.get(id).is_some_and(|p| p.len() <= line.len()) {
                    candidates.insert(id);
                }
            }
        }

        candidates
            .into_iter()
            .filter_map(|id| self.phrases.get(id))
            .any(|phrase| Self::verify(line, phrase))
    }
}

impl Matcher for IndexMatcher {
    fn name(&self) -> &'static str {
        "Inverted index"
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Index
    }

    fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    fn warm(&self) {
        self.index();
    }

    fn check_line(&self, line: &str) -> bool {
        let line = normalize(line);
        if line.is_empty() {
            return false;
        }
        self.direct_scan(&line) || self.indexed_scan(&line)
    }
}
