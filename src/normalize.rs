//! Text normalization and whole-word match validation
//!
//! Every matcher compares text in one canonical form: lower-cased, trimmed,
//! with each run of whitespace collapsed to a single space. A raw substring
//! hit only counts once [`is_exact_match`] confirms that the characters on
//! either side of it are boundary characters (anything that is not a letter
//! or digit).
//!
//! # Example
//! ```
//! use blockscan::normalize::{is_exact_match, normalize};
//!
//! assert_eq!(normalize("  Acme\t\tCORP  "), "acme corp");
//! assert!(is_exact_match("microsoft corp", "corp"));
//! assert!(!is_exact_match("corporate", "corp"));
//! ```

use memchr::memmem;
use rustc_hash::FxHashSet;
use std::borrow::Cow;
use std::ops::Range;

/// Canonicalize text for comparison
///
/// Folds to lower case, trims both ends and collapses whitespace runs to one
/// space. Empty or all-whitespace input yields an empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for word in lowered.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Lower-case `text`, borrowing when it is already folded
pub fn fold_case(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    } else {
        let lowered = text.to_lowercase();
        if lowered == text {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(lowered)
        }
    }
}

/// A character that may sit next to a phrase in a whole-word match
#[inline]
pub fn is_boundary_char(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Check whether `pattern` occurs in `text` as a whole-word match
///
/// Every occurrence is tried left to right (overlapping ones included), so
/// an early hit embedded in a longer word does not hide a later standalone
/// one. Both arguments are case-folded first, so unnormalized input is fine.
pub fn is_exact_match(text: &str, pattern: &str) -> bool {
    find_exact_match(text, pattern).is_some()
}

/// Locate the first whole-word occurrence of `pattern` in `text`
///
/// Returns the byte range within the case-folded `text`. For text whose
/// lower-case form has the same byte length (all ASCII, most scripts) the
/// range applies to the original text as well.
pub fn find_exact_match(text: &str, pattern: &str) -> Option<Range<usize>> {
    if text.is_empty() || pattern.is_empty() {
        return None;
    }
    let text = fold_case(text);
    let pattern = fold_case(pattern);
    exact_occurrence(&text, &pattern)
}

/// Whole-word check for inputs that are already normalized
///
/// Matchers call this with a normalized line and a phrase from a
/// [`PhraseSet`], where folding again would only cost an allocation.
#[inline]
pub(crate) fn is_exact_normalized(text: &str, pattern: &str) -> bool {
    !pattern.is_empty() && exact_occurrence(text, pattern).is_some()
}

fn exact_occurrence(text: &str, pattern: &str) -> Option<Range<usize>> {
    let haystack = text.as_bytes();
    let finder = memmem::Finder::new(pattern.as_bytes());

    let mut from = 0;
    while let Some(offset) = finder.find(&haystack[from..]) {
        let start = from + offset;
        let end = start + pattern.len();
        if has_word_boundaries(text, start, end) {
            return Some(start..end);
        }
        // A UTF-8 needle can only match at a char boundary, so stepping one
        // byte is enough to find the next (possibly overlapping) occurrence.
        from = start + 1;
    }
    None
}

#[inline]
fn has_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let left = text[..start]
        .chars()
        .next_back()
        .map_or(true, is_boundary_char);
    let right = text[end..].chars().next().map_or(true, is_boundary_char);
    left && right
}

/// Normalized, deduplicated denylist
///
/// Phrases keep their first-seen order and are addressed by a stable `u32`
/// id, which is what the matchers store in their trie outputs and index
/// postings. Blank entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    /// Normalize and deduplicate raw denylist entries
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = FxHashSet::default();
        let mut phrases = Vec::new();
        for entry in raw {
            let phrase = normalize(entry.as_ref());
            if phrase.is_empty() {
                continue;
            }
            if seen.insert(phrase.clone()) {
                phrases.push(phrase);
            }
        }
        Self { phrases }
    }

    /// Number of distinct phrases
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// True when no usable phrase survived normalization
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Phrase by id
    pub fn get(&self, id: u32) -> Option<&str> {
        self.phrases.get(id as usize).map(String::as_str)
    }

    /// Iterate `(id, phrase)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.phrases
            .iter()
            .enumerate()
            .map(|(id, p)| (id as u32, p.as_str()))
    }

    /// All phrases in first-seen order
    pub fn as_slice(&self) -> &[String] {
        &self.phrases
    }

    /// First phrase that is a whole-word match in `text`
    ///
    /// Used to attribute a flagged line to the phrase that caused it.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let line = normalize(text);
        if line.is_empty() {
            return None;
        }
        self.phrases
            .iter()
            .find(|phrase| is_exact_normalized(&line, phrase))
            .map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for PhraseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PhraseSet::new(iter)
    }
}
