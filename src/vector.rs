//! Vectorized byte-scan matcher
//!
//! Each phrase is searched for independently over the UTF-8 bytes of the
//! normalized line, using the lane width its byte length allows (see
//! [`crate::lanes`]). A byte hit knows nothing about characters or words,
//! so it is only a pre-filter: the line is flagged once the phrase also
//! passes the whole-word check on the normalized text.

use crate::engine::{Matcher, MatcherKind};
use crate::lanes::{self, LaneWidth};
use crate::normalize::{is_exact_normalized, normalize, PhraseSet};
use std::sync::OnceLock;

/// A phrase paired with its byte encoding and search strategy
#[derive(Debug, Clone)]
struct EncodedPhrase {
    id: u32,
    bytes: Box<[u8]>,
    width: LaneWidth,
}

/// Matcher that scans bytes lane by lane
pub struct VectorMatcher {
    phrases: PhraseSet,
    encoded: OnceLock<Vec<EncodedPhrase>>,
}

impl VectorMatcher {
    /// Create a matcher; byte buffers are prepared on first use
    pub fn new(phrases: PhraseSet) -> Self {
        Self {
            phrases,
            encoded: OnceLock::new(),
        }
    }

    fn encoded(&self) -> &[EncodedPhrase] {
        self.encoded.get_or_init(|| {
            let encoded: Vec<EncodedPhrase> = self
                .phrases
                .iter()
                .map(|(id, phrase)| EncodedPhrase {
                    id,
                    bytes: phrase.as_bytes().into(),
                    width: LaneWidth::for_len(phrase.len()),
                })
                .collect();
            tracing::debug!(
                phrases = encoded.len(),
                lane32 = encoded.iter().filter(|p| p.width == LaneWidth::W32).count(),
                lane16 = encoded.iter().filter(|p| p.width == LaneWidth::W16).count(),
                "prepared byte buffers"
            );
            encoded
        })
    }

    /// Number of phrases searched with each strategy: (scalar, 16-byte, 32-byte)
    pub fn lane_histogram(&self) -> (usize, usize, usize) {
        self.encoded()
            .iter()
            .fold((0, 0, 0), |(s, w16, w32), p| match p.width {
                LaneWidth::Scalar => (s + 1, w16, w32),
                LaneWidth::W16 => (s, w16 + 1, w32),
                LaneWidth::W32 => (s, w16, w32 + 1),
            })
    }
}

impl Matcher for VectorMatcher {
    fn name(&self) -> &'static str {
        "SIMD byte scan"
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Vector
    }

    fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    fn warm(&self) {
        self.encoded();
    }

    fn check_line(&self, line: &str) -> bool {
        let line = normalize(line);
        if line.is_empty() {
            return false;
        }
        let line_bytes = line.as_bytes();

        self.encoded().iter().any(|phrase| {
            lanes::contains(line_bytes, &phrase.bytes, phrase.width)
                && self
                    .phrases
                    .get(phrase.id)
                    .is_some_and(|text| is_exact_normalized(&line, text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_phrase_scalar_path() {
        let matcher = VectorMatcher::new(PhraseSet::new(["corp"]));
        assert!(matcher.check_line("Microsoft Corp"));
        assert!(!matcher.check_line("corporate"));
        assert!(matcher.check_line("microcorp corp"));
        assert_eq!(matcher.lane_histogram(), (1, 0, 0));
    }

    #[test]
    fn test_long_phrase_lane_path() {
        let phrase = "northern consolidated mining holdings"; // 37 bytes
        let matcher = VectorMatcher::new(PhraseSet::new([phrase]));
        assert_eq!(matcher.lane_histogram(), (0, 0, 1));

        let mut line = "x".repeat(80);
        line.push(' ');
        line.push_str(phrase);
        line.push(' ');
        line.push_str(&"y".repeat(80));
        assert_eq!(line.len(), 199);
        assert!(matcher.check_line(&line));
        assert!(lanes::contains_naive(line.as_bytes(), phrase.as_bytes()));
    }

    #[test]
    fn test_byte_hit_without_boundary_is_rejected() {
        let phrase = "consolidated mining"; // 19 bytes, 16-byte lanes
        let matcher = VectorMatcher::new(PhraseSet::new([phrase]));
        assert_eq!(matcher.lane_histogram(), (0, 1, 0));
        assert!(!matcher.check_line("unconsolidated miningco"));
        assert!(matcher.check_line("Consolidated   Mining, Inc."));
    }

    #[test]
    fn test_multibyte_phrase() {
        let matcher = VectorMatcher::new(PhraseSet::new(["ООО «Ромашка»"]));
        assert!(matcher.check_line("поставщик ООО «Ромашка»"));
        assert!(!matcher.check_line("ооо «ромашкинъ»"));
    }

    #[test]
    fn test_empty_set() {
        let matcher = VectorMatcher::new(PhraseSet::new(["  "]));
        assert!(!matcher.check_line("anything"));
        assert_eq!(matcher.lane_histogram(), (0, 0, 0));
    }
}
