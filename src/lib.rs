//! Blockscan - Whole-Word Denylist Detection for Text Blocks
//!
//! Blockscan checks blocks of free text for phrases from a denylist. A phrase
//! counts only as a whole-word, case-insensitive match on whitespace-normalized
//! text: `"corp"` matches `"Microsoft Corp."` but not `"corporate"`.
//!
//! Three interchangeable matchers implement the same contract with different
//! algorithms, so their speed can be compared on real data and their answers
//! cross-checked against each other.
//!
//! # Quick Start
//!
//! ```rust
//! use blockscan::{Matcher, MatcherKind, PhraseSet};
//!
//! let phrases = PhraseSet::new(["Acme Corp", "Globex"]);
//! let matcher = MatcherKind::Automaton.build(phrases);
//!
//! let block = vec!["Acme Corp is listed".to_string(), "unrelated text".to_string()];
//! assert!(matcher.check_block(&block));
//! assert!(!matcher.check_line("Acme Corporation"));
//! ```
//!
//! # Matchers
//!
//! - **Automaton**: character trie with Aho-Corasick failure links; one pass
//!   per line regardless of denylist size
//! - **Index**: token to phrase inverted index; prunes the phrases worth
//!   verifying against a line
//! - **Vector**: per-phrase byte scan with 16/32-byte lane comparison for
//!   long phrases and a byte loop for short ones
//!
//! ```text
//! raw phrases ──► normalize ──► PhraseSet ──► trie / index / byte buffers
//!                                                (built once, lazily)
//! raw line ─────► normalize ──► raw hits ──► whole-word check ──► verdict
//! ```
//!
//! Every matcher's last step before reporting a hit is the whole-word check
//! in [`normalize::is_exact_match`], so the matchers cannot disagree on what
//! a boundary is.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod analysis;
pub mod automaton;
pub mod block;
pub mod engine;
pub mod error;
pub mod index;
pub mod lanes;
pub mod normalize;
pub mod vector;

// Re-exports for Rust consumers

pub use crate::analysis::{Report, RunOptions};
pub use crate::automaton::AutomatonMatcher;
pub use crate::block::TextBlock;
pub use crate::engine::{Matcher, MatcherKind};
pub use crate::error::BlockscanError;
pub use crate::index::IndexMatcher;
pub use crate::normalize::{is_exact_match, normalize, PhraseSet};
pub use crate::vector::VectorMatcher;

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
