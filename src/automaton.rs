//! Aho-Corasick automaton matcher
//!
//! This module implements phrase matching with a character trie augmented
//! with failure links. The whole denylist is searched in a single left to
//! right pass over each line, so query cost does not grow with the number
//! of phrases.
//!
//! # Design
//!
//! The trie is an arena of [`TrieNode`]s addressed by `u32` index:
//! - each node maps a character to the index of its child
//! - the failure link is the index of the node for the longest proper
//!   suffix of the current path that is also a prefix of some phrase
//! - the output list holds every phrase id ending at this node, including
//!   those reachable through the failure chain (merged once at build time)
//!
//! The scan reports raw substring hits. Each one is then re-checked with the
//! whole-word predicate before a line is flagged.

use crate::engine::{Matcher, MatcherKind};
use crate::normalize::{is_exact_normalized, normalize, PhraseSet};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::OnceLock;

const ROOT: u32 = 0;

/// Trie node stored in the automaton arena
#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: FxHashMap<char, u32>,
    failure: u32,
    outputs: Vec<u32>, // Phrase IDs
}

/// Trie with failure links over the normalized phrases
#[derive(Debug, Clone)]
pub struct Automaton {
    nodes: Vec<TrieNode>,
}

impl Automaton {
    /// Build the automaton for a phrase set
    pub fn build(phrases: &PhraseSet) -> Self {
        let mut automaton = Self {
            nodes: vec![TrieNode::default()], // Root
        };

        // Longest first. Only affects the order nodes are created in.
        let mut order: Vec<(u32, &str)> = phrases.iter().collect();
        order.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()));

        for (id, phrase) in order {
            automaton.insert(id, phrase);
        }
        automaton.build_failure_links();

        tracing::debug!(
            phrases = phrases.len(),
            states = automaton.nodes.len(),
            "built aho-corasick automaton"
        );
        automaton
    }

    fn insert(&mut self, id: u32, phrase: &str) {
        let mut current = ROOT;
        for ch in phrase.chars() {
            current = match self.nodes[current as usize].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let new_id = self.nodes.len() as u32;
                    self.nodes.push(TrieNode::default());
                    self.nodes[current as usize].children.insert(ch, new_id);
                    new_id
                }
            };
        }
        self.nodes[current as usize].outputs.push(id);
    }

    fn build_failure_links(&mut self) {
        let mut queue = VecDeque::new();

        // Depth-1 states fail to root
        let root_children: Vec<u32> = self.nodes[ROOT as usize]
            .children
            .values()
            .copied()
            .collect();
        for child in root_children {
            self.nodes[child as usize].failure = ROOT;
            queue.push_back(child);
        }

        // BFS guarantees a node's failure target is finished before the node
        while let Some(state) = queue.pop_front() {
            let transitions: Vec<(char, u32)> = self.nodes[state as usize]
                .children
                .iter()
                .map(|(&ch, &next)| (ch, next))
                .collect();

            for (ch, next) in transitions {
                queue.push_back(next);

                let mut fail = self.nodes[state as usize].failure;
                let target = loop {
                    if let Some(&target) = self.nodes[fail as usize].children.get(&ch) {
                        break target;
                    }
                    if fail == ROOT {
                        break ROOT;
                    }
                    fail = self.nodes[fail as usize].failure;
                };
                self.nodes[next as usize].failure = target;

                // The target's outputs already include its own failure chain
                if !self.nodes[target as usize].outputs.is_empty() {
                    let inherited = self.nodes[target as usize].outputs.clone();
                    self.nodes[next as usize].outputs.extend(inherited);
                }
            }
        }
    }

    /// Phrase ids whose text occurs anywhere in `text`
    ///
    /// Raw substring hits only; no word-boundary awareness. Sorted, deduplicated.
    pub fn find_phrase_ids(&self, text: &str) -> Vec<u32> {
        let mut ids = Vec::new();
        let mut current = ROOT;

        for ch in text.chars() {
            // Follow failure links until we find a transition or reach root
            loop {
                if let Some(&next) = self.nodes[current as usize].children.get(&ch) {
                    current = next;
                    break;
                }
                if current == ROOT {
                    break;
                }
                current = self.nodes[current as usize].failure;
            }

            let outputs = &self.nodes[current as usize].outputs;
            if !outputs.is_empty() {
                ids.extend_from_slice(outputs);
            }
        }

        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Number of trie states, root included
    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Matcher backed by an [`Automaton`]
pub struct AutomatonMatcher {
    phrases: PhraseSet,
    automaton: OnceLock<Automaton>,
}

impl AutomatonMatcher {
    /// Create a matcher; the automaton is built on first use
    pub fn new(phrases: PhraseSet) -> Self {
        Self {
            phrases,
            automaton: OnceLock::new(),
        }
    }

    fn automaton(&self) -> &Automaton {
        self.automaton.get_or_init(|| Automaton::build(&self.phrases))
    }

    /// Number of trie states (builds the automaton if needed)
    pub fn state_count(&self) -> usize {
        self.automaton().state_count()
    }
}

impl Matcher for AutomatonMatcher {
    fn name(&self) -> &'static str {
        "Aho-Corasick"
    }

    fn kind(&self) -> MatcherKind {
        MatcherKind::Automaton
    }

    fn phrases(&self) -> &PhraseSet {
        &self.phrases
    }

    fn warm(&self) {
        self.automaton();
    }

    fn check_line(&self, line: &str) -> bool {
        let line = normalize(line);
        if line.is_empty() {
            return false;
        }

        self.automaton()
            .find_phrase_ids(&line)
            .into_iter()
            .filter_map(|id| self.phrases.get(id))
            .any(|phrase| is_exact_normalized(&line, phrase))
    }
}
