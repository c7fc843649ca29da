//! Running matchers over blocks and comparing their verdicts
//!
//! The matchers are supposed to agree on every block. A comparison run
//! times each matcher over the same blocks, merges the flagged blocks into
//! one detection table and counts the blocks where they disagree.

use crate::block::TextBlock;
use crate::engine::{Matcher, MatcherKind};
use crate::normalize::PhraseSet;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Matchers to run, in report order
    pub kinds: Vec<MatcherKind>,
    /// Run the matchers concurrently instead of one after another
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            kinds: MatcherKind::ALL.to_vec(),
            parallel: false,
        }
    }
}

/// Identifies a block across matcher runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockKey {
    /// Source file
    pub source: String,
    /// 1-based block number within the file
    pub number: usize,
}

impl BlockKey {
    /// Key of a loaded block
    pub fn of(block: &TextBlock) -> Self {
        Self {
            source: block.source.clone(),
            number: block.number,
        }
    }
}

/// Outcome of one matcher over all blocks
#[derive(Debug, Clone, Serialize)]
pub struct MatcherRun {
    /// Strategy that produced this run
    pub kind: MatcherKind,
    /// Display name of the matcher
    pub name: &'static str,
    /// Time spent building the search structure
    #[serde(rename = "build_ms", serialize_with = "serialize_millis")]
    pub build_time: Duration,
    /// Time spent checking blocks
    #[serde(rename = "scan_ms", serialize_with = "serialize_millis")]
    pub scan_time: Duration,
    /// Number of blocks checked
    pub total_blocks: usize,
    /// Blocks this matcher flagged, in input order
    pub found: Vec<BlockKey>,
}

impl MatcherRun {
    /// Build plus scan time
    pub fn elapsed(&self) -> Duration {
        self.build_time + self.scan_time
    }
}

/// Check every block with one matcher
pub fn run_matcher(matcher: &dyn Matcher, blocks: &[TextBlock]) -> MatcherRun {
    let start = Instant::now();
    matcher.warm();
    let build_time = start.elapsed();

    let start = Instant::now();
    let found: Vec<BlockKey> = blocks
        .iter()
        .filter(|block| matcher.check_block(&block.lines))
        .map(BlockKey::of)
        .collect();
    let scan_time = start.elapsed();

    tracing::info!(
        matcher = matcher.name(),
        blocks = blocks.len(),
        found = found.len(),
        build_ms = build_time.as_secs_f64() * 1000.0,
        scan_ms = scan_time.as_secs_f64() * 1000.0,
        "matcher run finished"
    );

    MatcherRun {
        kind: matcher.kind(),
        name: matcher.name(),
        build_time,
        scan_time,
        total_blocks: blocks.len(),
        found,
    }
}

/// Run every selected matcher over the same blocks
///
/// Each matcher gets its own copy of the phrase set. Results come back in
/// the order of `options.kinds` whether or not they ran in parallel.
pub fn run_comparison(
    phrases: &PhraseSet,
    blocks: &[TextBlock],
    options: &RunOptions,
) -> Vec<MatcherRun> {
    let run = |kind: &MatcherKind| {
        let matcher = kind.build(phrases.clone());
        run_matcher(matcher.as_ref(), blocks)
    };

    if options.parallel {
        options.kinds.par_iter().map(run).collect()
    } else {
        options.kinds.iter().map(run).collect()
    }
}

/// A block flagged by at least one matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Source file
    pub source: String,
    /// 1-based block number within the file
    pub number: usize,
    /// Distinct lines of the block, in order
    pub lines: Vec<String>,
    /// Matchers that flagged the block, each listed once
    pub detected_by: Vec<MatcherKind>,
}

impl Detection {
    /// How many matchers flagged the block
    pub fn detection_count(&self) -> usize {
        self.detected_by.len()
    }
}

/// Merge the flagged blocks of every run, keyed by file and block number
pub fn collect_detections(
    runs: &[MatcherRun],
    blocks: &[TextBlock],
) -> BTreeMap<BlockKey, Detection> {
    let by_key: FxHashMap<BlockKey, &TextBlock> =
        blocks.iter().map(|b| (BlockKey::of(b), b)).collect();

    let mut detections: BTreeMap<BlockKey, Detection> = BTreeMap::new();
    for run in runs {
        for key in &run.found {
            let detection = detections.entry(key.clone()).or_insert_with(|| {
                let mut lines: Vec<String> = Vec::new();
                if let Some(block) = by_key.get(key) {
                    for line in &block.lines {
                        if !lines.contains(line) {
                            lines.push(line.clone());
                        }
                    }
                }
                Detection {
                    source: key.source.clone(),
                    number: key.number,
                    lines,
                    detected_by: Vec::new(),
                }
            });
            if !detection.detected_by.contains(&run.kind) {
                detection.detected_by.push(run.kind);
            }
        }
    }
    detections
}

/// Agreement between matchers over one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Number of matchers compared
    pub matcher_count: usize,
    /// Blocks flagged by at least one matcher
    pub flagged_blocks: usize,
    /// Blocks flagged by some but not all matchers
    pub disagreeing_blocks: usize,
    /// Disagreeing blocks grouped by how many matchers flagged them
    pub disagreements_by_count: BTreeMap<usize, usize>,
}

impl Comparison {
    /// Summarize detections against the number of runs
    pub fn summarize(runs: &[MatcherRun], detections: &BTreeMap<BlockKey, Detection>) -> Self {
        let matcher_count = runs.len();
        let mut disagreements_by_count = BTreeMap::new();
        for detection in detections.values() {
            let count = detection.detection_count();
            if count > 0 && count < matcher_count {
                *disagreements_by_count.entry(count).or_insert(0) += 1;
            }
        }

        Self {
            matcher_count,
            flagged_blocks: detections.len(),
            disagreeing_blocks: disagreements_by_count.values().sum(),
            disagreements_by_count,
        }
    }

    /// True when every matcher flagged exactly the same blocks
    pub fn all_agree(&self) -> bool {
        self.disagreeing_blocks == 0
    }
}

/// A line of a flagged block and the phrase it matched, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineAttribution {
    /// The line as it appears in the block
    pub line: String,
    /// Normalized phrase found in the line
    pub phrase: Option<String>,
}

/// Attribute each distinct line of a detection to the phrase it contains
pub fn attribute_lines(detection: &Detection, phrases: &PhraseSet) -> Vec<LineAttribution> {
    detection
        .lines
        .iter()
        .map(|line| LineAttribution {
            line: line.clone(),
            phrase: phrases.find_in(line).map(str::to_string),
        })
        .collect()
}

/// Everything a comparison run produced, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Distinct phrases searched for
    pub phrase_count: usize,
    /// Blocks checked by each matcher
    pub block_count: usize,
    /// Per-matcher results in run order
    pub runs: Vec<MatcherRun>,
    /// Agreement summary
    pub comparison: Comparison,
    /// Flagged blocks ordered by file and block number
    pub detections: Vec<Detection>,
}

impl Report {
    /// Run the comparison and assemble the report
    pub fn generate(phrases: &PhraseSet, blocks: &[TextBlock], options: &RunOptions) -> Self {
        let runs = run_comparison(phrases, blocks, options);
        let detections = collect_detections(&runs, blocks);
        let comparison = Comparison::summarize(&runs, &detections);

        if !comparison.all_agree() {
            tracing::warn!(
                blocks = comparison.disagreeing_blocks,
                "matchers disagree on some blocks"
            );
        }

        Self {
            phrase_count: phrases.len(),
            block_count: blocks.len(),
            runs,
            comparison,
            detections: detections.into_values().collect(),
        }
    }
}
