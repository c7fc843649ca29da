use anyhow::{Context, Result};
use blockscan::block::load_denylist;
use blockscan::{MatcherKind, PhraseSet};
use serde_json::json;
use std::path::PathBuf;

pub fn cmd_query(denylist: PathBuf, text: String, matcher: String, quiet: bool) -> Result<()> {
    let kind: MatcherKind = matcher.parse()?;

    let raw = load_denylist(&denylist)
        .with_context(|| format!("Failed to load denylist: {}", denylist.display()))?;
    let matcher = kind.build(PhraseSet::new(&raw));

    let found = matcher.check_line(&text);

    if quiet {
        // Quiet mode: no output, just exit code
        std::process::exit(if found { 0 } else { 1 });
    }

    let phrase = if found {
        matcher.phrases().find_in(&text)
    } else {
        None
    };
    let result = json!({
        "matched": found,
        "phrase": phrase,
        "matcher": matcher.name(),
    });
    println!("{}", serde_json::to_string_pretty(&result)?);

    // Exit with appropriate code
    std::process::exit(if found { 0 } else { 1 });
}
