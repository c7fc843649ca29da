//! Loading denylists and text blocks from disk
//!
//! A block is a maximal run of non-blank lines. Blank (or whitespace-only)
//! lines separate blocks and never belong to one. Lines are trimmed on the
//! way in.

use crate::error::{BlockscanError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const BUFFER_SIZE: usize = 128 * 1024; // 128KB buffer
const BOM: char = '\u{feff}';

/// One block of lines from a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    /// File the block came from, as given on the command line
    pub source: String,
    /// 1-based position of the block within its file
    pub number: usize,
    /// Trimmed, non-blank lines
    pub lines: Vec<String>,
}

/// Split input into blocks on blank lines
pub fn parse_blocks<R: BufRead>(reader: R) -> io::Result<Vec<Vec<String>>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if i == 0 {
            line.trim_start_matches(BOM)
        } else {
            line.as_str()
        };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed.to_string());
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    Ok(blocks)
}

/// Load the blocks of every file, in argument order
pub fn load_blocks<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<TextBlock>> {
    let mut all = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BlockscanError::io_at(path, e))?;
        let blocks = parse_blocks(BufReader::with_capacity(BUFFER_SIZE, file))
            .map_err(|e| BlockscanError::io_at(path, e))?;

        tracing::debug!(file = %path.display(), blocks = blocks.len(), "loaded blocks");

        let source = path.display().to_string();
        all.extend(blocks.into_iter().enumerate().map(|(i, lines)| TextBlock {
            source: source.clone(),
            number: i + 1,
            lines,
        }));
    }
    Ok(all)
}

/// Read the raw, non-blank entries of a denylist file
pub fn load_denylist<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BlockscanError::io_at(path, e))?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| BlockscanError::io_at(path, e))?;
        let line = if i == 0 {
            line.trim_start_matches(BOM).to_string()
        } else {
            line
        };
        if !line.trim().is_empty() {
            entries.push(line);
        }
    }

    tracing::debug!(file = %path.display(), entries = entries.len(), "loaded denylist");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_parse_blocks_on_blank_lines() {
        let input = "Acme Corp\n  Globex  \n\n   \nInitech\n";
        let blocks = parse_blocks(Cursor::new(input)).unwrap();
        assert_eq!(
            blocks,
            vec![
                vec!["Acme Corp".to_string(), "Globex".to_string()],
                vec!["Initech".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_blocks_no_trailing_newline() {
        let blocks = parse_blocks(Cursor::new("a\nb\n\nc")).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], vec!["c".to_string()]);
    }

    #[test]
    fn test_parse_blocks_empty_input() {
        assert!(parse_blocks(Cursor::new("")).unwrap().is_empty());
        assert!(parse_blocks(Cursor::new("\n \n\t\n")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_blocks_crlf_and_bom() {
        let blocks = parse_blocks(Cursor::new("\u{feff}Acme\r\nCorp\r\n\r\nNext\r\n")).unwrap();
        assert_eq!(blocks[0], vec!["Acme".to_string(), "Corp".to_string()]);
        assert_eq!(blocks[1], vec!["Next".to_string()]);
    }

    #[test]
    fn test_load_blocks_numbers_per_file() {
        let mut a = tempfile::NamedTempFile::new().unwrap();
        write!(a, "one\n\ntwo\n").unwrap();
        let mut b = tempfile::NamedTempFile::new().unwrap();
        write!(b, "three\n").unwrap();

        let blocks = load_blocks(&[a.path(), b.path()]).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].number, 1);
        assert_eq!(blocks[1].number, 2);
        assert_eq!(blocks[2].number, 1);
        assert_eq!(blocks[2].source, b.path().display().to_string());
    }

    #[test]
    fn test_load_blocks_missing_file() {
        let err = load_blocks(&["/nonexistent/blockscan/input.txt"]).unwrap_err();
        assert!(matches!(err, BlockscanError::Io(_)));
    }

    #[test]
    fn test_load_denylist_skips_blanks() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "Acme Corp\n\n   \nGlobex\n").unwrap();
        let entries = load_denylist(f.path()).unwrap();
        assert_eq!(entries, vec!["Acme Corp".to_string(), "Globex".to_string()]);
    }
}
