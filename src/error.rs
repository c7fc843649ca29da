//! Error types for the blockscan library

use std::fmt;
use std::path::Path;

/// Result type alias for blockscan operations
pub type Result<T> = std::result::Result<T, BlockscanError>;

/// Main error type for blockscan operations
///
/// Matching itself never fails; these errors come from loading
/// denylists and text blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockscanError {
    /// I/O errors
    Io(String),

    /// Input file could not be read as UTF-8 text
    Encoding(String),

    /// Unknown matcher name or other invalid input
    InvalidInput(String),

    /// General errors
    Other(String),
}

impl BlockscanError {
    /// Wrap an I/O error with the path that caused it
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData => {
                BlockscanError::Encoding(format!("{}: {}", path.display(), err))
            }
            _ => BlockscanError::Io(format!("{}: {}", path.display(), err)),
        }
    }
}

impl fmt::Display for BlockscanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockscanError::Io(msg) => write!(f, "I/O error: {}", msg),
            BlockscanError::Encoding(msg) => write!(f, "Encoding error: {}", msg),
            BlockscanError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            BlockscanError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BlockscanError {}

impl From<std::io::Error> for BlockscanError {
    fn from(err: std::io::Error) -> Self {
        BlockscanError::Io(err.to_string())
    }
}

impl From<String> for BlockscanError {
    fn from(msg: String) -> Self {
        BlockscanError::Other(msg)
    }
}

impl From<&str> for BlockscanError {
    fn from(msg: &str) -> Self {
        BlockscanError::Other(msg.to_string())
    }
}
