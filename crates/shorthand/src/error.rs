//! Error types for shorthand parsing, building, and file loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing or building a shorthand document.
///
/// A failed build never hands back a partial result: the first error aborts
/// the whole call.
#[derive(Error, Debug)]
pub enum ShorthandError {
    /// The input does not conform to the shorthand grammar.
    /// `line` and `column` are 1-based and count characters, not bytes.
    #[error("{source_name}:{line}:{column}: syntax error: {message}")]
    Syntax {
        source_name: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// An `@file` value names a file that could not be read.
    #[error("failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A loaded file could not be decoded (malformed JSON/YAML or invalid UTF-8).
    #[error("failed to decode file {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// A key path tried to descend through a value of the wrong kind, or a
    /// `[` back-reference had no list to continue.
    #[error("cannot build `{path}`: {message}")]
    Structure { path: String, message: String },

    /// JSON conversion failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShorthandError>;
