//! Traits for tree readers and target-language writers.

use crate::tree::Program;

/// Error that can occur when reading a parser's output into the typed tree.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported syntax: {0}")]
    Unsupported(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },

    #[error("{node} is missing required child {child}")]
    MissingChild { node: String, child: String },
}

/// A reader turns an external parser's output into a typed [`Program`].
pub trait Reader: Send + Sync {
    /// Format identifier (e.g., "parse-tree").
    fn format(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["json"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Read serialized parser output into the typed tree.
    fn read(&self, source: &str) -> Result<Program, ReadError>;
}

/// A writer lowers a typed [`Program`] into target-language source text.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "python").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "py").
    fn extension(&self) -> &'static str;

    /// Lower the program to source text. Total over well-formed trees.
    fn write(&self, program: &Program) -> String;
}
