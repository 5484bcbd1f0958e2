//! Command-line driver for `codeconv-lower`.
//!
//! Resolves configuration, reads a parser's JSON tree from disk and writes
//! the lowered Python next to it (or wherever `--output` points).

pub mod config;
pub mod convert;
