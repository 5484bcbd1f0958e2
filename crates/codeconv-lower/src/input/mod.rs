//! Input readers - turn parser output into the typed tree.

#[cfg(feature = "read-parse-tree")]
pub mod parse_tree;

#[cfg(feature = "read-parse-tree")]
pub use parse_tree::{PARSE_TREE_READER, ParseTree, ParseTreeReader, build_program, read_parse_tree};
