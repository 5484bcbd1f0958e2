//! Tree-to-text lowering from a small C-like language to Python.
//!
//! `codeconv-lower` takes the syntax tree an external grammar-driven parser
//! produced and emits equivalent Python source by walking it. Block
//! structure is rebuilt from nesting depth; `if`/`elif`/`else` chains, while
//! loops and function definitions become colon-headed indented suites.
//!
//! # Architecture
//!
//! ```text
//! Parser output            Typed tree          Target
//! ──────────────────    ───────────────    ──────────────
//! JSON parse tree  ─────> Program ─────────> Python source
//! (input/parse_tree)      (tree.rs)          (output/python)
//! ```
//!
//! # Example
//!
//! ```
//! use codeconv_lower::{Expression, Node, Program, PythonWriter};
//!
//! let program = Program::new(vec![Node::statement(Node::declare_assign(
//!     "int",
//!     "x",
//!     "=",
//!     Expression::literal("1"),
//! ))]);
//!
//! assert_eq!(PythonWriter::emit(&program), "x = 1");
//! ```
//!
//! # What gets lost
//!
//! Lowering is a surface-level rewrite. Type annotations never reach the
//! output, and by default call arguments other than primary literals are
//! dropped (see [`output::CallArgs`]). Operators and literals are copied
//! token for token.

pub mod input;
pub mod output;
pub mod traits;
pub mod tree;

// Re-exports: tree types
pub use tree::{
    AssignTarget, Assignment, Body, Conditional, Continuation, Declaration, Expression, FuncCall,
    Method, Node, Program, WhileCycle,
};

// Re-exports: Traits
pub use traits::{ReadError, Reader, Writer};

// Re-exports: Built-in readers
#[cfg(feature = "read-parse-tree")]
pub use input::{ParseTree, ParseTreeReader, build_program, read_parse_tree};

// Re-exports: Built-in writers
#[cfg(feature = "write-python")]
pub use output::{CallArgs, LineEnding, PythonOptions, PythonWriter};
