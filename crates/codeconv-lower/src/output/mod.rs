//! Output writers - lower the typed tree to target source.

#[cfg(feature = "write-python")]
pub mod python;

#[cfg(feature = "write-python")]
pub use python::{CallArgs, LineEnding, PYTHON_WRITER, PythonOptions, PythonWriter};
