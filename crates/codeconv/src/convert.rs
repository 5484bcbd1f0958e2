//! File-level conversion: read parser output, lower it, write the result.

use anyhow::{Context, bail};
use codeconv_lower::input::PARSE_TREE_READER;
use codeconv_lower::{Program, PythonOptions, PythonWriter, Reader, Writer};
use std::path::{Path, PathBuf};

/// Readers available to the CLI.
static READERS: &[&dyn Reader] = &[&PARSE_TREE_READER];

/// Where converted text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `-` means stdout; no explicit output means `input` with the writer's extension.
    pub fn resolve(input: &Path, output: Option<&Path>, writer: &dyn Writer) -> Self {
        match output {
            Some(path) if path == Path::new("-") => Destination::Stdout,
            Some(path) => Destination::File(path.to_path_buf()),
            None => Destination::File(input.with_extension(writer.extension())),
        }
    }
}

/// Pick a reader by the input's file extension.
pub fn reader_for_path(path: &Path) -> anyhow::Result<&'static dyn Reader> {
    let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    match READERS.iter().find(|r| r.extensions().contains(&ext)) {
        Some(reader) => Ok(*reader),
        None => bail!(
            "no reader for {} (expected a .json parse tree)",
            path.display()
        ),
    }
}

/// Read and build the typed program for `input`.
pub fn read_program(input: &Path) -> anyhow::Result<Program> {
    let reader = reader_for_path(input)?;
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let program = reader
        .read(&source)
        .with_context(|| format!("failed to read {} tree from {}", reader.format(), input.display()))?;
    tracing::debug!(
        input = %input.display(),
        statements = program.body.len(),
        "read program"
    );
    Ok(program)
}

/// Convert `input` and deliver the text. Returns the text that was written.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: PythonOptions,
) -> anyhow::Result<(Destination, String)> {
    let program = read_program(input)?;
    let writer = PythonWriter::new(options);
    let text = writer.write(&program);

    let destination = Destination::resolve(input, output, &writer);
    match &destination {
        Destination::Stdout => println!("{}", text),
        Destination::File(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), language = writer.language(), "wrote");
        }
    }
    Ok((destination, text))
}

/// Pretty JSON of the typed tree for `input`.
pub fn dump_tree(input: &Path) -> anyhow::Result<String> {
    let program = read_program(input)?;
    serde_json::to_string_pretty(&program).context("failed to serialize tree")
}
