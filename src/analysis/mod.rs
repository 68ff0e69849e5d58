//! Per-file structural analysis: the declaration scanner, its fact
//! types, and encoding-tolerant source reading.

mod facts;
mod scanner;
mod source;

pub use facts::{
    Complexity, Element, ElementKind, Field, FileAnalysis, FileSummary, Method, Modifier,
    Parameter, Property,
};
pub use scanner::analyze;
pub use source::{decode_source, read_source};

use std::path::Path;

/// Read and analyze a single source file.
///
/// The analysis is labelled with `label` (usually the path relative to
/// the tree root) rather than the on-disk path.
pub fn analyze_path(path: &Path, label: &str) -> anyhow::Result<FileAnalysis> {
    let text = read_source(path)?;
    Ok(analyze(label, &text))
}
