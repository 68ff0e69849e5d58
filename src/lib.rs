//! cspect - structural analyzer for C# source trees.
//!
//! cspect extracts a structural model of a solution (declarations,
//! namespaces, membership, categorisation) without compiling it, and
//! answers structural queries against that model. Extraction is
//! regex-based and best-effort by design: malformed or partial source
//! yields partial results, never a hard failure.
//!
//! # Architecture
//!
//! - `analysis`: per-file declaration scanner and its fact types
//! - `index`: file walking, categorisation, project assignment, and the
//!   merged solution index
//! - `query`: class lookup and element search over a tree
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line surface
//!
//! Data flows one way: walker -> scanner (per file, in parallel) ->
//! indexer (sequential merge) -> queries (read-only).

pub mod analysis;
pub mod cli;
pub mod index;
pub mod query;
pub mod report;

pub use analysis::{analyze, Complexity, Element, ElementKind, FileAnalysis, Modifier};
pub use index::{index, summarize, Bucket, IndexError, SolutionIndex, SolutionSummary};
pub use query::{
    find_class, find_elements, ClassMatch, ElementFilter, ElementMatch, QueryError, SearchMode,
};
