//! Solution indexing: walks a source tree, analyzes every file, and
//! merges the results into one read-only `SolutionIndex`.
//!
//! Analysis is embarrassingly parallel at file granularity, so files are
//! scanned on a rayon worker pool; the merge into the namespace, bucket,
//! and project maps is a single sequential pass afterwards.

mod categorize;
mod projects;
mod walker;

pub use categorize::{categorize, Bucket};
pub use projects::best_project;
pub use walker::{
    collect_solution_files, collect_source_files, walk, EXCLUDED_DIRS, MANIFEST_EXT, SOURCE_EXT,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{analyze_path, Element, ElementKind, FileAnalysis};

/// Indexing failures that abort the whole call.
///
/// Per-file analysis failures are not errors; those files are skipped
/// and surface only as fewer indexed files than walked.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("root path does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),
}

/// Per-file summary stored in the index maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the root, '/' separated.
    pub path: String,
    pub name: String,
    pub namespace: String,
    pub elements: Vec<Element>,
    pub methods_count: usize,
    pub properties_count: usize,
    pub lines: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// A manifest-rooted subtree of the solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Manifest path relative to the root.
    pub path: String,
    /// Manifest's containing directory relative to the root.
    pub directory: String,
    pub files: Vec<FileRecord>,
}

/// Files grouped by semantic bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileTypeIndex {
    pub controllers: Vec<FileRecord>,
    pub services: Vec<FileRecord>,
    pub dtos: Vec<FileRecord>,
    pub models: Vec<FileRecord>,
    pub interfaces: Vec<FileRecord>,
    pub enums: Vec<FileRecord>,
    pub configurations: Vec<FileRecord>,
    pub others: Vec<FileRecord>,
}

impl FileTypeIndex {
    pub fn push(&mut self, bucket: Bucket, record: FileRecord) {
        self.bucket_mut(bucket).push(record);
    }

    pub fn bucket(&self, bucket: Bucket) -> &[FileRecord] {
        match bucket {
            Bucket::Controller => &self.controllers,
            Bucket::Service => &self.services,
            Bucket::Dto => &self.dtos,
            Bucket::Model => &self.models,
            Bucket::Interface => &self.interfaces,
            Bucket::Enum => &self.enums,
            Bucket::Configuration => &self.configurations,
            Bucket::Other => &self.others,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<FileRecord> {
        match bucket {
            Bucket::Controller => &mut self.controllers,
            Bucket::Service => &mut self.services,
            Bucket::Dto => &mut self.dtos,
            Bucket::Model => &mut self.models,
            Bucket::Interface => &mut self.interfaces,
            Bucket::Enum => &mut self.enums,
            Bucket::Configuration => &mut self.configurations,
            Bucket::Other => &mut self.others,
        }
    }
}

/// Aggregate declaration counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IndexSummary {
    pub total_classes: usize,
    pub total_interfaces: usize,
    pub total_enums: usize,
    pub total_records: usize,
}

/// The aggregate root. Built fresh per call; read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionIndex {
    pub root: String,
    pub total_files: usize,
    pub namespaces: BTreeMap<String, Vec<FileRecord>>,
    pub projects: BTreeMap<String, ProjectEntry>,
    pub file_types: FileTypeIndex,
    pub summary: IndexSummary,
}

/// Flat aggregate totals across a tree (no per-bucket structure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub root: String,
    pub total_files: usize,
    pub total_classes: usize,
    pub total_interfaces: usize,
    pub total_enums: usize,
    pub total_records: usize,
    pub total_methods: usize,
    pub total_properties: usize,
    /// Sorted, deduplicated namespaces seen across all files.
    pub namespaces: Vec<String>,
}

/// Validate the root and return it as a path.
fn check_root(root: &Path) -> Result<(), IndexError> {
    if !root.is_dir() {
        return Err(IndexError::InvalidRoot(root.to_path_buf()));
    }
    Ok(())
}

/// Root-relative path with '/' separators.
pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

/// Analyze every source file in parallel, skipping failures with a
/// warning. Results keep walk order.
fn analyze_all(root: &Path, sources: &[PathBuf]) -> Vec<FileAnalysis> {
    let results: Vec<_> = sources
        .par_iter()
        .map(|path| analyze_path(path, &relative_path(root, path)))
        .collect();

    let mut analyses = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => {
                // One malformed file never aborts the scan.
                eprintln!("Warning: failed to analyze file: {}", e);
            }
        }
    }
    analyses
}

/// Build the full structural index of the solution under `root`.
pub fn index(root: &Path) -> anyhow::Result<SolutionIndex> {
    check_root(root)?;

    let files = collect_solution_files(root);
    let (manifests, sources): (Vec<PathBuf>, Vec<PathBuf>) = files
        .into_iter()
        .partition(|p| p.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXT));

    let mut solution = SolutionIndex {
        root: root.to_string_lossy().to_string(),
        total_files: sources.len(),
        namespaces: BTreeMap::new(),
        projects: BTreeMap::new(),
        file_types: FileTypeIndex::default(),
        summary: IndexSummary::default(),
    };

    // Projects are keyed by manifest base name; all of them are known
    // before any file record is merged, so assignment below sees the
    // fully populated map.
    for manifest in &manifests {
        let name = manifest
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if name.is_empty() {
            continue;
        }
        let rel = relative_path(root, manifest);
        let directory = match rel.rfind('/') {
            Some(pos) => rel[..pos].to_string(),
            None => String::new(),
        };
        solution.projects.insert(
            name,
            ProjectEntry {
                path: rel,
                directory,
                files: Vec::new(),
            },
        );
    }

    let analyses = analyze_all(root, &sources);

    // Sequential merge: one writer, no concurrent-map hazards.
    for analysis in analyses {
        let record = merge_file(&mut solution, analysis);
        let bucket = categorize(&record.path, &record.name, &record.elements);

        if let Some(project) = record.project.clone() {
            if let Some(entry) = solution.projects.get_mut(&project) {
                entry.files.push(record.clone());
            }
        }
        solution
            .namespaces
            .entry(record.namespace.clone())
            .or_default()
            .push(record.clone());
        solution.file_types.push(bucket, record);
    }

    Ok(solution)
}

/// Turn one analysis into a file record, stamping its project and
/// updating the aggregate counters.
fn merge_file(solution: &mut SolutionIndex, analysis: FileAnalysis) -> FileRecord {
    for element in &analysis.elements {
        match element.kind {
            ElementKind::Class => solution.summary.total_classes += 1,
            ElementKind::Interface => solution.summary.total_interfaces += 1,
            ElementKind::Enum => solution.summary.total_enums += 1,
            ElementKind::Record => solution.summary.total_records += 1,
            ElementKind::Struct => {}
        }
    }

    let name = analysis
        .path
        .rsplit('/')
        .next()
        .unwrap_or(&analysis.path)
        .to_string();
    let namespace = analysis
        .namespace
        .clone()
        .unwrap_or_else(|| "Global".to_string());
    let project = best_project(&solution.projects, &analysis.path).map(str::to_string);

    FileRecord {
        path: analysis.path,
        name,
        namespace,
        elements: analysis.elements,
        methods_count: analysis.methods.len(),
        properties_count: analysis.properties.len(),
        lines: analysis.line_count,
        project,
    }
}

/// Aggregate totals across the tree without building the full index.
pub fn summarize(root: &Path) -> anyhow::Result<SolutionSummary> {
    check_root(root)?;

    let sources = collect_source_files(root);
    let total_files = sources.len();
    let analyses = analyze_all(root, &sources);

    let mut summary = SolutionSummary {
        root: root.to_string_lossy().to_string(),
        total_files,
        total_classes: 0,
        total_interfaces: 0,
        total_enums: 0,
        total_records: 0,
        total_methods: 0,
        total_properties: 0,
        namespaces: Vec::new(),
    };

    for analysis in &analyses {
        for element in &analysis.elements {
            match element.kind {
                ElementKind::Class => summary.total_classes += 1,
                ElementKind::Interface => summary.total_interfaces += 1,
                ElementKind::Enum => summary.total_enums += 1,
                ElementKind::Record => summary.total_records += 1,
                ElementKind::Struct => {}
            }
        }
        summary.total_methods += analysis.methods.len();
        summary.total_properties += analysis.properties.len();
        if let Some(ns) = &analysis.namespace {
            summary.namespaces.push(ns.clone());
        }
    }

    summary.namespaces.sort();
    summary.namespaces.dedup();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_invalid_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent");
        let err = index(&missing).unwrap_err();
        assert!(err.downcast_ref::<IndexError>().is_some());
    }

    #[test]
    fn test_index_groups_by_namespace() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "src/A.cs",
            "namespace Acme.Core;\npublic class A { }\n",
        );
        write(
            temp.path(),
            "src/B.cs",
            "namespace Acme.Core;\npublic class B { }\n",
        );
        write(temp.path(), "src/Loose.cs", "public class Loose { }\n");

        let solution = index(temp.path()).unwrap();
        assert_eq!(solution.total_files, 3);
        assert_eq!(solution.namespaces["Acme.Core"].len(), 2);
        assert_eq!(solution.namespaces["Global"].len(), 1);
        assert_eq!(solution.summary.total_classes, 3);
    }

    #[test]
    fn test_index_survives_undecodable_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Good.cs", "public class Good { }\n");
        // Latin-1 bytes still decode via the fallback chain.
        fs::write(temp.path().join("Legacy.cs"), b"// caf\xe9\npublic class Legacy { }\n")
            .unwrap();

        let solution = index(temp.path()).unwrap();
        assert_eq!(solution.total_files, 2);
        assert_eq!(solution.summary.total_classes, 2);
    }

    #[test]
    fn test_project_registration_and_assignment() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/Api/Api.csproj", "<Project />");
        write(temp.path(), "src/Api/Users.cs", "public class Users { }\n");
        write(temp.path(), "tools/Gen.cs", "public class Gen { }\n");

        let solution = index(temp.path()).unwrap();
        let api = &solution.projects["Api"];
        assert_eq!(api.directory, "src/Api");
        assert_eq!(api.files.len(), 1);
        assert_eq!(api.files[0].name, "Users.cs");
        assert_eq!(api.files[0].project.as_deref(), Some("Api"));

        // Gen.cs matches no project and stays unassigned.
        let gen = solution.namespaces["Global"]
            .iter()
            .find(|f| f.name == "Gen.cs")
            .unwrap();
        assert!(gen.project.is_none());
    }

    #[test]
    fn test_longest_prefix_assignment() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/Root.csproj", "<Project />");
        write(temp.path(), "src/Api/Api.csproj", "<Project />");
        write(temp.path(), "src/Api/Foo.cs", "public class Foo { }\n");

        let solution = index(temp.path()).unwrap();
        assert_eq!(solution.projects["Api"].files.len(), 1);
        assert!(solution.projects["Root"].files.is_empty());
    }

    #[test]
    fn test_bucket_and_project_records_stay_consistent() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/Api/Api.csproj", "<Project />");
        write(
            temp.path(),
            "src/Api/UserController.cs",
            "namespace Api;\npublic class UserController { }\n",
        );

        let solution = index(temp.path()).unwrap();
        let in_bucket = &solution.file_types.controllers[0];
        let in_project = &solution.projects["Api"].files[0];
        assert_eq!(in_bucket.project, in_project.project);
        assert_eq!(in_bucket.project.as_deref(), Some("Api"));
    }

    #[test]
    fn test_manifest_not_counted_as_source() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/Api/Api.csproj", "<Project />");
        write(temp.path(), "src/Api/A.cs", "public class A { }\n");

        let solution = index(temp.path()).unwrap();
        assert_eq!(solution.total_files, 1);
    }

    #[test]
    fn test_summarize() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "A.cs",
            "namespace N.One;\npublic class A { public void Run() { } public int X { get; set; } }\n",
        );
        write(
            temp.path(),
            "B.cs",
            "namespace N.Two;\npublic interface IB { }\npublic enum E { }\n",
        );

        let summary = summarize(temp.path()).unwrap();
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_classes, 1);
        assert_eq!(summary.total_interfaces, 1);
        assert_eq!(summary.total_enums, 1);
        assert_eq!(summary.total_methods, 1);
        assert_eq!(summary.total_properties, 1);
        assert_eq!(summary.namespaces, vec!["N.One", "N.Two"]);
    }
}
