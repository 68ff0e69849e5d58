//! Enumeration of candidate source files under a solution root.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Directory names never descended into. Pruned before descent so large
/// build-output trees are not enumerated at all.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "bin", "obj", "packages", "node_modules"];

/// C# source extension.
pub const SOURCE_EXT: &str = "cs";

/// Project manifest extension.
pub const MANIFEST_EXT: &str = "csproj";

/// Walk `root` for files carrying one of `extensions` (no leading dot),
/// pruning the excluded directory set.
pub fn walk<'a>(
    root: &Path,
    extensions: &'a [&'a str],
) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() {
                let name = e.file_name().to_string_lossy();
                return !EXCLUDED_DIRS.contains(&name.as_ref());
            }
            true
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(move |path| {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            extensions.contains(&ext)
        })
}

/// Collect all `.cs` files under `root`.
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    walk(root, &[SOURCE_EXT]).collect()
}

/// Collect `.cs` and `.csproj` files under `root` in one pass.
pub fn collect_solution_files(root: &Path) -> Vec<PathBuf> {
    walk(root, &[SOURCE_EXT, MANIFEST_EXT]).collect()
}
