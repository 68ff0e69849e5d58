//! Assignment of indexed files to their enclosing project.

use std::collections::BTreeMap;

use super::ProjectEntry;

/// Pick the project whose directory is the longest string prefix of
/// `file_path`.
///
/// Ties on equal prefix length go to the lexicographically smallest
/// directory, so assignment never depends on map iteration order. A
/// zero-length directory (manifest at the tree root) never wins; files
/// outside every project directory stay unassigned.
pub fn best_project<'a>(
    projects: &'a BTreeMap<String, ProjectEntry>,
    file_path: &str,
) -> Option<&'a str> {
    let mut best: Option<(&str, &str)> = None;

    for (name, entry) in projects {
        let dir = entry.directory.as_str();
        if dir.is_empty() || !file_path.starts_with(dir) {
            continue;
        }

        let better = match best {
            None => true,
            Some((_, best_dir)) => {
                dir.len() > best_dir.len() || (dir.len() == best_dir.len() && dir < best_dir)
            }
        };
        if better {
            best = Some((name.as_str(), dir));
        }
    }

    best.map(|(name, _)| name)
}
