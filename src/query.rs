//! Structural queries over a source tree: class lookup and element
//! search. Queries index from scratch on every call; nothing is cached
//! between invocations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{analyze, analyze_path, read_source, Element, ElementKind, FileAnalysis, Modifier};
use crate::index::{collect_source_files, relative_path, walk, SOURCE_EXT};

/// Query failures reported to the caller.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("class '{0}' not found in the source tree")]
    ClassNotFound(String),
    #[error("root path does not exist or is not a directory: {0}")]
    InvalidRoot(PathBuf),
}

/// How `find_class` looks for a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Filename-pattern probes first, verified by content; silently
    /// falls through to a deep scan when nothing verifies.
    Direct,
    /// Full-tree content scan.
    Deep,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Direct => "direct",
            SearchMode::Deep => "deep",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "direct" => Ok(SearchMode::Direct),
            "deep" => Ok(SearchMode::Deep),
            other => Err(format!("unknown search mode: {}", other)),
        }
    }
}

/// Per-kind filter for `find_elements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementFilter {
    Dto,
    Service,
    Controller,
    Interface,
    Enum,
    Class,
}

impl ElementFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementFilter::Dto => "dto",
            ElementFilter::Service => "service",
            ElementFilter::Controller => "controller",
            ElementFilter::Interface => "interface",
            ElementFilter::Enum => "enum",
            ElementFilter::Class => "class",
        }
    }

    /// Whether an element passes this filter, ignoring the name test.
    fn matches(&self, element: &Element) -> bool {
        let name = element.name.to_lowercase();
        match self {
            ElementFilter::Dto => name.ends_with("dto"),
            ElementFilter::Service => name.ends_with("service"),
            ElementFilter::Controller => name.ends_with("controller"),
            ElementFilter::Interface => element.kind == ElementKind::Interface,
            ElementFilter::Enum => element.kind == ElementKind::Enum,
            ElementFilter::Class => {
                matches!(element.kind, ElementKind::Class | ElementKind::Record)
            }
        }
    }
}

impl fmt::Display for ElementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ElementFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "dto" => Ok(ElementFilter::Dto),
            "service" => Ok(ElementFilter::Service),
            "controller" => Ok(ElementFilter::Controller),
            "interface" => Ok(ElementFilter::Interface),
            "enum" => Ok(ElementFilter::Enum),
            "class" => Ok(ElementFilter::Class),
            other => Err(format!("unknown element kind: {}", other)),
        }
    }
}

/// A verified class-lookup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMatch {
    pub class_name: String,
    /// Path relative to the root, '/' separated.
    pub file_path: String,
    pub search_type: SearchMode,
    pub analysis: FileAnalysis,
}

/// One element matched by `find_elements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementMatch {
    pub element_name: String,
    pub element_kind: ElementKind,
    pub file_path: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
}

fn check_root(root: &Path) -> Result<(), QueryError> {
    if !root.is_dir() {
        return Err(QueryError::InvalidRoot(root.to_path_buf()));
    }
    Ok(())
}

/// Declaration pattern for a class name: any of the five kind keywords
/// followed by the exact name, word-bounded, case-insensitive.
fn declaration_regex(class_name: &str) -> Regex {
    let escaped = regex::escape(class_name);
    Regex::new(&format!(
        r"(?im)\b(?:class|interface|record|enum|struct)\s+{}\b",
        escaped
    ))
    .unwrap()
}

/// Whether the file's text actually declares the class. Unreadable files
/// count as non-matches.
fn file_contains_declaration(path: &Path, decl: &Regex) -> bool {
    match read_source(path) {
        Ok(text) => decl.is_match(&text),
        Err(_) => false,
    }
}

/// Locate a class declaration in the tree.
///
/// Direct mode probes the conventional filenames first and verifies each
/// probe by content; a filename hit alone is never accepted. When no
/// probe verifies (or in Deep mode) every source file is scanned, and a
/// missing declaration is a typed `ClassNotFound` failure.
pub fn find_class(root: &Path, class_name: &str, mode: SearchMode) -> anyhow::Result<ClassMatch> {
    check_root(root)?;

    if mode == SearchMode::Direct {
        if let Some(found) = direct_search(root, class_name)? {
            return Ok(found);
        }
    }

    deep_search(root, class_name)
}

/// Filename probes, tried in priority order across the whole tree.
fn direct_search(root: &Path, class_name: &str) -> anyhow::Result<Option<ClassMatch>> {
    let patterns = [
        format!("{}.cs", class_name),
        format!("I{}.cs", class_name),
        format!("{}Dto.cs", class_name),
        format!("{}Service.cs", class_name),
        format!("{}Controller.cs", class_name),
    ];
    let decl = declaration_regex(class_name);

    for pattern in &patterns {
        let wanted = pattern.to_lowercase();
        for path in walk(root, &[SOURCE_EXT]) {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_lowercase();
            if name != wanted {
                continue;
            }
            if !file_contains_declaration(&path, &decl) {
                continue;
            }

            let rel = relative_path(root, &path);
            let analysis = analyze_path(&path, &rel)?;
            return Ok(Some(ClassMatch {
                class_name: class_name.to_string(),
                file_path: rel,
                search_type: SearchMode::Direct,
                analysis,
            }));
        }
    }

    Ok(None)
}

/// Full-tree content scan; first verified declaration wins.
fn deep_search(root: &Path, class_name: &str) -> anyhow::Result<ClassMatch> {
    let decl = declaration_regex(class_name);

    for path in collect_source_files(root) {
        if !file_contains_declaration(&path, &decl) {
            continue;
        }

        let rel = relative_path(root, &path);
        let analysis = analyze_path(&path, &rel)?;
        return Ok(ClassMatch {
            class_name: class_name.to_string(),
            file_path: rel,
            search_type: SearchMode::Deep,
            analysis,
        });
    }

    Err(QueryError::ClassNotFound(class_name.to_string()).into())
}

/// Find declared elements matching a kind filter and a case-insensitive
/// partial name, across the whole tree. Files that fail analysis are
/// skipped.
pub fn find_elements(
    root: &Path,
    filter: ElementFilter,
    name_partial: &str,
) -> anyhow::Result<Vec<ElementMatch>> {
    check_root(root)?;

    let sources = collect_source_files(root);
    let needle = name_partial.to_lowercase();

    let per_file: Vec<Vec<ElementMatch>> = sources
        .par_iter()
        .map(|path| {
            let rel = relative_path(root, path);
            let text = match read_source(path) {
                Ok(text) => text,
                Err(_) => return Vec::new(),
            };
            let analysis = analyze(&rel, &text);

            analysis
                .elements
                .iter()
                .filter(|e| filter.matches(e))
                .filter(|e| e.name.to_lowercase().contains(&needle))
                .map(|e| ElementMatch {
                    element_name: e.name.clone(),
                    element_kind: e.kind,
                    file_path: rel.clone(),
                    line: e.line,
                    namespace: analysis.namespace.clone(),
                    modifiers: e.modifiers.clone(),
                    doc_summary: e.doc_summary.clone(),
                })
                .collect()
        })
        .collect();

    Ok(per_file.into_iter().flatten().collect())
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
    fn test_direct_search_verified_by_content() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "src/Invoice.cs",
            "namespace Billing;\npublic class Invoice { }\n",
        );

        let found = find_class(temp.path(), "Invoice", SearchMode::Direct).unwrap();
        assert_eq!(found.file_path, "src/Invoice.cs");
        assert_eq!(found.search_type, SearchMode::Direct);
        assert_eq!(found.analysis.namespace.as_deref(), Some("Billing"));
    }

    #[test]
    fn test_direct_search_rejects_filename_only_match() {
        let temp = TempDir::new().unwrap();
        // File is named Invoice.cs but declares a different class; the
        // filename hit must not be accepted, and the deep fallback must
        // not find anything either.
        write(
            temp.path(),
            "Invoice.cs",
            "public class InvoiceLine { }\n",
        );

        let err = find_class(temp.path(), "Invoice", SearchMode::Direct).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QueryError>(),
            Some(QueryError::ClassNotFound(_))
        ));
    }

    #[test]
    fn test_direct_falls_through_to_deep() {
        let temp = TempDir::new().unwrap();
        // No conventional filename: only a deep content scan finds it.
        write(
            temp.path(),
            "src/Misc.cs",
            "public class Invoice { }\n",
        );

        let found = find_class(temp.path(), "Invoice", SearchMode::Direct).unwrap();
        assert_eq!(found.search_type, SearchMode::Deep);
        assert_eq!(found.file_path, "src/Misc.cs");
    }

    #[test]
    fn test_direct_probe_priority() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/IUser.cs", "public interface IUser { }\n");
        write(temp.path(), "b/User.cs", "public class User { }\n");

        // {name}.cs is probed before I{name}.cs.
        let found = find_class(temp.path(), "User", SearchMode::Direct).unwrap();
        assert_eq!(found.file_path, "b/User.cs");
    }

    #[test]
    fn test_deep_mode_skips_probes() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "Order.cs",
            "public record Order(int Id);\n",
        );

        let found = find_class(temp.path(), "Order", SearchMode::Deep).unwrap();
        assert_eq!(found.search_type, SearchMode::Deep);
    }

    #[test]
    fn test_find_class_invalid_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent");
        let err = find_class(&missing, "Foo", SearchMode::Direct).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QueryError>(),
            Some(QueryError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_find_elements_kind_and_name() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "OrderStatus.cs",
            "namespace Shop;\npublic enum OrderStatus { New }\n",
        );
        write(
            temp.path(),
            "StatusService.cs",
            "namespace Shop;\npublic class StatusService { }\n",
        );

        let matches = find_elements(temp.path(), ElementFilter::Enum, "Status").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].element_name, "OrderStatus");
        assert_eq!(matches[0].element_kind, ElementKind::Enum);
        assert_eq!(matches[0].namespace.as_deref(), Some("Shop"));
    }

    #[test]
    fn test_find_elements_dto_suffix_rule() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "UserDto.cs", "public class UserDto { }\n");
        write(temp.path(), "User.cs", "public class User { }\n");

        let matches = find_elements(temp.path(), ElementFilter::Dto, "user").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].element_name, "UserDto");
    }

    #[test]
    fn test_find_elements_class_includes_records() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Order.cs", "public record Order(int Id);\n");

        let matches = find_elements(temp.path(), ElementFilter::Class, "order").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].element_kind, ElementKind::Record);
    }

    #[test]
    fn test_find_elements_empty_partial_matches_all_of_kind() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "A.cs", "public interface IA { }\n");
        write(temp.path(), "B.cs", "public interface IB { }\n");

        let matches = find_elements(temp.path(), ElementFilter::Interface, "").unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_search_mode_parsing() {
        assert_eq!("direct".parse::<SearchMode>().unwrap(), SearchMode::Direct);
        assert_eq!("DEEP".parse::<SearchMode>().unwrap(), SearchMode::Deep);
        assert!("fuzzy".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_element_filter_parsing() {
        assert_eq!("dto".parse::<ElementFilter>().unwrap(), ElementFilter::Dto);
        assert!("widget".parse::<ElementFilter>().is_err());
    }
}
