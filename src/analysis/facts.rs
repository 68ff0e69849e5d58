//! Structural facts extracted from a single C# source file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of top-level type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    Record,
    Struct,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Class => "class",
            ElementKind::Interface => "interface",
            ElementKind::Enum => "enum",
            ElementKind::Record => "record",
            ElementKind::Struct => "struct",
        }
    }

    /// All kinds, in the order they are scanned for.
    pub fn all() -> [ElementKind; 5] {
        [
            ElementKind::Class,
            ElementKind::Interface,
            ElementKind::Enum,
            ElementKind::Record,
            ElementKind::Struct,
        ]
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access and declaration modifiers recognized on a declaration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Virtual,
    Override,
    Abstract,
    Sealed,
    Readonly,
    Async,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Static => "static",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
            Modifier::Abstract => "abstract",
            Modifier::Sealed => "sealed",
            Modifier::Readonly => "readonly",
            Modifier::Async => "async",
        }
    }

    /// The full modifier vocabulary, in detection order.
    pub fn vocabulary() -> [Modifier; 11] {
        [
            Modifier::Public,
            Modifier::Private,
            Modifier::Protected,
            Modifier::Internal,
            Modifier::Static,
            Modifier::Virtual,
            Modifier::Override,
            Modifier::Abstract,
            Modifier::Sealed,
            Modifier::Readonly,
            Modifier::Async,
        ]
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A top-level type declaration (class/interface/enum/record/struct).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    /// 1-based source line of the declaration.
    pub line: usize,
    pub modifiers: Vec<Modifier>,
    /// Base class and implemented interfaces, declaration order.
    /// Always empty for enums.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inheritance: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
}

/// A method parameter, parsed as the last two whitespace tokens
/// of the parameter fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub param_type: String,
    pub name: String,
}

/// A method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub line: usize,
    pub modifiers: Vec<Modifier>,
    pub is_async: bool,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
}

/// A property declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub declared_type: String,
    pub line: usize,
    pub modifiers: Vec<Modifier>,
    pub has_getter: bool,
    pub has_setter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
}

/// A field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub declared_type: String,
    pub line: usize,
    pub modifiers: Vec<Modifier>,
    pub is_readonly: bool,
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_summary: Option<String>,
}

/// Coarse complexity estimate derived from branching-keyword counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Complexity::Low => write!(f, "Low"),
            Complexity::Medium => write!(f, "Medium"),
            Complexity::High => write!(f, "High"),
        }
    }
}

/// Line-count and documentation summary for a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub has_xml_docs: bool,
    pub complexity: Complexity,
}

/// Everything extracted from one source file. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Path the analysis was produced for (as given by the caller).
    pub path: String,
    pub size_bytes: usize,
    pub line_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Deduplicated, alphabetically sorted using directives.
    pub usings: Vec<String>,
    /// Type declarations in source-line order.
    pub elements: Vec<Element>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub fields: Vec<Field>,
    pub summary: FileSummary,
}

impl FileAnalysis {
    /// Check whether any element of the given kind is declared.
    pub fn declares_kind(&self, kind: ElementKind) -> bool {
        self.elements.iter().any(|e| e.kind == kind)
    }

    /// Iterate elements of a specific kind.
    pub fn elements_by_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_strings() {
        assert_eq!(ElementKind::Class.as_str(), "class");
        assert_eq!(ElementKind::Record.to_string(), "record");
        assert_eq!(ElementKind::all().len(), 5);
    }

    #[test]
    fn test_modifier_vocabulary_order() {
        let vocab = Modifier::vocabulary();
        assert_eq!(vocab[0], Modifier::Public);
        assert_eq!(vocab[10], Modifier::Async);
    }

    #[test]
    fn test_complexity_display() {
        assert_eq!(Complexity::Low.to_string(), "Low");
        assert_eq!(Complexity::High.to_string(), "High");
    }
}
