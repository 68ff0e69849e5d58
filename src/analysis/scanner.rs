//! Regex-based declaration scanner for C# source text.
//!
//! This is deliberately not a parser. The patterns are line-oriented
//! heuristics that tolerate malformed or partial source: any extraction
//! step that finds nothing yields an empty result for that field, never
//! an error. Known blind spots (nested generics in signatures, multi-line
//! doc comments, manually formatted accessors) are accepted trade-offs.

use once_cell::sync::Lazy;
use regex::Regex;

use super::facts::{
    Complexity, Element, ElementKind, Field, FileAnalysis, FileSummary, Method, Modifier,
    Parameter, Property,
};

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)namespace\s+([A-Za-z_][\w.]*)").unwrap());

static USING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)using\s+([A-Za-z_][\w.]*);").unwrap());

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:public|private|protected|internal)?\s*(?:static|abstract|sealed)?\s*class\s+([A-Za-z_]\w*)",
    )
    .unwrap()
});

static INTERFACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(?:public|private|protected|internal)?\s*interface\s+([A-Za-z_]\w*)").unwrap()
});

static ENUM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(?:public|private|protected|internal)?\s*enum\s+([A-Za-z_]\w*)").unwrap()
});

static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(?:public|private|protected|internal)?\s*record\s+([A-Za-z_]\w*)").unwrap()
});

static STRUCT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)(?:public|private|protected|internal)?\s*struct\s+([A-Za-z_]\w*)").unwrap()
});

/// Methods need at least one leading modifier keyword so plain calls and
/// control-flow statements do not match.
static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(?:public|private|protected|internal|static|virtual|override|abstract|async)\s+(?:\w+\s+)*(\w+)\s*\([^)]*\)\s*(?:\{|;)",
    )
    .unwrap()
});

static PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:public|private|protected|internal)\s+(\w+)\s+(\w+)\s*\{\s*(?:get|set)")
        .unwrap()
});

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:public|private|protected|internal|readonly|static)\s+(\w+)\s+(\w+);")
        .unwrap()
});

static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<summary>\s*(.*?)\s*</summary>").unwrap());

static PARAMS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

static IF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bif\s*\(").unwrap());
static FOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfor\s*\(").unwrap());
static WHILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwhile\s*\(").unwrap());
static SWITCH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bswitch\s*\(").unwrap());

/// Analyze one file's text. Best-effort: never fails on malformed input.
pub fn analyze(path: &str, text: &str) -> FileAnalysis {
    let lines: Vec<&str> = text.lines().collect();

    FileAnalysis {
        path: path.to_string(),
        size_bytes: text.len(),
        line_count: lines.len(),
        namespace: extract_namespace(text),
        usings: extract_usings(text),
        elements: extract_elements(text, &lines),
        methods: extract_methods(text, &lines),
        properties: extract_properties(text, &lines),
        fields: extract_fields(text, &lines),
        summary: generate_summary(text, &lines),
    }
}

/// First namespace declaration in the file, if any.
fn extract_namespace(text: &str) -> Option<String> {
    NAMESPACE_RE
        .captures(text)
        .map(|c| c[1].to_string())
}

/// All using directives, deduplicated and alphabetically sorted.
fn extract_usings(text: &str) -> Vec<String> {
    let mut usings: Vec<String> = USING_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect();
    usings.sort();
    usings.dedup();
    usings
}

fn kind_regex(kind: ElementKind) -> &'static Regex {
    match kind {
        ElementKind::Class => &CLASS_RE,
        ElementKind::Interface => &INTERFACE_RE,
        ElementKind::Enum => &ENUM_RE,
        ElementKind::Record => &RECORD_RE,
        ElementKind::Struct => &STRUCT_RE,
    }
}

/// Extract top-level type declarations of all five kinds.
///
/// The per-kind scans run independently; the combined list is sorted by
/// source line so callers see first-declared-first-listed.
fn extract_elements(text: &str, lines: &[&str]) -> Vec<Element> {
    let mut elements = Vec::new();

    for kind in ElementKind::all() {
        for cap in kind_regex(kind).captures_iter(text) {
            let mat = cap.get(0).unwrap();
            let line = line_number_at(text, mat.start());
            let line_content = physical_line(lines, line);

            let inheritance = match kind {
                ElementKind::Class | ElementKind::Interface => {
                    extract_inheritance(line_content)
                }
                _ => Vec::new(),
            };

            elements.push(Element {
                name: cap[1].to_string(),
                kind,
                line,
                modifiers: extract_modifiers(line_content),
                inheritance,
                doc_summary: extract_doc_summary(lines, line),
            });
        }
    }

    elements.sort_by_key(|e| e.line);
    elements
}

fn extract_methods(text: &str, lines: &[&str]) -> Vec<Method> {
    let mut methods = Vec::new();

    for cap in METHOD_RE.captures_iter(text) {
        let mat = cap.get(0).unwrap();
        let line = line_number_at(text, mat.start());
        let method_line = physical_line(lines, line);
        let name = cap[1].to_string();

        methods.push(Method {
            return_type: extract_return_type(method_line),
            parameters: extract_parameters(method_line),
            is_async: method_line.to_lowercase().contains("async"),
            modifiers: extract_modifiers(method_line),
            doc_summary: extract_doc_summary(lines, line),
            name,
            line,
        });
    }

    methods
}

fn extract_properties(text: &str, lines: &[&str]) -> Vec<Property> {
    let mut properties = Vec::new();

    for cap in PROPERTY_RE.captures_iter(text) {
        let mat = cap.get(0).unwrap();
        let line = line_number_at(text, mat.start());
        let property_line = physical_line(lines, line);
        let lower = property_line.to_lowercase();

        properties.push(Property {
            name: cap[2].to_string(),
            declared_type: cap[1].to_string(),
            line,
            modifiers: extract_modifiers(property_line),
            // Permissive substring test; can miscount manually
            // formatted accessors.
            has_getter: lower.contains("get"),
            has_setter: lower.contains("set"),
            doc_summary: extract_doc_summary(lines, line),
        });
    }

    properties
}

fn extract_fields(text: &str, lines: &[&str]) -> Vec<Field> {
    let mut fields = Vec::new();

    for cap in FIELD_RE.captures_iter(text) {
        let mat = cap.get(0).unwrap();
        let line = line_number_at(text, mat.start());
        let field_line = physical_line(lines, line);
        let lower = field_line.to_lowercase();

        fields.push(Field {
            name: cap[2].to_string(),
            declared_type: cap[1].to_string(),
            line,
            modifiers: extract_modifiers(field_line),
            is_readonly: lower.contains("readonly"),
            is_static: lower.contains("static"),
            doc_summary: extract_doc_summary(lines, line),
        });
    }

    fields
}

/// 1-based line number of a byte offset.
fn line_number_at(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// The physical source line for a 1-based line number, or "" out of range.
fn physical_line<'a>(lines: &[&'a str], line: usize) -> &'a str {
    if line >= 1 && line <= lines.len() {
        lines[line - 1]
    } else {
        ""
    }
}

/// Modifiers present on a declaration line, by substring containment
/// against the fixed vocabulary.
fn extract_modifiers(line: &str) -> Vec<Modifier> {
    let lower = line.to_lowercase();
    Modifier::vocabulary()
        .iter()
        .filter(|m| lower.contains(m.as_str()))
        .copied()
        .collect()
}

/// Inheritance list from a `: Base, IFirst, ISecond` clause on the line.
fn extract_inheritance(line: &str) -> Vec<String> {
    static INHERIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*([^{]+)").unwrap());

    match INHERIT_RE.captures(line) {
        Some(cap) => cap[1]
            .trim()
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Return type: the token immediately preceding the token that opens the
/// parameter list.
fn extract_return_type(method_line: &str) -> Option<String> {
    let parts: Vec<&str> = method_line.trim().split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if part.contains('(') {
            if i > 0 {
                return Some(parts[i - 1].to_string());
            }
            return None;
        }
    }
    None
}

/// Parameters from the parenthesized text on the declaration line.
///
/// Each comma-separated fragment contributes its last two whitespace
/// tokens as (type, name); fragments with fewer tokens are dropped.
fn extract_parameters(method_line: &str) -> Vec<Parameter> {
    let mut parameters = Vec::new();

    if let Some(cap) = PARAMS_RE.captures(method_line) {
        let param_text = cap[1].trim();
        if param_text.is_empty() {
            return parameters;
        }

        for param in param_text.split(',') {
            let parts: Vec<&str> = param.trim().split_whitespace().collect();
            if parts.len() >= 2 {
                parameters.push(Parameter {
                    param_type: parts[parts.len() - 2].to_string(),
                    name: parts[parts.len() - 1].to_string(),
                });
            }
        }
    }

    parameters
}

/// Single-line `<summary>...</summary>` doc comment above a declaration.
///
/// Scans at most 8 physical lines backward, starting immediately above
/// the declaration; stops at the first `<summary>` hit (returning None
/// when the closing tag is not on the same line) or when the window is
/// exhausted.
fn extract_doc_summary(lines: &[&str], decl_line: usize) -> Option<String> {
    // 0-based indices: start at the line above the declaration, stop
    // (exclusive) 8 lines further up.
    let start = decl_line.saturating_sub(2);
    let floor = decl_line.saturating_sub(10);

    for i in ((floor + 1)..=start).rev() {
        if i >= lines.len() {
            continue;
        }
        let line = lines[i].trim();
        if line.to_lowercase().contains("<summary>") {
            return SUMMARY_RE
                .captures(line)
                .map(|cap| cap[1].trim().to_string());
        }
    }

    None
}

/// Per-file line-count summary and complexity estimate.
fn generate_summary(text: &str, lines: &[&str]) -> FileSummary {
    let mut code_lines = 0;
    let mut comment_lines = 0;
    let mut blank_lines = 0;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            blank_lines += 1;
        } else if trimmed.starts_with("//") {
            comment_lines += 1;
        } else {
            code_lines += 1;
        }
    }

    FileSummary {
        total_lines: lines.len(),
        code_lines,
        comment_lines,
        blank_lines,
        has_xml_docs: text.to_lowercase().contains("<summary>"),
        complexity: estimate_complexity(text),
    }
}

/// Unweighted count of branching constructs, bucketed into three tiers.
fn estimate_complexity(text: &str) -> Complexity {
    let score = IF_RE.find_iter(text).count()
        + FOR_RE.find_iter(text).count()
        + WHILE_RE.find_iter(text).count()
        + SWITCH_RE.find_iter(text).count();

    if score < 5 {
        Complexity::Low
    } else if score < 15 {
        Complexity::Medium
    } else {
        Complexity::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_round_trip() {
        let text = "namespace Acme.Billing;\nusing System;\npublic class Invoice : IEntity { public decimal Amount { get; set; } }\n";
        let analysis = analyze("Invoice.cs", text);

        assert_eq!(analysis.namespace.as_deref(), Some("Acme.Billing"));
        assert_eq!(analysis.usings, vec!["System".to_string()]);

        let classes: Vec<_> = analysis.elements_by_kind(ElementKind::Class).collect();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Invoice");
        assert_eq!(classes[0].inheritance, vec!["IEntity".to_string()]);

        assert_eq!(analysis.properties.len(), 1);
        assert_eq!(analysis.properties[0].name, "Amount");
        assert!(analysis.properties[0].has_getter);
        assert!(analysis.properties[0].has_setter);
    }

    #[test]
    fn test_namespace_absent() {
        let analysis = analyze("Loose.cs", "public class Loose { }");
        assert!(analysis.namespace.is_none());
    }

    #[test]
    fn test_usings_sorted_and_deduplicated() {
        let text = "using System.Linq;\nusing System;\nusing System;\n";
        let analysis = analyze("U.cs", text);
        assert_eq!(analysis.usings, vec!["System", "System.Linq"]);
    }

    #[test]
    fn test_elements_in_source_line_order() {
        let text = r#"namespace Demo
{
    public enum Color { Red }

    public class Painter { }

    public interface IBrush { }
}
"#;
        let analysis = analyze("Demo.cs", text);
        let kinds: Vec<_> = analysis.elements.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Enum, ElementKind::Class, ElementKind::Interface]
        );
        let lines: Vec<_> = analysis.elements.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 5, 7]);
    }

    #[test]
    fn test_modifiers_and_inheritance() {
        let text = "public abstract class Shape : Base, IDrawable, IComparable\n{\n}\n";
        let analysis = analyze("Shape.cs", text);

        let class = &analysis.elements[0];
        assert!(class.modifiers.contains(&Modifier::Public));
        assert!(class.modifiers.contains(&Modifier::Abstract));
        assert_eq!(
            class.inheritance,
            vec!["Base", "IDrawable", "IComparable"]
        );
    }

    #[test]
    fn test_enum_has_no_inheritance() {
        let text = "public enum Status : byte { Active }\n";
        let analysis = analyze("Status.cs", text);
        assert_eq!(analysis.elements[0].kind, ElementKind::Enum);
        assert!(analysis.elements[0].inheritance.is_empty());
    }

    #[test]
    fn test_method_extraction() {
        let text = r#"public class Svc
{
    public async Task FetchAsync(string id, int retries)
    {
        return null;
    }
}
"#;
        let analysis = analyze("Svc.cs", text);
        let method = analysis
            .methods
            .iter()
            .find(|m| m.name == "FetchAsync")
            .expect("method not found");

        assert!(method.is_async);
        assert_eq!(method.return_type.as_deref(), Some("Task"));
        assert_eq!(method.parameters.len(), 2);
        assert_eq!(method.parameters[0].param_type, "string");
        assert_eq!(method.parameters[0].name, "id");
        assert_eq!(method.parameters[1].param_type, "int");
        assert_eq!(method.parameters[1].name, "retries");
    }

    #[test]
    fn test_generic_return_type_not_matched() {
        // Known blind spot: '<' breaks the token chain before the name.
        let text = "public async Task<string> FetchAsync(string id) { }\n";
        let analysis = analyze("Svc.cs", text);
        assert!(analysis.methods.is_empty());
    }

    #[test]
    fn test_malformed_parameters_dropped() {
        let text = "public void Run(, string ok) { }\n";
        let analysis = analyze("Run.cs", text);
        let method = &analysis.methods[0];
        assert_eq!(method.parameters.len(), 1);
        assert_eq!(method.parameters[0].name, "ok");
    }

    #[test]
    fn test_field_extraction() {
        let text = "public class C\n{\n    private readonly ILogger _logger;\n    public static int Counter;\n}\n";
        let analysis = analyze("C.cs", text);

        assert_eq!(analysis.fields.len(), 2);
        let logger = &analysis.fields[0];
        assert_eq!(logger.name, "_logger");
        assert_eq!(logger.declared_type, "ILogger");
        assert!(logger.is_readonly);
        assert!(!logger.is_static);

        let counter = &analysis.fields[1];
        assert_eq!(counter.name, "Counter");
        assert!(counter.is_static);
    }

    #[test]
    fn test_doc_summary_single_line() {
        let text = r#"namespace Docs
{
    /// <summary>Handles invoice totals.</summary>
    public class Invoice { }
}
"#;
        let analysis = analyze("Invoice.cs", text);
        assert_eq!(
            analysis.elements[0].doc_summary.as_deref(),
            Some("Handles invoice totals.")
        );
    }

    #[test]
    fn test_doc_summary_outside_window() {
        // Summary 10 lines above the declaration is out of the 8-line window.
        let mut text = String::from("/// <summary>Too far.</summary>\n");
        for _ in 0..9 {
            text.push('\n');
        }
        text.push_str("public class Far { }\n");

        let analysis = analyze("Far.cs", &text);
        assert!(analysis.elements[0].doc_summary.is_none());
    }

    #[test]
    fn test_multi_line_summary_not_supported() {
        let text = "/// <summary>\n/// Spread over lines.\n/// </summary>\npublic class M { }\n";
        let analysis = analyze("M.cs", text);
        // The opening tag line has no closing tag, so extraction yields None.
        assert!(analysis.elements[0].doc_summary.is_none());
        assert!(analysis.summary.has_xml_docs);
    }

    #[test]
    fn test_file_summary_counts() {
        let text = "// comment\n\npublic class A { }\n// another\ncode();\n";
        let analysis = analyze("A.cs", text);

        assert_eq!(analysis.summary.total_lines, 5);
        assert_eq!(analysis.summary.comment_lines, 2);
        assert_eq!(analysis.summary.blank_lines, 1);
        assert_eq!(analysis.summary.code_lines, 2);
        assert!(!analysis.summary.has_xml_docs);
    }

    #[test]
    fn test_complexity_low() {
        let text = "if (a) { }\nif (b) { }\nif (c) { }\nif (d) { }\n";
        let analysis = analyze("L.cs", text);
        assert_eq!(analysis.summary.complexity, Complexity::Low);
    }

    #[test]
    fn test_complexity_medium() {
        let mut text = String::new();
        for _ in 0..6 {
            text.push_str("if (x) { }\n");
        }
        for _ in 0..4 {
            text.push_str("for (;;) { }\n");
        }
        let analysis = analyze("M.cs", &text);
        assert_eq!(analysis.summary.complexity, Complexity::Medium);
    }

    #[test]
    fn test_complexity_high() {
        let mut text = String::new();
        for _ in 0..16 {
            text.push_str("while (x) { }\n");
        }
        let analysis = analyze("H.cs", &text);
        assert_eq!(analysis.summary.complexity, Complexity::High);
    }

    #[test]
    fn test_malformed_input_never_fails() {
        let garbage = "}}}} class \u{0000} public private <<<< ((((\n;;;;";
        let analysis = analyze("garbage.cs", garbage);
        assert_eq!(analysis.line_count, 2);
    }

    #[test]
    fn test_empty_input() {
        let analysis = analyze("empty.cs", "");
        assert_eq!(analysis.line_count, 0);
        assert!(analysis.elements.is_empty());
        assert!(analysis.namespace.is_none());
        assert_eq!(analysis.summary.complexity, Complexity::Low);
    }
}
