//! Output formatting for analysis and query results.
//!
//! Two formats: pretty (colored terminal output) and JSON (structured
//! output for programmatic consumption).

use colored::*;
use serde::Serialize;

use crate::analysis::FileAnalysis;
use crate::index::{Bucket, FileRecord, SolutionIndex, SolutionSummary};
use crate::query::{ClassMatch, ElementMatch};

/// Write any result as pretty-printed JSON to stdout.
pub fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Pretty-print a single-file analysis.
pub fn write_analysis_pretty(analysis: &FileAnalysis) {
    println!("{}", analysis.path.bold());
    println!(
        "  {} {} lines, {} bytes",
        "size:".dimmed(),
        analysis.line_count,
        analysis.size_bytes
    );
    println!(
        "  {} {}",
        "namespace:".dimmed(),
        analysis.namespace.as_deref().unwrap_or("(none)")
    );
    if !analysis.usings.is_empty() {
        println!("  {} {}", "usings:".dimmed(), analysis.usings.join(", "));
    }

    if !analysis.elements.is_empty() {
        println!("  {}", "elements:".dimmed());
        for element in &analysis.elements {
            let mut line = format!(
                "    {} {} {}",
                element.kind.to_string().cyan(),
                element.name.bold(),
                format!("(line {})", element.line).dimmed()
            );
            if !element.inheritance.is_empty() {
                line.push_str(&format!(" : {}", element.inheritance.join(", ")));
            }
            println!("{}", line);
            if let Some(summary) = &element.doc_summary {
                println!("      {}", summary.italic());
            }
        }
    }

    if !analysis.methods.is_empty() {
        println!(
            "  {} {}",
            "methods:".dimmed(),
            analysis
                .methods
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if !analysis.properties.is_empty() {
        println!(
            "  {} {}",
            "properties:".dimmed(),
            analysis
                .properties
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let s = &analysis.summary;
    println!(
        "  {} {} code / {} comment / {} blank, complexity {}",
        "summary:".dimmed(),
        s.code_lines,
        s.comment_lines,
        s.blank_lines,
        colored_complexity(s.complexity)
    );
}

fn colored_complexity(complexity: crate::analysis::Complexity) -> ColoredString {
    use crate::analysis::Complexity;
    match complexity {
        Complexity::Low => "Low".green(),
        Complexity::Medium => "Medium".yellow(),
        Complexity::High => "High".red(),
    }
}

/// Pretty-print the whole solution structure.
pub fn write_structure_pretty(index: &SolutionIndex) {
    println!("{} {}", "Solution:".bold(), index.root);
    println!("  {} source files", index.total_files);
    println!(
        "  {} classes, {} interfaces, {} enums, {} records",
        index.summary.total_classes,
        index.summary.total_interfaces,
        index.summary.total_enums,
        index.summary.total_records
    );

    if !index.projects.is_empty() {
        println!();
        println!("{}", "Projects".bold().underline());
        for (name, project) in &index.projects {
            println!(
                "  {} {} ({} files)",
                name.cyan(),
                project.directory.dimmed(),
                project.files.len()
            );
        }
    }

    println!();
    println!("{}", "Namespaces".bold().underline());
    for (namespace, files) in &index.namespaces {
        println!("  {} ({} files)", namespace.cyan(), files.len());
        for file in files {
            println!("    {}", file.path);
        }
    }

    println!();
    println!("{}", "File types".bold().underline());
    let buckets = [
        (Bucket::Controller, "controllers"),
        (Bucket::Service, "services"),
        (Bucket::Dto, "dtos"),
        (Bucket::Model, "models"),
        (Bucket::Interface, "interfaces"),
        (Bucket::Enum, "enums"),
        (Bucket::Configuration, "configurations"),
        (Bucket::Other, "others"),
    ];
    for (bucket, label) in buckets {
        let files = index.file_types.bucket(bucket);
        if files.is_empty() {
            continue;
        }
        println!("  {} ({})", label.cyan(), files.len());
        for file in files {
            println!("    {}{}", file.path, project_suffix(file));
        }
    }
}

fn project_suffix(file: &FileRecord) -> String {
    match &file.project {
        Some(project) => format!(" [{}]", project),
        None => String::new(),
    }
}

/// Pretty-print the flat solution summary.
pub fn write_summary_pretty(summary: &SolutionSummary) {
    println!("{} {}", "Solution:".bold(), summary.root);
    println!("  {} source files", summary.total_files);
    println!(
        "  {} classes, {} interfaces, {} enums, {} records",
        summary.total_classes,
        summary.total_interfaces,
        summary.total_enums,
        summary.total_records
    );
    println!(
        "  {} methods, {} properties",
        summary.total_methods, summary.total_properties
    );
    if !summary.namespaces.is_empty() {
        println!("  {} {}", "namespaces:".dimmed(), summary.namespaces.join(", "));
    }
}

/// Pretty-print a class-lookup result.
pub fn write_class_match_pretty(found: &ClassMatch) {
    println!(
        "{} {} {} {}",
        "Found".green().bold(),
        found.class_name.bold(),
        "in".dimmed(),
        found.file_path
    );
    println!("  {} {}", "search:".dimmed(), found.search_type);
    write_analysis_pretty(&found.analysis);
}

/// Pretty-print element-search results.
pub fn write_element_matches_pretty(matches: &[ElementMatch]) {
    if matches.is_empty() {
        println!("{}", "No matching elements".yellow());
        return;
    }

    println!("{} matching element(s)", matches.len());
    for m in matches {
        println!(
            "  {} {} {} {}:{}",
            m.element_kind.to_string().cyan(),
            m.element_name.bold(),
            "at".dimmed(),
            m.file_path,
            m.line
        );
        if let Some(namespace) = &m.namespace {
            println!("    {} {}", "namespace:".dimmed(), namespace);
        }
        if let Some(summary) = &m.doc_summary {
            println!("    {}", summary.italic());
        }
    }
}
