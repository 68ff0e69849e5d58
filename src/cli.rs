//! Command-line interface for cspect.

use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::analysis;
use crate::index;
use crate::query::{self, ElementFilter, QueryError, SearchMode};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural analyzer for C# source trees.
///
/// cspect extracts a structural model of a solution (declarations,
/// namespaces, membership, categorisation) without compiling it, and
/// answers structural queries over that model. It is not a compiler
/// front end: malformed or partial source degrades to best-effort
/// extraction instead of failing.
#[derive(Parser)]
#[command(name = "cspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single C# source file
    Analyze(AnalyzeArgs),
    /// Show the full solution structure (namespaces, projects, file types)
    Structure(StructureArgs),
    /// Show aggregate totals for a solution tree
    Summary(SummaryArgs),
    /// Locate a class declaration by name
    FindClass(FindClassArgs),
    /// Find declared elements by kind and partial name
    FindElements(FindElementsArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to a .cs file
    pub file: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the structure command.
#[derive(Parser)]
pub struct StructureArgs {
    /// Solution root directory
    pub root: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the summary command.
#[derive(Parser)]
pub struct SummaryArgs {
    /// Solution root directory
    pub root: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the find-class command.
#[derive(Parser)]
pub struct FindClassArgs {
    /// Solution root directory
    pub root: PathBuf,

    /// Class name to locate
    pub name: String,

    /// Search mode: direct (filename probes first) or deep (full scan)
    #[arg(short, long, default_value = "direct")]
    pub mode: String,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the find-elements command.
#[derive(Parser)]
pub struct FindElementsArgs {
    /// Solution root directory
    pub root: PathBuf,

    /// Element kind: dto, service, controller, interface, enum, or class
    pub kind: String,

    /// Partial element name (case-insensitive substring)
    pub name: String,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validate the output format flag.
fn check_format(format: &str) -> Result<(), String> {
    if format == "pretty" || format == "json" {
        Ok(())
    } else {
        Err(format!(
            "invalid format {:?}, must be 'pretty' or 'json'",
            format
        ))
    }
}

/// Validate a user-supplied class name before it reaches the query layer.
fn check_class_name(name: &str) -> Result<&str, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("class name is required".to_string());
    }
    if !IDENTIFIER_RE.is_match(name) {
        return Err(format!("invalid class name: {}", name));
    }
    Ok(name)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if let Err(e) = check_format(&args.format) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    if !args.file.is_file() {
        eprintln!("Error: file not found: {}", args.file.display());
        return Ok(EXIT_ERROR);
    }

    let label = args.file.to_string_lossy().to_string();
    let analysis = analysis::analyze_path(&args.file, &label)?;

    match args.format.as_str() {
        "json" => report::write_json(&analysis)?,
        _ => report::write_analysis_pretty(&analysis),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the structure command.
pub fn run_structure(args: &StructureArgs) -> anyhow::Result<i32> {
    if let Err(e) = check_format(&args.format) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    let solution = match index::index(&args.root) {
        Ok(s) => s,
        Err(e) if e.downcast_ref::<index::IndexError>().is_some() => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
        Err(e) => return Err(e),
    };

    match args.format.as_str() {
        "json" => report::write_json(&solution)?,
        _ => report::write_structure_pretty(&solution),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the summary command.
pub fn run_summary(args: &SummaryArgs) -> anyhow::Result<i32> {
    if let Err(e) = check_format(&args.format) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    let summary = match index::summarize(&args.root) {
        Ok(s) => s,
        Err(e) if e.downcast_ref::<index::IndexError>().is_some() => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
        Err(e) => return Err(e),
    };

    match args.format.as_str() {
        "json" => report::write_json(&summary)?,
        _ => report::write_summary_pretty(&summary),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the find-class command.
pub fn run_find_class(args: &FindClassArgs) -> anyhow::Result<i32> {
    if let Err(e) = check_format(&args.format) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    let name = match check_class_name(&args.name) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mode: SearchMode = match args.mode.parse() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    match query::find_class(&args.root, name, mode) {
        Ok(found) => {
            match args.format.as_str() {
                "json" => report::write_json(&found)?,
                _ => report::write_class_match_pretty(&found),
            }
            Ok(EXIT_SUCCESS)
        }
        Err(e) => match e.downcast_ref::<QueryError>() {
            Some(QueryError::ClassNotFound(_)) => {
                eprintln!("{}", e);
                Ok(EXIT_FAILED)
            }
            Some(QueryError::InvalidRoot(_)) => {
                eprintln!("Error: {}", e);
                Ok(EXIT_ERROR)
            }
            None => Err(e),
        },
    }
}

/// Run the find-elements command.
pub fn run_find_elements(args: &FindElementsArgs) -> anyhow::Result<i32> {
    if let Err(e) = check_format(&args.format) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    let kind: ElementFilter = match args.kind.parse() {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let matches = match query::find_elements(&args.root, kind, args.name.trim()) {
        Ok(m) => m,
        Err(e) if matches!(e.downcast_ref::<QueryError>(), Some(QueryError::InvalidRoot(_))) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
        Err(e) => return Err(e),
    };

    match args.format.as_str() {
        "json" => report::write_json(&matches)?,
        _ => report::write_element_matches_pretty(&matches),
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_format() {
        assert!(check_format("pretty").is_ok());
        assert!(check_format("json").is_ok());
        assert!(check_format("yaml").is_err());
    }

    #[test]
    fn test_check_class_name() {
        assert_eq!(check_class_name(" Invoice ").unwrap(), "Invoice");
        assert!(check_class_name("_Private").is_ok());
        assert!(check_class_name("").is_err());
        assert!(check_class_name("1Bad").is_err());
        assert!(check_class_name("Has Space").is_err());
        assert!(check_class_name("Injec;tion").is_err());
    }
}
