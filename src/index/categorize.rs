//! Semantic file categorisation.
//!
//! Every indexed file lands in exactly one bucket, decided once by an
//! ordered rule table. The order encodes business priority (a
//! `UserController.cs` that also smells like a DTO is still a
//! controller), so the rules live in one explicit top-down list rather
//! than scattered conditionals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::{Element, ElementKind};

/// The eight semantic file categories used for solution-structure
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Controller,
    Service,
    Dto,
    Model,
    Interface,
    Enum,
    Configuration,
    Other,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Controller => "controller",
            Bucket::Service => "service",
            Bucket::Dto => "dto",
            Bucket::Model => "model",
            Bucket::Interface => "interface",
            Bucket::Enum => "enum",
            Bucket::Configuration => "configuration",
            Bucket::Other => "other",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercased view of a file used by the rule predicates.
struct CategoryInput<'a> {
    name: &'a str,
    path: &'a str,
    elements: &'a [Element],
}

type Rule = (fn(&CategoryInput) -> bool, Bucket);

fn is_controller(i: &CategoryInput) -> bool {
    i.name.contains("controller") || i.path.contains("/controllers/")
}

fn is_service(i: &CategoryInput) -> bool {
    i.name.contains("service") || i.path.contains("/services/")
}

fn is_dto(i: &CategoryInput) -> bool {
    i.name.contains("dto") || i.path.contains("/dtos/") || i.path.contains("/models/dto")
}

fn is_model(i: &CategoryInput) -> bool {
    i.path.contains("/models/") && !i.name.contains("dto")
}

fn is_interface(i: &CategoryInput) -> bool {
    i.name.starts_with('i') && i.elements.iter().any(|e| e.kind == ElementKind::Interface)
}

fn is_enum(i: &CategoryInput) -> bool {
    i.elements.iter().any(|e| e.kind == ElementKind::Enum)
}

fn is_configuration(i: &CategoryInput) -> bool {
    i.name.contains("config") || i.path.contains("/configuration/")
}

/// Evaluated top-down; first match wins. Order is load-bearing.
const RULES: &[Rule] = &[
    (is_controller, Bucket::Controller),
    (is_service, Bucket::Service),
    (is_dto, Bucket::Dto),
    (is_model, Bucket::Model),
    (is_interface, Bucket::Interface),
    (is_enum, Bucket::Enum),
    (is_configuration, Bucket::Configuration),
];

/// Map one file to its bucket. Pure and total: the same
/// (path, name, elements) always yields the same bucket.
pub fn categorize(path: &str, name: &str, elements: &[Element]) -> Bucket {
    let name_lower = name.to_lowercase();
    let path_lower = path.to_lowercase();
    let input = CategoryInput {
        name: &name_lower,
        path: &path_lower,
        elements,
    };

    for (predicate, bucket) in RULES {
        if predicate(&input) {
            return *bucket;
        }
    }
    Bucket::Other
}
