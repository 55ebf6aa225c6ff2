//! Error types and batch error reporting for code generation
//!
//! This module provides:
//! - The two translation failure kinds (type-shape, unresolved identifier)
//! - Batch error collection so a host can report every failing unit at once

use std::fmt;

use dtsbind_core::SymbolKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("Type shape error: {0}")]
    TypeShape(#[from] ShapeError),

    #[error("Unresolved identifier: '{0}'")]
    UnresolvedIdentifier(String),

    #[error("Batch errors ({count} total):\n{summary}")]
    Batch { count: usize, summary: String },
}

/// A type expression used in a position its shape forbids
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("classes with a superclass are not supported")]
    SuperclassUnsupported,

    #[error("string literal \"{0}\" outside of a union")]
    StringLiteralOutsideUnion(String),

    #[error("typeof is only allowed directly on a variable or export")]
    TypeofMisplaced,

    #[error("typeof '{name}' refers to a {kind}, not a class")]
    TypeofNotClass { name: String, kind: SymbolKind },

    #[error("a class expression has no canonical name")]
    UnnameableClass,

    #[error("string literal \"{0}\" has no canonical name outside a union")]
    UnnameableStringLiteral(String),

    #[error("'{name}' is declared as a class but its body is not a class expression")]
    NotAClass { name: String },

    #[error("'{name}' is a {kind}, not a class")]
    WrongSymbolKind { name: String, kind: SymbolKind },

    #[error("props of component '{name}' must be an object type")]
    ComponentPropsNotObject { name: String },
}

impl CodegenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CodegenError::TypeShape(_) => ErrorCategory::TypeShape,
            CodegenError::UnresolvedIdentifier(_) => ErrorCategory::UnresolvedIdentifier,
            CodegenError::Batch { .. } => ErrorCategory::Other,
        }
    }
}

/// Location context for where an error occurred
///
/// The engine itself carries no locations; the host attaches them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Input file the unit came from
    pub file: Option<String>,
    /// Module identifier of the unit
    pub module: Option<String>,
    /// Declaration name
    pub declaration: Option<String>,
}

impl ErrorLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn in_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.module, &self.declaration) {
            (Some(file), Some(m), Some(d)) => write!(f, "{} ({}.{})", file, m, d),
            (Some(file), Some(m), None) => write!(f, "{} ({})", file, m),
            (Some(file), None, Some(d)) => write!(f, "{} ({})", file, d),
            (Some(file), None, None) => write!(f, "{}", file),
            (None, Some(m), Some(d)) => write!(f, "{}.{}", m, d),
            (None, Some(m), None) => write!(f, "{}", m),
            (None, None, Some(d)) => write!(f, "{}", d),
            (None, None, None) => write!(f, "<unknown location>"),
        }
    }
}

/// Category of error for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    TypeShape,
    UnresolvedIdentifier,
    /// Unit could not be read or decoded
    Input,
    Other,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::TypeShape => write!(f, "TYPE_SHAPE"),
            ErrorCategory::UnresolvedIdentifier => write!(f, "UNRESOLVED_IDENTIFIER"),
            ErrorCategory::Input => write!(f, "INPUT"),
            ErrorCategory::Other => write!(f, "OTHER"),
        }
    }
}

/// A single error entry in the batch
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub category: ErrorCategory,
    pub location: ErrorLocation,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            location: ErrorLocation::new(),
            message: message.into(),
        }
    }

    pub fn at(mut self, location: ErrorLocation) -> Self {
        self.location = location;
        self
    }
}

impl From<&CodegenError> for ErrorEntry {
    fn from(err: &CodegenError) -> Self {
        ErrorEntry::new(err.category(), err.to_string())
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {}: {}", self.category, self.location, self.message)
    }
}

/// Batch error collector for translating many units
///
/// A failing unit produces no output; the collector remembers why so the
/// host can skip it and keep going, then report everything together.
///
/// ```ignore
/// let mut errors = BatchErrors::new();
/// for file in inputs {
///     errors.set_file_context(file.display().to_string());
///     if let Err(e) = codegen.generate(&unit) {
///         errors.add((&e).into());
///     }
/// }
/// if errors.has_errors() {
///     return Err(errors.into());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchErrors {
    entries: Vec<ErrorEntry>,
    file_context: Option<String>,
}

impl BatchErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current input file for subsequent errors
    pub fn set_file_context(&mut self, file: impl Into<String>) {
        self.file_context = Some(file.into());
    }

    pub fn clear_context(&mut self) {
        self.file_context = None;
    }

    /// Add an error with the current context
    pub fn add(&mut self, mut entry: ErrorEntry) {
        if entry.location.file.is_none() {
            entry.location.file = self.file_context.clone();
        }
        self.entries.push(entry);
    }

    pub fn add_error(&mut self, category: ErrorCategory, message: impl Into<String>) {
        self.add(ErrorEntry::new(category, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn by_category(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Format errors as a summary report, grouped by category
    pub fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No errors".to_string();
        }

        let mut by_category: std::collections::BTreeMap<ErrorCategory, Vec<&ErrorEntry>> =
            std::collections::BTreeMap::new();
        for entry in &self.entries {
            by_category.entry(entry.category).or_default().push(entry);
        }

        let mut lines = Vec::new();
        lines.push(format!("Found {} error(s):", self.entries.len()));
        lines.push(String::new());

        for (category, entries) in by_category {
            lines.push(format!("## {} ({} errors):", category, entries.len()));
            for entry in entries.iter().take(10) {
                lines.push(format!("  - {}", entry));
            }
            if entries.len() > 10 {
                lines.push(format!("  ... and {} more", entries.len() - 10));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl From<BatchErrors> for CodegenError {
    fn from(errors: BatchErrors) -> Self {
        CodegenError::Batch {
            count: errors.count(),
            summary: errors.format_summary(),
        }
    }
}

impl fmt::Display for BatchErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}
