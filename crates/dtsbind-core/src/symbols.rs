//! Symbol table of previously declared identifiers
//!
//! The table is filled once per translation unit, before translation starts,
//! and is read-only afterwards.

use crate::ir::Declaration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declaration kind recorded for an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Class,
    /// Named type that is not a class (interface, alias)
    Type,
    Variable,
    Unknown,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Class => write!(f, "class"),
            SymbolKind::Type => write!(f, "type"),
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of looking an identifier up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Found(SymbolKind),
    Unresolved,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: BTreeMap<String, SymbolKind>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`. A class entry replaces any other kind (declaration
    /// merging pairs a class with an interface of the same name); otherwise
    /// the first recorded kind is kept.
    pub fn declare(&mut self, name: impl Into<String>, kind: SymbolKind) {
        let name = name.into();
        match self.entries.get(&name) {
            Some(existing) if *existing == kind => {}
            Some(_) if kind == SymbolKind::Class => {
                self.entries.insert(name, kind);
            }
            Some(existing) => {
                tracing::trace!("keeping {} entry for '{}' over {}", existing, name, kind);
            }
            None => {
                self.entries.insert(name, kind);
            }
        }
    }

    pub fn with(mut self, name: impl Into<String>, kind: SymbolKind) -> Self {
        self.declare(name, kind);
        self
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        match self.entries.get(name) {
            Some(kind) => Resolution::Found(*kind),
            None => Resolution::Unresolved,
        }
    }

    pub fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.entries.get(name).copied()
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.kind_of(name) == Some(SymbolKind::Class)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolKind)> {
        self.entries.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Build the table from every declaration reachable from `root`
    pub fn collect(root: &Declaration) -> Self {
        let mut table = Self::new();
        table.collect_into(root);
        tracing::debug!("collected {} symbols", table.len());
        table
    }

    fn collect_into(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Class { name, .. } => self.declare(name, SymbolKind::Class),
            Declaration::Interface { name, .. } | Declaration::TypeAlias { name, .. } => {
                self.declare(name, SymbolKind::Type)
            }
            Declaration::Variable { name, .. }
            | Declaration::Function { name, .. }
            | Declaration::Export { name, .. }
            | Declaration::Component { name, .. } => self.declare(name, SymbolKind::Variable),
            Declaration::Module { body, .. } => {
                for child in body {
                    self.collect_into(child);
                }
            }
            Declaration::Import { names, .. } => {
                for name in names {
                    self.declare(name, SymbolKind::Unknown);
                }
            }
            Declaration::Noop | Declaration::Ignored { .. } => {}
        }
    }
}

impl FromIterator<(String, SymbolKind)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (String, SymbolKind)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, kind) in iter {
            table.declare(name, kind);
        }
        table
    }
}
