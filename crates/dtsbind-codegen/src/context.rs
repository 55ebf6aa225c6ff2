//! Name resolution context threaded through every translation call

use crate::error::{CodegenError, ShapeError};
use dtsbind_core::{Resolution, SymbolKind, SymbolTable};

/// In-scope type parameters plus the unit's symbol table.
///
/// A context is never mutated: functions and classes that introduce type
/// parameters derive an extended copy with [`Context::with_type_params`].
#[derive(Debug, Clone)]
pub struct Context<'a> {
    symbols: &'a SymbolTable,
    type_params: Vec<String>,
}

impl<'a> Context<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            type_params: Vec::new(),
        }
    }

    /// Context with `params` added to the in-scope type parameters
    pub fn with_type_params(&self, params: &[String]) -> Self {
        let mut type_params = self.type_params.clone();
        for param in params {
            if !type_params.contains(param) {
                type_params.push(param.clone());
            }
        }
        Self {
            symbols: self.symbols,
            type_params,
        }
    }

    pub fn is_type_param(&self, name: &str) -> bool {
        self.type_params.iter().any(|p| p == name)
    }

    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.symbols.is_class(name)
    }

    /// Require `name` to be a class in the symbol table
    pub fn expect_class(&self, name: &str) -> Result<(), CodegenError> {
        match self.symbols.resolve(name) {
            Resolution::Found(SymbolKind::Class) => Ok(()),
            Resolution::Found(kind) => Err(ShapeError::WrongSymbolKind {
                name: name.to_string(),
                kind,
            }
            .into()),
            Resolution::Unresolved => Err(CodegenError::UnresolvedIdentifier(name.to_string())),
        }
    }
}
