//! Declarations and translation units handed over by the declaration parser

use crate::error::CoreError;
use crate::symbols::SymbolTable;
use crate::types::{FunctionType, TypeExpr};
use serde::{Deserialize, Serialize};

/// One top-level (or module-nested) declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    Noop,
    /// Statement the parser recognized but that carries no type information
    Ignored {
        text: String,
    },
    Variable {
        name: String,
        ty: TypeExpr,
    },
    Function {
        name: String,
        signature: FunctionType,
    },
    /// `export =` / `export default` of a value
    Export {
        name: String,
        ty: TypeExpr,
    },
    Module {
        name: String,
        body: Vec<Declaration>,
    },
    TypeAlias {
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        ty: TypeExpr,
    },
    Class {
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        body: TypeExpr,
    },
    Interface {
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
        body: TypeExpr,
    },
    Import {
        path: String,
        #[serde(default)]
        names: Vec<String>,
    },
    /// Declaration recognized as a UI component taking a props object
    Component {
        name: String,
        props: TypeExpr,
    },
}

impl Declaration {
    /// Declared identifier, if the declaration introduces one
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Variable { name, .. }
            | Declaration::Function { name, .. }
            | Declaration::Export { name, .. }
            | Declaration::Module { name, .. }
            | Declaration::TypeAlias { name, .. }
            | Declaration::Class { name, .. }
            | Declaration::Interface { name, .. }
            | Declaration::Component { name, .. } => Some(name),
            Declaration::Noop | Declaration::Ignored { .. } | Declaration::Import { .. } => None,
        }
    }

    /// Reject named declarations whose name is empty, recursing into modules
    pub fn check_names(&self) -> Result<(), CoreError> {
        if let Some(name) = self.name() {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidDeclaration(format!(
                    "{} without a name",
                    self.kind_label()
                )));
            }
        }
        if let Declaration::Module { body, .. } = self {
            for child in body {
                child.check_names()?;
            }
        }
        Ok(())
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Declaration::Noop => "no-op",
            Declaration::Ignored { .. } => "ignored statement",
            Declaration::Variable { .. } => "variable",
            Declaration::Function { .. } => "function",
            Declaration::Export { .. } => "export",
            Declaration::Module { .. } => "module",
            Declaration::TypeAlias { .. } => "type alias",
            Declaration::Class { .. } => "class",
            Declaration::Interface { .. } => "interface",
            Declaration::Import { .. } => "import",
            Declaration::Component { .. } => "component",
        }
    }

    pub fn module(name: impl Into<String>, body: Vec<Declaration>) -> Self {
        Declaration::Module {
            name: name.into(),
            body,
        }
    }

    pub fn variable(name: impl Into<String>, ty: TypeExpr) -> Self {
        Declaration::Variable {
            name: name.into(),
            ty,
        }
    }

    pub fn function(name: impl Into<String>, signature: FunctionType) -> Self {
        Declaration::Function {
            name: name.into(),
            signature,
        }
    }
}

/// Input of one translation: a root declaration and the identifiers it may reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub root: Declaration,
    /// Populated by the parser; collected from `root` when absent
    #[serde(default)]
    pub symbols: Option<SymbolTable>,
}

impl TranslationUnit {
    pub fn new(root: Declaration) -> Self {
        Self {
            root,
            symbols: None,
        }
    }

    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        let unit: TranslationUnit = serde_json::from_str(input)?;
        unit.root.check_names()?;
        if matches!(unit.root, Declaration::Noop) {
            tracing::debug!("translation unit has an empty root");
        }
        Ok(unit)
    }

    /// The supplied symbol table, or one collected from the declarations
    pub fn resolved_symbols(&self) -> SymbolTable {
        match &self.symbols {
            Some(table) => table.clone(),
            None => SymbolTable::collect(&self.root),
        }
    }
}

/// Output of one translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledUnit {
    /// Enclosing module identifier; empty when the unit has no module
    pub module_id: String,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolKind;
    use crate::types::Param;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declaration_name() {
        let decl = Declaration::function(
            "parse",
            FunctionType::new(vec![Param::new("s", TypeExpr::String)], TypeExpr::Number),
        );
        assert_eq!(decl.name(), Some("parse"));
        assert_eq!(Declaration::Noop.name(), None);
        assert_eq!(
            Declaration::Import {
                path: "react".to_string(),
                names: vec![]
            }
            .name(),
            None
        );
    }

    #[test]
    fn test_unit_from_json_collects_symbols() {
        let input = r#"{
            "root": {
                "Module": {
                    "name": "\"widgets\"",
                    "body": [
                        {"Class": {"name": "Widget", "body": {"Class": {"members": []}}}},
                        {"Variable": {"name": "version", "ty": "String"}}
                    ]
                }
            }
        }"#;
        let unit = TranslationUnit::from_json(input).unwrap();
        assert!(unit.symbols.is_none());

        let symbols = unit.resolved_symbols();
        assert_eq!(symbols.kind_of("Widget"), Some(SymbolKind::Class));
        assert_eq!(symbols.kind_of("version"), Some(SymbolKind::Variable));
    }

    #[test]
    fn test_unit_from_json_rejects_unnamed_declarations() {
        let input = r#"{"root": {"Module": {"name": "m", "body": [{"Variable": {"name": " ", "ty": "Number"}}]}}}"#;
        let err = TranslationUnit::from_json(input).unwrap_err();
        assert_eq!(err.to_string(), "Invalid declaration: variable without a name");
    }

    #[test]
    fn test_unit_from_json_rejects_garbage() {
        let err = TranslationUnit::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }
}
