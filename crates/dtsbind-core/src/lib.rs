//! Core type-expression model, declarations and symbol table for dtsbind

pub mod error;
pub mod ir;
pub mod naming;
pub mod symbols;
pub mod types;

pub use error::CoreError;
pub use ir::{CompiledUnit, Declaration, TranslationUnit};
pub use symbols::{Resolution, SymbolKind, SymbolTable};
pub use types::TypeExpr;
