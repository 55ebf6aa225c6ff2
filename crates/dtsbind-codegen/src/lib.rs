//! Reason/BuckleScript binding generation for dtsbind translation units

pub mod component;
pub mod config;
pub mod context;
pub mod declaration;
pub mod error;
pub mod module_path;
pub mod namer;
pub mod precode;
pub mod program;
pub mod render;
pub mod string_enum;
pub mod template;

use dtsbind_core::{CompiledUnit, TranslationUnit};

pub use config::CodegenConfig;
pub use context::Context;
pub use error::{BatchErrors, CodegenError, ErrorCategory, ErrorLocation, ShapeError};
pub use module_path::ModulePath;
pub use program::ReasonCodegen;

/// Common trait for all code generators
pub trait Codegen {
    fn generate(&self, unit: &TranslationUnit) -> Result<CompiledUnit, CodegenError>;
}
