//! Whole-unit translation

use crate::config::CodegenConfig;
use crate::context::Context;
use crate::declaration::DeclarationTranslator;
use crate::error::CodegenError;
use crate::module_path::{ModulePath, Specifier};
use crate::template::{Printer, Template};
use crate::Codegen;
use dtsbind_core::{CompiledUnit, Declaration, TranslationUnit};
use tracing::{debug, instrument};

/// Generates Reason/BuckleScript bindings for translation units
#[derive(Debug, Clone, Default)]
pub struct ReasonCodegen {
    config: CodegenConfig,
}

impl ReasonCodegen {
    pub fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }
}

impl Codegen for ReasonCodegen {
    #[instrument(skip_all, fields(root = unit.root.name()))]
    fn generate(&self, unit: &TranslationUnit) -> Result<CompiledUnit, CodegenError> {
        let symbols = unit.resolved_symbols();
        let ctx = Context::new(&symbols);
        let mut translator = DeclarationTranslator::new(&self.config);

        let (module_id, templates) = match &unit.root {
            Declaration::Module { name, body } => match Specifier::parse(name) {
                Some(specifier) => {
                    let path = ModulePath::import(&specifier);
                    let mut templates = translator.translate_body(body, &path, &ctx)?;
                    if let Some(submodule) = specifier.submodule.clone() {
                        templates = vec![Template::Module {
                            name: submodule,
                            body: templates,
                        }];
                    }
                    (specifier.module_id, templates)
                }
                None => (
                    String::new(),
                    translator.translate_with_precode(&unit.root, &ModulePath::global(), &ctx)?,
                ),
            },
            other => (
                String::new(),
                translator.translate_with_precode(other, &ModulePath::global(), &ctx)?,
            ),
        };

        let source = Printer::new(self.config.indent_size).print(&templates);
        debug!(module = %module_id, bytes = source.len(), "generated unit");
        Ok(CompiledUnit { module_id, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtsbind_core::types::TypeExpr;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_specifier_root() {
        let unit = TranslationUnit::new(Declaration::module(
            "\"lodash/fp\"",
            vec![Declaration::variable("VERSION", TypeExpr::String)],
        ));
        let compiled = ReasonCodegen::default().generate(&unit).unwrap();

        assert_eq!(compiled.module_id, "lodash");
        assert_eq!(
            compiled.source,
            "module Fp = {\n  [@bs.module \"lodash/fp\"] external vERSION: string = \"VERSION\";\n};\n"
        );
    }

    #[test]
    fn test_plain_root() {
        let unit = TranslationUnit::new(Declaration::variable("answer", TypeExpr::Number));
        let compiled = ReasonCodegen::default().generate(&unit).unwrap();

        assert_eq!(compiled.module_id, "");
        assert_eq!(compiled.source, "[@bs.val] external answer: float = \"answer\";\n");
    }

    #[test]
    fn test_errors_abort_the_unit() {
        let unit = TranslationUnit::new(Declaration::module(
            "\"broken\"",
            vec![
                Declaration::variable("fine", TypeExpr::String),
                Declaration::variable("bad", TypeExpr::literal("x")),
            ],
        ));
        assert!(ReasonCodegen::default().generate(&unit).is_err());
    }
}
