//! Declaration-level translation into Reason bindings

use crate::component::{self, ComponentTranslator};
use crate::config::CodegenConfig;
use crate::context::Context;
use crate::error::{CodegenError, ShapeError};
use crate::module_path::{ModulePath, Specifier};
use crate::precode::PrecodeGenerator;
use crate::render::{type_variable, TypeRenderer};
use crate::template::Template;
use dtsbind_core::naming::{normalize_module_name, normalize_type_name};
use dtsbind_core::types::{ClassType, FunctionType, TypeExpr, TypeRef};
use dtsbind_core::{Declaration, Resolution, SymbolKind};
use tracing::{debug, instrument, trace, warn};

/// Translates declarations of one compiled unit.
///
/// Holds the unit's [`PrecodeGenerator`] and opens a precode scope for every
/// nested module, so a lifted union is declared once per visible scope.
pub struct DeclarationTranslator<'c> {
    renderer: TypeRenderer<'c>,
    components: ComponentTranslator<'c>,
    precode: PrecodeGenerator<'c>,
    config: &'c CodegenConfig,
}

impl<'c> DeclarationTranslator<'c> {
    pub fn new(config: &'c CodegenConfig) -> Self {
        Self {
            renderer: TypeRenderer::new(config),
            components: ComponentTranslator::new(config),
            precode: PrecodeGenerator::new(config),
            config,
        }
    }

    /// Precode for `decl` followed by its own templates
    pub fn translate_with_precode(
        &mut self,
        decl: &Declaration,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Vec<Template>, CodegenError> {
        let mut templates = self.precode.generate(decl, path, ctx)?;
        templates.extend(self.translate(decl, path, ctx)?);
        Ok(templates)
    }

    #[instrument(skip_all, level = "debug", fields(kind = decl.kind_label(), name = decl.name()))]
    pub fn translate(
        &mut self,
        decl: &Declaration,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Vec<Template>, CodegenError> {
        if let Some(props) = component::detect(decl, self.config) {
            let name = decl.name().unwrap_or_default();
            return Ok(vec![self.components.translate(name, props, path, ctx)?]);
        }

        match decl {
            Declaration::Variable { name, ty } | Declaration::Export { name, ty } => match ty {
                TypeExpr::Typeof(target) => Ok(vec![self.export_class(name, target, ctx)?]),
                other => Ok(vec![self.external(name, other, path, ctx)?]),
            },
            Declaration::Function { name, signature } => {
                Ok(vec![self.function(name, signature, path, ctx)?])
            }
            Declaration::Module { name, body } => Ok(vec![self.module(name, body, path, ctx)?]),
            Declaration::TypeAlias {
                name,
                type_params,
                ty,
            }
            | Declaration::Interface {
                name,
                type_params,
                body: ty,
            } => {
                let inner = ctx.with_type_params(type_params);
                Ok(vec![Template::TypeDecl {
                    name: normalize_type_name(name),
                    params: type_params.iter().map(|p| type_variable(p)).collect(),
                    body: self.renderer.render(ty, &inner)?,
                }])
            }
            Declaration::Class {
                name,
                type_params,
                body,
            } => Ok(vec![self.class(name, type_params, body, path, ctx)?]),
            Declaration::Component { name, props } => {
                Ok(vec![self.components.translate(name, props, path, ctx)?])
            }
            Declaration::Import { .. } | Declaration::Noop | Declaration::Ignored { .. } => {
                trace!(kind = decl.kind_label(), "nothing to bind");
                Ok(Vec::new())
            }
        }
    }

    fn external(
        &self,
        name: &str,
        ty: &TypeExpr,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Template, CodegenError> {
        if let TypeExpr::Function(signature) = ty {
            return self.function(name, signature, path, ctx);
        }
        Ok(Template::External {
            attributes: path.binding_attributes(),
            name: normalize_type_name(name),
            ty: self.renderer.render(ty, ctx)?,
            js_name: name.to_string(),
        })
    }

    fn function(
        &self,
        name: &str,
        signature: &FunctionType,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Template, CodegenError> {
        let mut attributes = path.binding_attributes();
        if signature.is_variadic() {
            attributes.push("[@bs.variadic]".to_string());
        }
        Ok(Template::External {
            attributes,
            name: normalize_type_name(name),
            ty: self.renderer.render_function(signature, ctx)?.to_string(),
            js_name: name.to_string(),
        })
    }

    /// `export default typeof Foo` or `const W: typeof Foo` re-exports the
    /// class constructor
    fn export_class(
        &self,
        name: &str,
        target: &TypeExpr,
        ctx: &Context<'_>,
    ) -> Result<Template, CodegenError> {
        let TypeExpr::Reference(reference) = target else {
            return Err(ShapeError::TypeofMisplaced.into());
        };
        match ctx.symbols().resolve(&reference.name) {
            Resolution::Found(SymbolKind::Class) => Ok(Template::LetAlias {
                name: normalize_type_name(name),
                target: format!("{}.make", normalize_module_name(&reference.name)),
            }),
            Resolution::Found(kind) => Err(ShapeError::TypeofNotClass {
                name: reference.name.clone(),
                kind,
            }
            .into()),
            Resolution::Unresolved => Err(CodegenError::UnresolvedIdentifier(reference.name.clone())),
        }
    }

    fn module(
        &mut self,
        name: &str,
        body: &[Declaration],
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Template, CodegenError> {
        let inner = path.enter(name);
        self.precode.enter_scope();
        let children = self.translate_body(body, &inner, ctx);
        self.precode.exit_scope();
        let children = children?;

        match Specifier::parse(name) {
            Some(Specifier {
                module_id,
                submodule: Some(submodule),
                ..
            }) => Ok(Template::Module {
                name: normalize_module_name(&module_id),
                body: vec![Template::Module {
                    name: submodule,
                    body: children,
                }],
            }),
            Some(specifier) => Ok(Template::Module {
                name: normalize_module_name(&specifier.module_id),
                body: children,
            }),
            None => Ok(Template::Module {
                name: normalize_module_name(name),
                body: children,
            }),
        }
    }

    /// Declarations of one module body, each preceded by its precode
    pub fn translate_body(
        &mut self,
        body: &[Declaration],
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Vec<Template>, CodegenError> {
        let mut templates = Vec::new();
        for decl in body {
            templates.extend(self.translate_with_precode(decl, path, ctx)?);
        }
        Ok(templates)
    }

    fn class(
        &self,
        name: &str,
        type_params: &[String],
        body: &TypeExpr,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Template, CodegenError> {
        ctx.expect_class(name)?;
        let TypeExpr::Class(class) = body else {
            return Err(ShapeError::NotAClass {
                name: name.to_string(),
            }
            .into());
        };

        let inner = ctx.with_type_params(type_params);
        let object = self.renderer.render_class(class, &inner)?;
        let constructor = self.constructor(name, class, type_params)?;

        Ok(Template::Module {
            name: normalize_module_name(name),
            body: vec![
                Template::TypeDecl {
                    name: "t".to_string(),
                    params: type_params.iter().map(|p| type_variable(p)).collect(),
                    body: object.to_string(),
                },
                Template::External {
                    attributes: path.constructor_attributes(),
                    name: "make".to_string(),
                    ty: self.renderer.render_function(&constructor, &inner)?.to_string(),
                    js_name: name.to_string(),
                },
            ],
        })
    }

    /// Constructor signature returning `t(...)`.
    ///
    /// A declared constructor keeps its parameter types with names blanked
    /// and returns `t` applied to its own type parameters. Without one, a
    /// nullary constructor returning `t` of the class's parameters is made up.
    fn constructor(
        &self,
        name: &str,
        class: &ClassType,
        type_params: &[String],
    ) -> Result<FunctionType, CodegenError> {
        let declared = class.constructor().map(|member| member.ty.strip_optional().0);
        match declared {
            Some(TypeExpr::Function(signature)) => {
                let mut constructor = signature.anonymized();
                constructor.ret = Box::new(instance_type(&signature.type_params));
                Ok(constructor)
            }
            other => {
                if other.is_some() {
                    warn!(class = name, "constructor member is not a function, synthesizing one");
                }
                debug!(class = name, "synthesizing nullary constructor");
                Ok(FunctionType::new(Vec::new(), instance_type(type_params)))
            }
        }
    }
}

/// `t` applied to `params` as type variables
fn instance_type(params: &[String]) -> TypeExpr {
    TypeExpr::Reference(
        TypeRef::new("t").with_args(params.iter().map(TypeExpr::reference).collect()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Printer;
    use dtsbind_core::types::{ClassMember, ObjectField, Param};
    use dtsbind_core::SymbolTable;
    use pretty_assertions::assert_eq;

    fn translate_all(decls: &[Declaration], symbols: &SymbolTable) -> Result<String, CodegenError> {
        let config = CodegenConfig::default();
        let ctx = Context::new(symbols);
        let path = ModulePath::global();
        let mut translator = DeclarationTranslator::new(&config);
        let mut templates = Vec::new();
        for decl in decls {
            templates.extend(translator.translate_with_precode(decl, &path, &ctx)?);
        }
        Ok(Printer::default().print(&templates))
    }

    fn widget(members: Vec<ClassMember>, type_params: Vec<String>) -> Declaration {
        Declaration::Class {
            name: "Widget".to_string(),
            type_params,
            body: TypeExpr::Class(ClassType::new(members)),
        }
    }

    #[test]
    fn test_variables_and_functions() {
        let decls = vec![
            Declaration::variable("version", TypeExpr::String),
            Declaration::function(
                "log",
                FunctionType::new(vec![Param::new("message", TypeExpr::String)], TypeExpr::Unit)
                    .with_rest(Param::new("args", TypeExpr::Any)),
            ),
        ];
        assert_eq!(
            translate_all(&decls, &SymbolTable::new()).unwrap(),
            "[@bs.val] external version: string = \"version\";\n\
             [@bs.val] [@bs.variadic] external log: (~message: string, array(Js.Json.t)) => unit = \"log\";\n"
        );
    }

    #[test]
    fn test_type_alias_and_interface() {
        let decls = vec![
            Declaration::TypeAlias {
                name: "Size".to_string(),
                type_params: vec![],
                ty: TypeExpr::Union(vec![TypeExpr::Number, TypeExpr::String]),
            },
            Declaration::Interface {
                name: "Box".to_string(),
                type_params: vec!["T".to_string()],
                body: TypeExpr::Object(vec![ObjectField::required("value", TypeExpr::reference("T"))]),
            },
        ];
        assert_eq!(
            translate_all(&decls, &SymbolTable::new()).unwrap(),
            "type number_or_string = [ | `Number(float) | `String(string)];\n\
             type size = number_or_string;\n\
             type box('t) = {. \"value\": 't};\n"
        );
    }

    #[test]
    fn test_class_with_synthesized_constructor() {
        let decl = widget(
            vec![ClassMember::new("value", TypeExpr::reference("T"))],
            vec!["T".to_string()],
        );
        let symbols = SymbolTable::new().with("Widget", SymbolKind::Class);
        assert_eq!(
            translate_all(&[decl], &symbols).unwrap(),
            "module Widget = {\n  \
               type t('t) = {. \"value\": 't};\n  \
               [@bs.new] external make: unit => t('t) = \"Widget\";\n\
             };\n"
        );
    }

    #[test]
    fn test_class_with_declared_constructor() {
        let constructor = FunctionType::new(
            vec![
                Param::new("label", TypeExpr::String),
                Param::new("initial", TypeExpr::reference("U")),
            ],
            TypeExpr::Unit,
        )
        .with_type_params(["U"]);
        let decl = widget(
            vec![ClassMember::new("constructor", TypeExpr::Function(constructor))],
            vec![],
        );
        let symbols = SymbolTable::new().with("Widget", SymbolKind::Class);
        assert_eq!(
            translate_all(&[decl], &symbols).unwrap(),
            "module Widget = {\n  \
               type t = Js.t({.});\n  \
               [@bs.new] external make: (string, 'u) => t('u) = \"Widget\";\n\
             };\n"
        );
    }

    #[test]
    fn test_class_symbol_checks() {
        let decl = widget(vec![], vec![]);
        assert_eq!(
            translate_all(&[decl.clone()], &SymbolTable::new()),
            Err(CodegenError::UnresolvedIdentifier("Widget".to_string()))
        );

        let symbols = SymbolTable::new().with("Widget", SymbolKind::Type);
        assert_eq!(
            translate_all(&[decl], &symbols),
            Err(CodegenError::TypeShape(ShapeError::WrongSymbolKind {
                name: "Widget".to_string(),
                kind: SymbolKind::Type,
            }))
        );

        let not_a_class = Declaration::Class {
            name: "Widget".to_string(),
            type_params: vec![],
            body: TypeExpr::Object(vec![]),
        };
        let symbols = SymbolTable::new().with("Widget", SymbolKind::Class);
        assert_eq!(
            translate_all(&[not_a_class], &symbols),
            Err(CodegenError::TypeShape(ShapeError::NotAClass {
                name: "Widget".to_string()
            }))
        );
    }

    #[test]
    fn test_typeof_exports() {
        let export = Declaration::Export {
            name: "default".to_string(),
            ty: TypeExpr::type_of(TypeExpr::reference("Widget")),
        };
        let classes = SymbolTable::new().with("Widget", SymbolKind::Class);
        assert_eq!(
            translate_all(&[export.clone()], &classes).unwrap(),
            "let default = Widget.make;\n"
        );

        assert_eq!(
            translate_all(&[export.clone()], &SymbolTable::new()),
            Err(CodegenError::UnresolvedIdentifier("Widget".to_string()))
        );

        let variables = SymbolTable::new().with("Widget", SymbolKind::Variable);
        assert_eq!(
            translate_all(&[export], &variables),
            Err(CodegenError::TypeShape(ShapeError::TypeofNotClass {
                name: "Widget".to_string(),
                kind: SymbolKind::Variable,
            }))
        );

        let variable = Declaration::variable("W", TypeExpr::type_of(TypeExpr::reference("Widget")));
        assert_eq!(
            translate_all(&[variable.clone()], &classes).unwrap(),
            "let w = Widget.make;\n"
        );
        assert_eq!(
            translate_all(&[variable], &SymbolTable::new().with("Widget", SymbolKind::Type)),
            Err(CodegenError::TypeShape(ShapeError::TypeofNotClass {
                name: "Widget".to_string(),
                kind: SymbolKind::Type,
            }))
        );

        let misplaced = Declaration::Export {
            name: "size".to_string(),
            ty: TypeExpr::type_of(TypeExpr::Number),
        };
        assert_eq!(
            translate_all(&[misplaced], &classes),
            Err(CodegenError::TypeShape(ShapeError::TypeofMisplaced))
        );
    }

    #[test]
    fn test_nested_modules() {
        let decl = Declaration::module(
            "\"geometry\"",
            vec![Declaration::module(
                "Shapes",
                vec![Declaration::variable(
                    "unit",
                    TypeExpr::Union(vec![TypeExpr::Number, TypeExpr::String]),
                )],
            )],
        );
        assert_eq!(
            translate_all(&[decl], &SymbolTable::new()).unwrap(),
            "module Geometry = {\n  \
               module Shapes = {\n    \
                 type number_or_string = [ | `Number(float) | `String(string)];\n    \
                 [@bs.module \"geometry\"] [@bs.scope \"Shapes\"] external unit: number_or_string = \"unit\";\n  \
               };\n\
             };\n"
        );
    }

    #[test]
    fn test_nested_specifier_keeps_its_submodule() {
        let decl = Declaration::module(
            "Root",
            vec![
                Declaration::module("\"lodash\"", vec![Declaration::variable("VERSION", TypeExpr::String)]),
                Declaration::module("\"lodash/fp\"", vec![Declaration::variable("VERSION", TypeExpr::String)]),
            ],
        );
        assert_eq!(
            translate_all(&[decl], &SymbolTable::new()).unwrap(),
            "module Root = {\n  \
               module Lodash = {\n    \
                 [@bs.module \"lodash\"] external vERSION: string = \"VERSION\";\n  \
               };\n  \
               module Lodash = {\n    \
                 module Fp = {\n      \
                   [@bs.module \"lodash/fp\"] external vERSION: string = \"VERSION\";\n    \
                 };\n  \
               };\n\
             };\n"
        );
    }

    #[test]
    fn test_sibling_modules_declare_their_own_unions() {
        let size = TypeExpr::Union(vec![TypeExpr::Number, TypeExpr::String]);
        let decls = vec![
            Declaration::module("Grid", vec![Declaration::variable("gap", size.clone())]),
            Declaration::module("Flex", vec![Declaration::variable("gap", size.clone())]),
            Declaration::variable("top", size),
        ];
        assert_eq!(
            translate_all(&decls, &SymbolTable::new()).unwrap(),
            "module Grid = {\n  \
               type number_or_string = [ | `Number(float) | `String(string)];\n  \
               [@bs.val] [@bs.scope \"Grid\"] external gap: number_or_string = \"gap\";\n\
             };\n\
             module Flex = {\n  \
               type number_or_string = [ | `Number(float) | `String(string)];\n  \
               [@bs.val] [@bs.scope \"Flex\"] external gap: number_or_string = \"gap\";\n\
             };\n\
             type number_or_string = [ | `Number(float) | `String(string)];\n\
             [@bs.val] external top: number_or_string = \"top\";\n"
        );
    }

    #[test]
    fn test_skipped_declarations() {
        let decls = vec![
            Declaration::Noop,
            Declaration::Ignored {
                text: "declare global {}".to_string(),
            },
            Declaration::Import {
                path: "react".to_string(),
                names: vec!["ReactElement".to_string()],
            },
        ];
        assert_eq!(translate_all(&decls, &SymbolTable::new()).unwrap(), "");
    }
}
