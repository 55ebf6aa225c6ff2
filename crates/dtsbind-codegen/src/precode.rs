//! Declarations that must precede a translated declaration
//!
//! Reason has no anonymous sum types, so every union in a plain position is
//! lifted into a named polymorphic variant declared ahead of its first use.
//! Object call signatures likewise become standalone `_apply` externals.

use std::collections::{BTreeSet, HashMap};

use crate::component;
use crate::config::CodegenConfig;
use crate::context::Context;
use crate::error::CodegenError;
use crate::module_path::ModulePath;
use crate::namer::{canonical_name, tag_name};
use crate::render::TypeRenderer;
use crate::template::{Template, TypeTemplate};
use dtsbind_core::naming::normalize_type_name;
use dtsbind_core::types::{FunctionType, ObjectField, TypeExpr};
use dtsbind_core::Declaration;
use tracing::{debug, warn};

/// Lifts unions and call signatures for one compiled unit.
///
/// A declaration is skipped when one of the same name is already visible:
/// emitted earlier in the current module or in an enclosing one. Sibling
/// modules cannot see each other's declarations, so each gets its own.
pub struct PrecodeGenerator<'c> {
    config: &'c CodegenConfig,
    renderer: TypeRenderer<'c>,
    current: Scope,
    enclosing: Vec<Scope>,
}

/// Declarations emitted directly inside one module body
#[derive(Debug, Default)]
struct Scope {
    /// Lifted union name to its rendered body
    lifted: HashMap<String, String>,
    externals: BTreeSet<String>,
}

/// Everything the walk needs besides the type under inspection
struct Walk<'a, 'b> {
    ctx: &'a Context<'b>,
    path: &'a ModulePath,
    owner: &'a str,
}

impl<'c> PrecodeGenerator<'c> {
    pub fn new(config: &'c CodegenConfig) -> Self {
        Self {
            config,
            renderer: TypeRenderer::new(config),
            current: Scope::default(),
            enclosing: Vec::new(),
        }
    }

    /// Start the body of a nested module
    pub fn enter_scope(&mut self) {
        self.enclosing.push(std::mem::take(&mut self.current));
    }

    /// Leave a nested module; its declarations go out of scope
    pub fn exit_scope(&mut self) {
        self.current = self.enclosing.pop().unwrap_or_default();
    }

    fn visible(&self) -> impl Iterator<Item = &Scope> {
        std::iter::once(&self.current).chain(self.enclosing.iter().rev())
    }

    /// Precode for `decl`, innermost declarations first
    pub fn generate(
        &mut self,
        decl: &Declaration,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Vec<Template>, CodegenError> {
        let mut out = Vec::new();

        if let Some(props) = component::detect(decl, self.config) {
            if let TypeExpr::Object(fields) = props {
                let walk = Walk {
                    ctx,
                    path,
                    owner: decl.name().unwrap_or_default(),
                };
                self.walk_params(fields.iter().map(|f| &f.ty), &walk, &mut out)?;
            }
            return Ok(out);
        }

        match decl {
            Declaration::Variable { name, ty } | Declaration::Export { name, ty } => {
                let walk = Walk { ctx, path, owner: name };
                self.walk(ty, &walk, &mut out)?;
            }
            Declaration::Function { name, signature } => {
                let walk = Walk { ctx, path, owner: name };
                self.walk_function(signature, &walk, &mut out)?;
            }
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
                let ctx = ctx.with_type_params(type_params);
                let walk = Walk {
                    ctx: &ctx,
                    path,
                    owner: anonymous_owner(path, name),
                };
                self.walk(ty, &walk, &mut out)?;
            }
            Declaration::Class {
                name,
                type_params,
                body,
            } => {
                let ctx = ctx.with_type_params(type_params);
                let walk = Walk {
                    ctx: &ctx,
                    path,
                    owner: name,
                };
                self.walk(body, &walk, &mut out)?;
            }
            Declaration::Component { name, props } => {
                if let TypeExpr::Object(fields) = props.strip_optional().0 {
                    let walk = Walk { ctx, path, owner: name };
                    self.walk_params(fields.iter().map(|f| &f.ty), &walk, &mut out)?;
                }
            }
            Declaration::Module { .. }
            | Declaration::Import { .. }
            | Declaration::Noop
            | Declaration::Ignored { .. } => {}
        }
        Ok(out)
    }

    fn walk(&mut self, ty: &TypeExpr, walk: &Walk<'_, '_>, out: &mut Vec<Template>) -> Result<(), CodegenError> {
        match ty {
            TypeExpr::Object(fields) => self.walk_object(fields, walk, out),
            TypeExpr::Function(function) => self.walk_function(function, walk, out),
            TypeExpr::Array(inner)
            | TypeExpr::Dict(inner)
            | TypeExpr::Optional(inner)
            | TypeExpr::Promise(inner) => self.walk(inner, walk, out),
            TypeExpr::Tuple(members) => {
                for member in members {
                    self.walk(member, walk, out)?;
                }
                Ok(())
            }
            TypeExpr::Reference(reference) => {
                for arg in &reference.args {
                    self.walk(arg, walk, out)?;
                }
                Ok(())
            }
            TypeExpr::Class(class) => {
                for member in &class.members {
                    self.walk(&member.ty, walk, out)?;
                }
                Ok(())
            }
            TypeExpr::Union(members) => {
                if members.is_empty() || ty.is_string_literal_union() {
                    return Ok(());
                }
                for member in members {
                    self.walk(member, walk, out)?;
                }
                self.lift(ty, walk.ctx, out)
            }
            TypeExpr::Regex
            | TypeExpr::Unit
            | TypeExpr::Null
            | TypeExpr::Any
            | TypeExpr::String
            | TypeExpr::Number
            | TypeExpr::Boolean
            | TypeExpr::Date
            | TypeExpr::StringLiteral(_)
            | TypeExpr::Typeof(_) => Ok(()),
        }
    }

    fn walk_object(
        &mut self,
        fields: &[ObjectField],
        walk: &Walk<'_, '_>,
        out: &mut Vec<Template>,
    ) -> Result<(), CodegenError> {
        for field in fields {
            if field.name == self.config.call_signature_field {
                if let TypeExpr::Function(signature) = field.ty.strip_optional().0 {
                    self.walk_function(signature, walk, out)?;
                    self.call_signature(signature, walk, out)?;
                    continue;
                }
            }
            self.walk(&field.ty, walk, out)?;
        }
        Ok(())
    }

    fn walk_function(
        &mut self,
        function: &FunctionType,
        walk: &Walk<'_, '_>,
        out: &mut Vec<Template>,
    ) -> Result<(), CodegenError> {
        let ctx = walk.ctx.with_type_params(&function.type_params);
        let inner = Walk {
            ctx: &ctx,
            path: walk.path,
            owner: walk.owner,
        };
        self.walk_params(function.params.iter().map(|p| &p.ty), &inner, out)?;
        if let Some(rest) = &function.rest {
            self.walk(&rest.ty, &inner, out)?;
        }
        self.walk(&function.ret, &inner, out)
    }

    /// Unions that are themselves parameter types render inline, so neither
    /// they nor their members are lifted.
    fn walk_params<'t>(
        &mut self,
        params: impl Iterator<Item = &'t TypeExpr>,
        walk: &Walk<'_, '_>,
        out: &mut Vec<Template>,
    ) -> Result<(), CodegenError> {
        for ty in params {
            let ty = ty.strip_optional().0;
            if !matches!(ty, TypeExpr::Union(_)) {
                self.walk(ty, walk, out)?;
            }
        }
        Ok(())
    }

    fn lift(&mut self, union: &TypeExpr, ctx: &Context<'_>, out: &mut Vec<Template>) -> Result<(), CodegenError> {
        let TypeExpr::Union(members) = union else {
            return Ok(());
        };
        let name = canonical_name(union)?;
        let cases = members
            .iter()
            .map(|m| Ok((tag_name(m)?, self.renderer.render(m, ctx)?)))
            .collect::<Result<Vec<_>, CodegenError>>()?;
        let body = TypeTemplate::Variants {
            attribute: None,
            cases,
        }
        .to_string();

        if let Some(existing) = self.visible().find_map(|scope| scope.lifted.get(&name)) {
            if *existing != body {
                warn!(
                    union = %name,
                    kept = %existing,
                    dropped = %body,
                    "dropping union with the same canonical name but a different rendering"
                );
            }
            return Ok(());
        }

        debug!(union = %name, "lifting union");
        self.current.lifted.insert(name.clone(), body.clone());
        out.push(Template::TypeDecl {
            name,
            params: Vec::new(),
            body,
        });
        Ok(())
    }

    fn call_signature(
        &mut self,
        signature: &FunctionType,
        walk: &Walk<'_, '_>,
        out: &mut Vec<Template>,
    ) -> Result<(), CodegenError> {
        let name = format!("{}_apply", normalize_type_name(walk.owner));
        if self.visible().any(|scope| scope.externals.contains(&name)) {
            return Ok(());
        }
        self.current.externals.insert(name.clone());

        let mut attributes = walk.path.binding_attributes();
        if signature.is_variadic() {
            attributes.push("[@bs.variadic]".to_string());
        }
        debug!(external = %name, "binding call signature");
        out.push(Template::External {
            attributes,
            name,
            ty: self.renderer.render_function(signature, walk.ctx)?.to_string(),
            js_name: walk.owner.to_string(),
        });
        Ok(())
    }
}

/// Interfaces and aliases are not values, so their call signatures belong to
/// the enclosing module. Globals fall back to the declaration name.
fn anonymous_owner<'a>(path: &'a ModulePath, name: &'a str) -> &'a str {
    if path.module_id.is_empty() {
        name
    } else {
        &path.module_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Printer;
    use dtsbind_core::types::{ClassMember, ClassType, Param};
    use dtsbind_core::SymbolTable;
    use pretty_assertions::assert_eq;

    fn precode(decls: &[Declaration], path: &ModulePath) -> String {
        let config = CodegenConfig::default();
        let symbols = SymbolTable::new();
        let ctx = Context::new(&symbols);
        let mut generator = PrecodeGenerator::new(&config);
        let mut templates = Vec::new();
        for decl in decls {
            templates.extend(generator.generate(decl, path, &ctx).unwrap());
        }
        Printer::default().print(&templates)
    }

    fn number_or_string() -> TypeExpr {
        TypeExpr::Union(vec![TypeExpr::Number, TypeExpr::String])
    }

    #[test]
    fn test_plain_field_union_is_lifted_once() {
        let decl = Declaration::variable(
            "config",
            TypeExpr::Object(vec![
                ObjectField::required("width", number_or_string()),
                ObjectField::required("height", number_or_string()),
            ]),
        );
        assert_eq!(
            precode(&[decl], &ModulePath::global()),
            "type number_or_string = [ | `Number(float) | `String(string)];\n"
        );
    }

    #[test]
    fn test_unions_are_redeclared_outside_their_scope() {
        let config = CodegenConfig::default();
        let symbols = SymbolTable::new();
        let ctx = Context::new(&symbols);
        let path = ModulePath::global();
        let decl = Declaration::variable("size", number_or_string());
        let mut generator = PrecodeGenerator::new(&config);

        assert_eq!(generator.generate(&decl, &path, &ctx).unwrap().len(), 1);

        // Visible from a nested module
        generator.enter_scope();
        assert!(generator.generate(&decl, &path, &ctx).unwrap().is_empty());
        generator.exit_scope();

        // A sibling's declaration is not
        let mut generator = PrecodeGenerator::new(&config);
        generator.enter_scope();
        assert_eq!(generator.generate(&decl, &path, &ctx).unwrap().len(), 1);
        generator.exit_scope();
        generator.enter_scope();
        assert_eq!(generator.generate(&decl, &path, &ctx).unwrap().len(), 1);
        generator.exit_scope();
        assert_eq!(generator.generate(&decl, &path, &ctx).unwrap().len(), 1);
        assert!(generator.generate(&decl, &path, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_string_literal_unions_yield_nothing() {
        let decl = Declaration::variable(
            "align",
            TypeExpr::Union(vec![TypeExpr::literal("a"), TypeExpr::literal("b")]),
        );
        assert_eq!(precode(&[decl], &ModulePath::global()), "");
    }

    #[test]
    fn test_nested_unions_come_first() {
        let inner = number_or_string();
        let outer = TypeExpr::Union(vec![TypeExpr::array(inner), TypeExpr::Boolean]);
        let decl = Declaration::variable("values", outer);
        assert_eq!(
            precode(&[decl], &ModulePath::global()),
            "type number_or_string = [ | `Number(float) | `String(string)];\n\
             type array_union2_number_or_string_or_bool = \
             [ | `Array_union2_number_or_string(array(number_or_string)) | `Bool(bool)];\n"
        );
    }

    #[test]
    fn test_parameter_unions_are_not_lifted() {
        let signature = FunctionType::new(
            vec![Param::new("value", number_or_string())],
            TypeExpr::array(TypeExpr::Union(vec![TypeExpr::Boolean, TypeExpr::Date])),
        );
        assert_eq!(
            precode(&[Declaration::function("coerce", signature)], &ModulePath::global()),
            "type bool_or_date = [ | `Bool(bool) | `Date(Js.Date.t)];\n"
        );
    }

    #[test]
    fn test_variadic_function_has_no_precode() {
        let signature = FunctionType::new(vec![Param::new("x", TypeExpr::Number)], TypeExpr::Unit)
            .with_rest(Param::new("rest", TypeExpr::String));
        assert_eq!(
            precode(&[Declaration::function("log", signature)], &ModulePath::global()),
            ""
        );
    }

    #[test]
    fn test_constructor_signature_is_walked() {
        let class = ClassType::new(vec![ClassMember::new(
            "constructor",
            TypeExpr::Function(FunctionType::new(
                vec![Param::new("options", TypeExpr::Object(vec![ObjectField::required(
                    "size",
                    number_or_string(),
                )]))],
                TypeExpr::Unit,
            )),
        )]);
        let decl = Declaration::Class {
            name: "Widget".to_string(),
            type_params: vec![],
            body: TypeExpr::Class(class),
        };
        assert_eq!(
            precode(&[decl], &ModulePath::global()),
            "type number_or_string = [ | `Number(float) | `String(string)];\n"
        );
    }

    #[test]
    fn test_call_signature_binding() {
        let callable = TypeExpr::Object(vec![
            ObjectField::required(
                "__call",
                TypeExpr::Function(FunctionType::new(
                    vec![Param::new("input", TypeExpr::String)],
                    TypeExpr::Number,
                )),
            ),
            ObjectField::required("version", TypeExpr::String),
        ]);
        let interface = Declaration::Interface {
            name: "Parser".to_string(),
            type_params: vec![],
            body: callable.clone(),
        };
        let path = ModulePath::global().enter("\"parse\"");
        assert_eq!(
            precode(&[interface], &path),
            "[@bs.module \"parse\"] external parse_apply: (~input: string) => float = \"parse\";\n"
        );

        let variable = Declaration::variable("parseNumber", callable);
        assert_eq!(
            precode(&[variable], &ModulePath::global()),
            "[@bs.val] external parseNumber_apply: (~input: string) => float = \"parseNumber\";\n"
        );
    }
}
