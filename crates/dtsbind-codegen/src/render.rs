//! Type expression to Reason type text
//!
//! Rendering never emits declarations. A union in a plain position renders as
//! its canonical name and relies on the precode generator having lifted it;
//! the two walk the same positions.

use crate::config::CodegenConfig;
use crate::context::Context;
use crate::error::{CodegenError, ShapeError};
use crate::namer::{canonical_name, tag_name};
use crate::string_enum::StringEnum;
use crate::template::{FieldTemplate, ParamTemplate, TypeTemplate};
use dtsbind_core::naming::{normalize_field_name, normalize_module_name, normalize_type_name};
use dtsbind_core::types::{ClassType, FunctionType, ObjectField, TypeExpr, TypeRef};

pub struct TypeRenderer<'c> {
    config: &'c CodegenConfig,
}

impl<'c> TypeRenderer<'c> {
    pub fn new(config: &'c CodegenConfig) -> Self {
        Self { config }
    }

    /// Reason text for `ty` in a plain (non-parameter) position
    pub fn render(&self, ty: &TypeExpr, ctx: &Context<'_>) -> Result<String, CodegenError> {
        match ty {
            TypeExpr::Regex => Ok("Js.Re.t".to_string()),
            TypeExpr::Unit => Ok("unit".to_string()),
            TypeExpr::Null => Ok("Js.null(unit)".to_string()),
            TypeExpr::Any => Ok("Js.Json.t".to_string()),
            TypeExpr::String => Ok("string".to_string()),
            TypeExpr::Number => Ok("float".to_string()),
            TypeExpr::Boolean => Ok("bool".to_string()),
            TypeExpr::Date => Ok("Js.Date.t".to_string()),

            TypeExpr::Array(inner) => self.applied("array", inner, ctx),
            TypeExpr::Dict(inner) => self.applied("Js.Dict.t", inner, ctx),
            TypeExpr::Promise(inner) => self.applied("Js.Promise.t", inner, ctx),
            TypeExpr::Optional(inner) => self.render(inner, ctx),

            TypeExpr::Tuple(members) => {
                let members = members
                    .iter()
                    .map(|m| self.render(m, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeTemplate::Tuple(members).to_string())
            }

            TypeExpr::Reference(reference) => self.render_reference(reference, ctx),

            TypeExpr::Union(members) if members.is_empty() => Ok("unit".to_string()),
            TypeExpr::Union(_) => match ty.string_literals() {
                Some(literals) => Ok(StringEnum::new(literals).type_text()),
                None => canonical_name(ty),
            },

            TypeExpr::Object(fields) => Ok(self.render_object(fields, ctx)?.to_string()),
            TypeExpr::Class(class) => Ok(self.render_class(class, ctx)?.to_string()),
            TypeExpr::Function(function) => Ok(self.render_function(function, ctx)?.to_string()),

            TypeExpr::StringLiteral(value) => {
                Err(ShapeError::StringLiteralOutsideUnion(value.clone()).into())
            }
            TypeExpr::Typeof(_) => Err(ShapeError::TypeofMisplaced.into()),
        }
    }

    fn applied(&self, head: &str, inner: &TypeExpr, ctx: &Context<'_>) -> Result<String, CodegenError> {
        Ok(TypeTemplate::applied(head, vec![self.render(inner, ctx)?]).to_string())
    }

    fn render_reference(&self, reference: &TypeRef, ctx: &Context<'_>) -> Result<String, CodegenError> {
        let args = reference
            .args
            .iter()
            .map(|a| self.render(a, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if reference.module.is_none() {
            if args.is_empty() && ctx.is_type_param(&reference.name) {
                return Ok(type_variable(&reference.name));
            }
            if ctx.is_class(&reference.name) {
                let head = format!("{}.t", normalize_module_name(&reference.name));
                return Ok(TypeTemplate::applied(head, args).to_string());
            }
        }

        let mut head = String::new();
        if let Some(module) = &reference.module {
            for segment in module.split('.').filter(|s| !s.is_empty()) {
                head.push_str(&normalize_module_name(segment));
                head.push('.');
            }
        }
        head.push_str(&normalize_type_name(&reference.name));
        Ok(TypeTemplate::applied(head, args).to_string())
    }

    /// Parameter positions encode unions inline instead of by name:
    /// string-literal unions as `[@bs.string]` enums, others as
    /// `[@bs.unwrap]` variants tagged by their members' canonical names.
    pub fn render_param_type(&self, ty: &TypeExpr, ctx: &Context<'_>) -> Result<String, CodegenError> {
        if let Some(literals) = ty.string_literals() {
            return Ok(format!("[@bs.string] {}", StringEnum::new(literals).type_text()));
        }
        match ty {
            TypeExpr::Union(members) if !members.is_empty() => {
                let cases = members
                    .iter()
                    .map(|m| Ok((tag_name(m)?, self.render(m, ctx)?)))
                    .collect::<Result<Vec<_>, CodegenError>>()?;
                Ok(TypeTemplate::Variants {
                    attribute: Some("[@bs.unwrap]"),
                    cases,
                }
                .to_string())
            }
            other => self.render(other, ctx),
        }
    }

    pub fn render_function(
        &self,
        function: &FunctionType,
        ctx: &Context<'_>,
    ) -> Result<TypeTemplate, CodegenError> {
        let ctx = ctx.with_type_params(&function.type_params);
        let mut params = Vec::with_capacity(function.params.len() + 2);
        let mut any_optional = false;

        for (index, param) in function.params.iter().enumerate() {
            let (inner, optional) = param.ty.strip_optional();
            let ty = self.render_param_type(inner, &ctx)?;
            let blank = param.name.trim().is_empty();
            any_optional |= optional;

            let label = match (blank, optional) {
                (true, false) => None,
                (true, true) => Some(format!("arg{}", index)),
                (false, _) => Some(normalize_field_name(&param.name)),
            };
            params.push(ParamTemplate { label, ty, optional });
        }

        match &function.rest {
            Some(rest) => {
                let element = self.render(rest.ty.strip_optional().0, &ctx)?;
                params.push(ParamTemplate::positional(format!("array({})", element)));
            }
            None if any_optional => params.push(ParamTemplate::positional("unit")),
            None => {}
        }

        let ret = self.render(&function.ret, &ctx)?;
        Ok(TypeTemplate::Function { params, ret })
    }

    pub fn render_object(
        &self,
        fields: &[ObjectField],
        ctx: &Context<'_>,
    ) -> Result<TypeTemplate, CodegenError> {
        let fields = fields
            .iter()
            .filter(|f| f.name != self.config.call_signature_field)
            .map(|field| {
                let (inner, wrapped) = field.ty.strip_optional();
                Ok(FieldTemplate {
                    name: normalize_field_name(&field.name),
                    ty: self.render(inner, ctx)?,
                    optional: field.optional || wrapped,
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;
        Ok(TypeTemplate::Object(fields))
    }

    /// Object type for a class body; the constructor is rendered separately
    pub fn render_class(&self, class: &ClassType, ctx: &Context<'_>) -> Result<TypeTemplate, CodegenError> {
        if class.superclass.is_some() {
            return Err(ShapeError::SuperclassUnsupported.into());
        }

        let mut fields = Vec::with_capacity(class.members.len());
        for member in class.members.iter().filter(|m| m.name != "constructor") {
            let (inner, optional) = member.ty.strip_optional();
            let ty = match inner {
                TypeExpr::Function(method) => TypeTemplate::Method {
                    generics: method.type_params.iter().map(|p| type_variable(p)).collect(),
                    function: Box::new(self.render_function(&method.anonymized(), ctx)?),
                }
                .to_string(),
                other => self.render(other, ctx)?,
            };
            fields.push(FieldTemplate {
                name: normalize_field_name(&member.name),
                ty,
                optional,
            });
        }
        Ok(TypeTemplate::Object(fields))
    }
}

/// `'t` for a type parameter named `T`
pub fn type_variable(name: &str) -> String {
    format!("'{}", normalize_type_name(name))
}
