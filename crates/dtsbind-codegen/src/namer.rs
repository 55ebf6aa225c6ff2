//! Canonical short names for type expressions
//!
//! A canonical name is derived from the shape of a type alone. It names the
//! declarations synthesized for lifted unions and tags union members, so it
//! must be deterministic and must not depend on any context.

use crate::error::{CodegenError, ShapeError};
use crate::string_enum::StringEnum;
use dtsbind_core::naming::{sanitize_identifier, to_camel_case, to_pascal_case};
use dtsbind_core::types::{TypeExpr, TypeRef};

/// Canonical name of `ty`, e.g. `number_or_string` or `array_dict_date`
pub fn canonical_name(ty: &TypeExpr) -> Result<String, CodegenError> {
    name_of(ty, false)
}

/// Canonical name with its first letter capitalized, used as a variant tag
pub fn tag_name(ty: &TypeExpr) -> Result<String, CodegenError> {
    Ok(to_pascal_case(&canonical_name(ty)?))
}

/// A union nested inside another shape is prefixed with `union<N>_` so that
/// `array(number | string)` and `array(number) | string` stay distinct.
fn name_of(ty: &TypeExpr, nested: bool) -> Result<String, CodegenError> {
    match ty {
        TypeExpr::Regex => Ok("regex".to_string()),
        TypeExpr::Unit => Ok("unit".to_string()),
        TypeExpr::Null => Ok("null".to_string()),
        TypeExpr::Any => Ok("any".to_string()),
        TypeExpr::String => Ok("string".to_string()),
        TypeExpr::Number => Ok("number".to_string()),
        TypeExpr::Boolean => Ok("bool".to_string()),
        TypeExpr::Date => Ok("date".to_string()),
        TypeExpr::Function(_) => Ok("func".to_string()),
        TypeExpr::Object(_) => Ok("object".to_string()),

        TypeExpr::Array(inner) => Ok(format!("array_{}", name_of(inner, true)?)),
        TypeExpr::Dict(inner) => Ok(format!("dict_{}", name_of(inner, true)?)),
        TypeExpr::Promise(inner) => Ok(format!("promise_{}", name_of(inner, true)?)),
        TypeExpr::Typeof(inner) => Ok(format!("typeof_{}", name_of(inner, true)?)),
        TypeExpr::Optional(inner) => Ok(format!("option_{}", name_of(inner, true)?)),

        TypeExpr::Tuple(members) => Ok(format!("tuple_of_{}", joined(members, "_")?)),

        TypeExpr::Reference(reference) => reference_name(reference),

        TypeExpr::Union(members) if members.is_empty() => Ok("unit".to_string()),
        TypeExpr::Union(members) => match ty.string_literals() {
            Some(literals) => Ok(StringEnum::new(literals).canonical_name()),
            None if nested => Ok(format!("union{}_{}", members.len(), joined(members, "_or_")?)),
            None => joined(members, "_or_"),
        },

        TypeExpr::Class(_) => Err(ShapeError::UnnameableClass.into()),
        TypeExpr::StringLiteral(value) => {
            Err(ShapeError::UnnameableStringLiteral(value.clone()).into())
        }
    }
}

fn joined(members: &[TypeExpr], separator: &str) -> Result<String, CodegenError> {
    let names = members
        .iter()
        .map(|m| name_of(m, true))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.join(separator))
}

/// Names of shapes other than references; a reference spelled the same way
/// is prefixed with `ref_`
const SHAPE_NAMES: &[&str] = &[
    "regex", "unit", "null", "any", "string", "number", "bool", "date", "func", "object",
];

fn reference_name(reference: &TypeRef) -> Result<String, CodegenError> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(module) = &reference.module {
        parts.extend(
            module
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| to_camel_case(&sanitize_identifier(s))),
        );
    }
    let base = to_camel_case(&sanitize_identifier(&reference.name));
    if parts.is_empty() && SHAPE_NAMES.contains(&base.as_str()) {
        parts.push(format!("ref_{}", base));
    } else {
        parts.push(base);
    }
    let mut name = parts.join("_");

    if !reference.args.is_empty() {
        name.push_str("_of_");
        name.push_str(&joined(&reference.args, "_")?);
    }
    Ok(name)
}
