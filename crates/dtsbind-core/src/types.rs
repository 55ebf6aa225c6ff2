//! Type-expression model using algebraic data types
//!
//! Every type a declaration can mention is one variant of [`TypeExpr`]. The
//! set is closed: generators match on it exhaustively so a new shape fails to
//! build until every consumer handles it.

use serde::{Deserialize, Serialize};

/// Core type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    /// Primitive types
    Regex,
    Unit,
    Null,
    Any,
    String,
    Number,
    Boolean,
    Date,

    /// Structural record with ordered fields
    Object(Vec<ObjectField>),

    /// Anonymous function signature
    Function(FunctionType),

    Array(Box<TypeExpr>),

    /// Homogeneous string-keyed map
    Dict(Box<TypeExpr>),

    Tuple(Vec<TypeExpr>),

    Promise(Box<TypeExpr>),

    /// Nominal reference, possibly generic and qualified by a module
    Reference(TypeRef),

    /// Class body. Only standalone classes are supported; a superclass is an error.
    Class(ClassType),

    /// Sum type
    Union(Vec<TypeExpr>),

    /// Literal string, legal only as a union member
    StringLiteral(String),

    /// Type of a previously declared identifier
    Typeof(Box<TypeExpr>),

    /// Field or parameter that may be omitted
    Optional(Box<TypeExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectField {
    pub name: String,
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub params: Vec<Param>,
    /// Rest parameter; boxed since `Param` holds a `TypeExpr`
    #[serde(default)]
    pub rest: Option<Box<Param>>,
    #[serde(default)]
    pub type_params: Vec<String>,
    pub ret: Box<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    /// Enclosing module qualifier, e.g. `React` for `React.ReactNode`
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub args: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassMember {
    pub name: String,
    pub ty: TypeExpr,
}

impl TypeExpr {
    pub fn array(inner: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(inner))
    }

    pub fn dict(inner: TypeExpr) -> Self {
        TypeExpr::Dict(Box::new(inner))
    }

    pub fn promise(inner: TypeExpr) -> Self {
        TypeExpr::Promise(Box::new(inner))
    }

    pub fn optional(inner: TypeExpr) -> Self {
        TypeExpr::Optional(Box::new(inner))
    }

    pub fn type_of(inner: TypeExpr) -> Self {
        TypeExpr::Typeof(Box::new(inner))
    }

    pub fn literal(value: impl Into<String>) -> Self {
        TypeExpr::StringLiteral(value.into())
    }

    /// Unqualified, non-generic reference
    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Reference(TypeRef::new(name))
    }

    /// Literal values of a union whose members are all string literals.
    ///
    /// Returns `None` for anything else, including an empty union.
    pub fn string_literals(&self) -> Option<Vec<&str>> {
        let TypeExpr::Union(members) = self else {
            return None;
        };
        if members.is_empty() {
            return None;
        }
        members
            .iter()
            .map(|m| match m {
                TypeExpr::StringLiteral(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_string_literal_union(&self) -> bool {
        self.string_literals().is_some()
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeExpr::Optional(_))
    }

    /// Peel one `Optional` layer, reporting whether one was present
    pub fn strip_optional(&self) -> (&TypeExpr, bool) {
        match self {
            TypeExpr::Optional(inner) => (inner, true),
            other => (other, false),
        }
    }

    /// `Boolean` or `Optional(Boolean)`
    pub fn is_boolean_flag(&self) -> bool {
        matches!(self.strip_optional().0, TypeExpr::Boolean)
    }
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.ty.is_optional()
    }
}

impl ObjectField {
    pub fn new(name: impl Into<String>, ty: TypeExpr, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
        }
    }

    pub fn required(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self::new(name, ty, false)
    }
}

impl FunctionType {
    pub fn new(params: Vec<Param>, ret: TypeExpr) -> Self {
        Self {
            params,
            rest: None,
            type_params: Vec::new(),
            ret: Box::new(ret),
        }
    }

    pub fn with_rest(mut self, rest: Param) -> Self {
        self.rest = Some(Box::new(rest));
        self
    }

    pub fn with_type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.rest.is_some()
    }

    /// Same signature with every parameter name blanked
    pub fn anonymized(&self) -> Self {
        let blank = |p: &Param| Param::new("", p.ty.clone());
        Self {
            params: self.params.iter().map(blank).collect(),
            rest: self.rest.as_deref().map(blank).map(Box::new),
            type_params: self.type_params.clone(),
            ret: self.ret.clone(),
        }
    }
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            args: Vec::new(),
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_args(mut self, args: Vec<TypeExpr>) -> Self {
        self.args = args;
        self
    }
}

impl ClassType {
    pub fn new(members: Vec<ClassMember>) -> Self {
        Self {
            superclass: None,
            members,
        }
    }

    /// The member named `constructor`, if the class declares one
    pub fn constructor(&self) -> Option<&ClassMember> {
        self.members.iter().find(|m| m.name == "constructor")
    }
}

impl ClassMember {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_literal_union_detection() {
        let enumerated = TypeExpr::Union(vec![TypeExpr::literal("a"), TypeExpr::literal("b")]);
        assert_eq!(enumerated.string_literals(), Some(vec!["a", "b"]));
        assert!(enumerated.is_string_literal_union());

        let mixed = TypeExpr::Union(vec![TypeExpr::literal("a"), TypeExpr::Number]);
        assert!(!mixed.is_string_literal_union());

        assert!(!TypeExpr::Union(vec![]).is_string_literal_union());
        assert!(!TypeExpr::literal("a").is_string_literal_union());
    }

    #[test]
    fn test_boolean_flag() {
        assert!(TypeExpr::Boolean.is_boolean_flag());
        assert!(TypeExpr::optional(TypeExpr::Boolean).is_boolean_flag());
        assert!(!TypeExpr::optional(TypeExpr::String).is_boolean_flag());
        assert!(!TypeExpr::array(TypeExpr::Boolean).is_boolean_flag());
    }

    #[test]
    fn test_anonymized_keeps_types() {
        let sig = FunctionType::new(vec![Param::new("x", TypeExpr::Number)], TypeExpr::Unit)
            .with_rest(Param::new("rest", TypeExpr::String))
            .with_type_params(["T"]);
        let anon = sig.anonymized();

        assert!(anon.params.iter().all(|p| p.name.is_empty()));
        assert_eq!(anon.rest.as_ref().map(|p| p.name.as_str()), Some(""));
        assert_eq!(anon.params[0].ty, TypeExpr::Number);
        assert_eq!(anon.type_params, vec!["T".to_string()]);
    }

    #[test]
    fn test_serde_shape() {
        let ty = TypeExpr::array(TypeExpr::reference("Foo"));
        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);

        // Optional fields of the model may be left out of hand-written input
        let parsed: TypeExpr = serde_json::from_str(r#"{"Reference": {"name": "Foo"}}"#).unwrap();
        assert_eq!(parsed, TypeExpr::reference("Foo"));
    }
}
