//! UI component bindings
//!
//! A function taking a single props object and returning a UI element is
//! bound as a component module: the JS class, a `[@bs.obj]` props builder
//! and a `make` function wrapping both for the component runtime.

use crate::config::CodegenConfig;
use crate::context::Context;
use crate::error::{CodegenError, ShapeError};
use crate::module_path::ModulePath;
use crate::render::TypeRenderer;
use crate::template::{ParamTemplate, Template, TypeTemplate};
use dtsbind_core::naming::{normalize_field_name, normalize_module_name};
use dtsbind_core::types::{FunctionType, ObjectField, TypeExpr};
use dtsbind_core::Declaration;
use tracing::debug;

/// One prop of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropSpec {
    /// Label as it appears in Reason
    pub name: String,
    pub ty: String,
    pub optional: bool,
    /// Boolean props default to `false` instead of being forwarded optionally
    pub flag: bool,
}

/// The props of a variable or function that should be bound as a component
pub fn detect<'d>(decl: &'d Declaration, config: &CodegenConfig) -> Option<&'d TypeExpr> {
    let signature = match decl {
        Declaration::Function { signature, .. } => signature,
        Declaration::Variable { ty, .. } | Declaration::Export { ty, .. } => match ty {
            TypeExpr::Function(signature) => signature,
            _ => return None,
        },
        _ => return None,
    };
    component_props(signature, config)
}

fn component_props<'f>(signature: &'f FunctionType, config: &CodegenConfig) -> Option<&'f TypeExpr> {
    let [param] = signature.params.as_slice() else {
        return None;
    };
    if signature.rest.is_some() {
        return None;
    }
    let returns_element = match signature.ret.as_ref() {
        TypeExpr::Reference(reference) => config.is_component_return(&reference.name),
        _ => false,
    };
    let props = param.ty.strip_optional().0;
    (returns_element && matches!(props, TypeExpr::Object(_))).then_some(props)
}

pub struct ComponentTranslator<'c> {
    config: &'c CodegenConfig,
    renderer: TypeRenderer<'c>,
}

impl<'c> ComponentTranslator<'c> {
    pub fn new(config: &'c CodegenConfig) -> Self {
        Self {
            config,
            renderer: TypeRenderer::new(config),
        }
    }

    pub fn props(
        &self,
        name: &str,
        props: &TypeExpr,
        ctx: &Context<'_>,
    ) -> Result<Vec<PropSpec>, CodegenError> {
        let TypeExpr::Object(fields) = props.strip_optional().0 else {
            return Err(ShapeError::ComponentPropsNotObject {
                name: name.to_string(),
            }
            .into());
        };
        fields
            .iter()
            .filter(|f| f.name != self.config.call_signature_field)
            .map(|field| self.prop(field, ctx))
            .collect()
    }

    fn prop(&self, field: &ObjectField, ctx: &Context<'_>) -> Result<PropSpec, CodegenError> {
        let (inner, wrapped) = field.ty.strip_optional();
        Ok(PropSpec {
            name: normalize_field_name(&field.name),
            ty: self.renderer.render_param_type(inner, ctx)?,
            optional: field.optional || wrapped,
            flag: field.ty.is_boolean_flag(),
        })
    }

    pub fn translate(
        &self,
        name: &str,
        props: &TypeExpr,
        path: &ModulePath,
        ctx: &Context<'_>,
    ) -> Result<Template, CodegenError> {
        let props = self.props(name, props, ctx)?;
        debug!(component = name, props = props.len(), "binding component");
        let runtime = &self.config.component_runtime;

        let react_class = Template::External {
            attributes: path.binding_attributes(),
            name: "reactClass".to_string(),
            ty: format!("{}.reactClass", runtime),
            js_name: name.to_string(),
        };

        let mut builder_params: Vec<ParamTemplate> = props
            .iter()
            .map(|p| ParamTemplate {
                label: Some(p.name.clone()),
                ty: p.ty.clone(),
                optional: p.optional || p.flag,
            })
            .collect();
        builder_params.push(ParamTemplate::positional("unit"));
        let make_props = Template::External {
            attributes: Vec::new(),
            name: "makeProps".to_string(),
            ty: TypeTemplate::Function {
                params: builder_params,
                ret: "_".to_string(),
            }
            .to_string(),
            js_name: String::new(),
        };

        let mut make_params = Vec::with_capacity(props.len() + 1);
        let mut forwarded = Vec::with_capacity(props.len() + 1);
        for prop in &props {
            if prop.flag {
                make_params.push(format!("~{}=false", prop.name));
                forwarded.push(format!("~{}", prop.name));
            } else if prop.optional {
                make_params.push(format!("~{}=?", prop.name));
                forwarded.push(format!("~{}?", prop.name));
            } else {
                make_params.push(format!("~{}", prop.name));
                forwarded.push(format!("~{}", prop.name));
            }
        }
        make_params.push("children".to_string());
        forwarded.push("()".to_string());

        let make = Template::Let {
            name: "make".to_string(),
            params: make_params,
            body: format!(
                "{}.wrapJsForReason(~reactClass, ~props=makeProps({}), children)",
                runtime,
                forwarded.join(", ")
            ),
        };

        Ok(Template::Module {
            name: normalize_module_name(name),
            body: vec![
                react_class,
                Template::Raw("[@bs.obj]".to_string()),
                make_props,
                make,
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Printer;
    use dtsbind_core::types::{Param, TypeRef};
    use dtsbind_core::SymbolTable;
    use pretty_assertions::assert_eq;

    fn button_props() -> TypeExpr {
        TypeExpr::Object(vec![
            ObjectField::required("label", TypeExpr::String),
            ObjectField::new("size", TypeExpr::Number, true),
            ObjectField::new("disabled", TypeExpr::Boolean, true),
        ])
    }

    #[test]
    fn test_detect_component_functions() {
        let config = CodegenConfig::default();
        let signature = FunctionType::new(
            vec![Param::new("props", button_props())],
            TypeExpr::Reference(TypeRef::new("ReactElement").in_module("React")),
        );
        let decl = Declaration::function("Button", signature.clone());
        assert_eq!(detect(&decl, &config), Some(&button_props()));

        let as_variable = Declaration::variable("Button", TypeExpr::Function(signature));
        assert!(detect(&as_variable, &config).is_some());

        let plain = Declaration::function(
            "render",
            FunctionType::new(vec![Param::new("props", button_props())], TypeExpr::Unit),
        );
        assert_eq!(detect(&plain, &config), None);
    }

    #[test]
    fn test_prop_specs() {
        let config = CodegenConfig::default();
        let symbols = SymbolTable::new();
        let props = ComponentTranslator::new(&config)
            .props("Button", &button_props(), &Context::new(&symbols))
            .unwrap();

        assert_eq!(
            props,
            vec![
                PropSpec {
                    name: "label".to_string(),
                    ty: "string".to_string(),
                    optional: false,
                    flag: false,
                },
                PropSpec {
                    name: "size".to_string(),
                    ty: "float".to_string(),
                    optional: true,
                    flag: false,
                },
                PropSpec {
                    name: "disabled".to_string(),
                    ty: "bool".to_string(),
                    optional: true,
                    flag: true,
                },
            ]
        );
    }

    #[test]
    fn test_component_module() {
        let config = CodegenConfig::default();
        let symbols = SymbolTable::new();
        let path = ModulePath::global().enter("\"ui\"");
        let template = ComponentTranslator::new(&config)
            .translate("Button", &button_props(), &path, &Context::new(&symbols))
            .unwrap();

        assert_eq!(
            Printer::default().print(&[template]),
            r#"module Button = {
  [@bs.module "ui"] external reactClass: ReasonReact.reactClass = "Button";
  [@bs.obj]
  external makeProps: (~label: string, ~size: float=?, ~disabled: bool=?, unit) => _ = "";
  let make = (~label, ~size=?, ~disabled=false, children) =>
    ReasonReact.wrapJsForReason(~reactClass, ~props=makeProps(~label, ~size?, ~disabled, ()), children);
};
"#
        );
    }

    #[test]
    fn test_props_must_be_an_object() {
        let config = CodegenConfig::default();
        let symbols = SymbolTable::new();
        let result = ComponentTranslator::new(&config).translate(
            "Button",
            &TypeExpr::String,
            &ModulePath::global(),
            &Context::new(&symbols),
        );
        assert_eq!(
            result,
            Err(CodegenError::TypeShape(ShapeError::ComponentPropsNotObject {
                name: "Button".to_string()
            }))
        );
    }
}
