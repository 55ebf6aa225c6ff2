//! Where a declaration lives in JavaScript, and the binding attributes that follow

use crate::template::quote;
use dtsbind_core::naming::{normalize_module_name, to_pascal_case};

/// Import root plus namespace scopes of the declarations being translated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePath {
    /// Module specifier for `[@bs.module]`; `None` binds globals with `[@bs.val]`
    pub import: Option<String>,
    /// Namespaces between the import root and the declaration
    pub scopes: Vec<String>,
    /// Identifier naming anonymous owners such as interface call signatures
    pub module_id: String,
}

/// A module specifier token such as `"lodash/fp"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    /// Full import path with quotes removed
    pub path: String,
    /// First path segment, e.g. `lodash`
    pub module_id: String,
    /// Segments after the first, capitalized and concatenated, e.g. `Fp`
    pub submodule: Option<String>,
}

impl Specifier {
    /// Parse a quoted module name; unquoted names are namespaces, not specifiers
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let quoted: &[char] = &['"', '\''];
        if !name.starts_with(quoted) {
            return None;
        }
        let path = name.trim_matches(quoted);
        if path.is_empty() {
            return None;
        }

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let module_id = segments.next().unwrap_or(path).to_string();
        let submodule: String = segments.map(to_pascal_case).collect();

        Some(Self {
            path: path.to_string(),
            module_id,
            submodule: (!submodule.is_empty()).then(|| normalize_module_name(&submodule)),
        })
    }
}

impl ModulePath {
    /// Path for globals
    pub fn global() -> Self {
        Self::default()
    }

    pub fn import(specifier: &Specifier) -> Self {
        Self {
            import: Some(specifier.path.clone()),
            scopes: Vec::new(),
            module_id: specifier.module_id.clone(),
        }
    }

    /// Path of the children of a `Module` declaration named `name`
    pub fn enter(&self, name: &str) -> Self {
        match Specifier::parse(name) {
            Some(specifier) => Self::import(&specifier),
            None => {
                let mut scopes = self.scopes.clone();
                scopes.push(name.to_string());
                Self {
                    import: self.import.clone(),
                    scopes,
                    module_id: name.to_string(),
                }
            }
        }
    }

    /// `[@bs.module "x"]` or `[@bs.val]`, then any `[@bs.scope]`
    pub fn binding_attributes(&self) -> Vec<String> {
        let mut attributes = vec![match &self.import {
            Some(import) => format!("[@bs.module {}]", quote(import)),
            None => "[@bs.val]".to_string(),
        }];
        attributes.extend(self.scope_attribute());
        attributes
    }

    /// Attributes following `[@bs.new]`, which needs no `[@bs.val]`
    pub fn constructor_attributes(&self) -> Vec<String> {
        let mut attributes = vec!["[@bs.new]".to_string()];
        if let Some(import) = &self.import {
            attributes.push(format!("[@bs.module {}]", quote(import)));
        }
        attributes.extend(self.scope_attribute());
        attributes
    }

    fn scope_attribute(&self) -> Option<String> {
        match self.scopes.as_slice() {
            [] => None,
            [single] => Some(format!("[@bs.scope {}]", quote(single))),
            many => {
                let quoted: Vec<String> = many.iter().map(|s| quote(s)).collect();
                Some(format!("[@bs.scope ({})]", quoted.join(", ")))
            }
        }
    }
}
