//! Configuration for Reason code generation

use serde::{Deserialize, Serialize};

/// Configuration for Reason code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Spaces per nesting level in generated modules
    pub indent_size: usize,
    /// Object field name the parser uses to mark a call signature
    pub call_signature_field: String,
    /// Return type names that mark a props-taking function as a UI component
    pub component_return_types: Vec<String>,
    /// Module providing `reactClass` and `wrapJsForReason`
    pub component_runtime: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent_size: 2,
            call_signature_field: "__call".to_string(),
            component_return_types: vec![
                "ReactElement".to_string(),
                "Element".to_string(),
                "ReactNode".to_string(),
            ],
            component_runtime: "ReasonReact".to_string(),
        }
    }
}

impl CodegenConfig {
    pub fn is_component_return(&self, name: &str) -> bool {
        self.component_return_types.iter().any(|t| t == name)
    }
}
