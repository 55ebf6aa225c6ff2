//! Rendering requests and the printer that turns them into Reason text
//!
//! Generators decide structure and names and describe their output with
//! [`TypeTemplate`] and [`Template`] values. Punctuation, attribute placement
//! and indentation live here only.

use std::fmt;

/// Quote `s` as a Reason string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// One parameter of a function type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTemplate {
    /// `~label` for labelled parameters, `None` for positional ones
    pub label: Option<String>,
    pub ty: String,
    /// Rendered with the `=?` may-be-omitted marker
    pub optional: bool,
}

impl ParamTemplate {
    pub fn positional(ty: impl Into<String>) -> Self {
        Self {
            label: None,
            ty: ty.into(),
            optional: false,
        }
    }
}

impl fmt::Display for ParamTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "~{}: {}", label, self.ty)?,
            None => write!(f, "{}", self.ty)?,
        }
        if self.optional {
            write!(f, "=?")?;
        }
        Ok(())
    }
}

/// One field of a structural object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

/// Type-level rendering request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTemplate {
    /// `head` or `head(arg, ...)`
    Applied { head: String, args: Vec<String> },
    Tuple(Vec<String>),
    Function {
        params: Vec<ParamTemplate>,
        ret: String,
    },
    Object(Vec<FieldTemplate>),
    /// Polymorphic variant with payloads, e.g. `` [ | `Number(float)] ``
    Variants {
        attribute: Option<&'static str>,
        cases: Vec<(String, String)>,
    },
    /// Object method, optionally polymorphic in its own type parameters
    Method {
        generics: Vec<String>,
        function: Box<TypeTemplate>,
    },
}

impl TypeTemplate {
    pub fn named(head: impl Into<String>) -> Self {
        TypeTemplate::Applied {
            head: head.into(),
            args: Vec::new(),
        }
    }

    pub fn applied(head: impl Into<String>, args: Vec<String>) -> Self {
        TypeTemplate::Applied {
            head: head.into(),
            args,
        }
    }
}

impl fmt::Display for TypeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTemplate::Applied { head, args } if args.is_empty() => write!(f, "{}", head),
            TypeTemplate::Applied { head, args } => write!(f, "{}({})", head, args.join(", ")),
            TypeTemplate::Tuple(members) if members.is_empty() => write!(f, "unit"),
            TypeTemplate::Tuple(members) => write!(f, "({})", members.join(", ")),
            TypeTemplate::Function { params, ret } if params.is_empty() => {
                write!(f, "unit => {}", ret)
            }
            TypeTemplate::Function { params, ret } => {
                let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "({}) => {}", params.join(", "), ret)
            }
            TypeTemplate::Object(fields) if fields.is_empty() => write!(f, "Js.t({{.}})"),
            TypeTemplate::Object(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        if field.optional {
                            format!("{}: Js.undefined({})", quote(&field.name), field.ty)
                        } else {
                            format!("{}: {}", quote(&field.name), field.ty)
                        }
                    })
                    .collect();
                write!(f, "{{. {}}}", fields.join(", "))
            }
            TypeTemplate::Variants { attribute, cases } => {
                if let Some(attribute) = attribute {
                    write!(f, "{} ", attribute)?;
                }
                let cases: Vec<String> = cases
                    .iter()
                    .map(|(tag, payload)| format!("`{}({})", tag, payload))
                    .collect();
                write!(f, "[ | {}]", cases.join(" | "))
            }
            TypeTemplate::Method { generics, function } => {
                if !generics.is_empty() {
                    write!(f, "{}. ", generics.join(" "))?;
                }
                write!(f, "[@bs.meth] ({})", function)
            }
        }
    }
}

/// Declaration-level rendering request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// `[@attrs] external name: ty = "js_name";`
    External {
        attributes: Vec<String>,
        name: String,
        ty: String,
        js_name: String,
    },
    /// `type name('a) = body;`
    TypeDecl {
        name: String,
        params: Vec<String>,
        body: String,
    },
    /// `let name = target;`
    LetAlias { name: String, target: String },
    /// `let name = (params) => body;`
    Let {
        name: String,
        params: Vec<String>,
        body: String,
    },
    /// `module Name = { ... };`
    Module { name: String, body: Vec<Template> },
    /// Pre-formatted line
    Raw(String),
}

/// Turns rendering requests into indented text
#[derive(Debug, Clone)]
pub struct Printer {
    indent_size: usize,
}

impl Printer {
    pub fn new(indent_size: usize) -> Self {
        Self { indent_size }
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(level * self.indent_size)
    }

    /// Print every template, one declaration per line group
    pub fn print(&self, templates: &[Template]) -> String {
        let mut lines = Vec::new();
        for template in templates {
            self.print_into(template, 0, &mut lines);
        }
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn print_into(&self, template: &Template, level: usize, lines: &mut Vec<String>) {
        let indent = self.indent(level);
        match template {
            Template::External {
                attributes,
                name,
                ty,
                js_name,
            } => {
                let prefix = if attributes.is_empty() {
                    String::new()
                } else {
                    format!("{} ", attributes.join(" "))
                };
                lines.push(format!(
                    "{}{}external {}: {} = {};",
                    indent,
                    prefix,
                    name,
                    ty,
                    quote(js_name)
                ));
            }
            Template::TypeDecl { name, params, body } => {
                let head = if params.is_empty() {
                    name.clone()
                } else {
                    format!("{}({})", name, params.join(", "))
                };
                lines.push(format!("{}type {} = {};", indent, head, body));
            }
            Template::LetAlias { name, target } => {
                lines.push(format!("{}let {} = {};", indent, name, target));
            }
            Template::Let { name, params, body } => {
                lines.push(format!(
                    "{}let {} = ({}) =>",
                    indent,
                    name,
                    params.join(", ")
                ));
                lines.push(format!("{}{};", self.indent(level + 1), body));
            }
            Template::Module { name, body } => {
                lines.push(format!("{}module {} = {{", indent, name));
                for child in body {
                    self.print_into(child, level + 1, lines);
                }
                lines.push(format!("{}}};", indent));
            }
            Template::Raw(text) => {
                for line in text.lines() {
                    lines.push(format!("{}{}", indent, line));
                }
            }
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(2)
    }
}
