//! Shared naming utilities for consistent case conversion across the codebase.
//!
//! Declaration files use JavaScript identifiers; Reason is stricter about
//! case (types and values start lowercase, modules uppercase) and reserves a
//! different set of keywords. Every identifier the generators emit goes
//! through one of the `normalize_*` functions here.

/// Reason keywords that cannot be used as identifiers
pub const RESERVED_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "begin", "class", "constraint", "do", "done", "downto", "else",
    "end", "exception", "external", "false", "for", "fun", "function", "functor", "if", "in",
    "include", "inherit", "initializer", "lazy", "let", "method", "module", "mutable", "new",
    "nonrec", "object", "of", "open", "or", "private", "pri", "pub", "rec", "switch", "then",
    "to", "true", "try", "type", "val", "virtual", "when", "while", "with",
];

pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}

/// Capitalize the first letter, keeping the rest as-is
///
/// # Examples
/// ```
/// use dtsbind_core::naming::to_pascal_case;
/// assert_eq!(to_pascal_case("fp"), "Fp");
/// assert_eq!(to_pascal_case("Widget"), "Widget");
/// assert_eq!(to_pascal_case("number_or_string"), "Number_or_string");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lower-case the first letter, keeping the rest as-is
///
/// # Examples
/// ```
/// use dtsbind_core::naming::to_camel_case;
/// assert_eq!(to_camel_case("HTMLElement"), "hTMLElement");
/// assert_eq!(to_camel_case("ObjectMeta"), "objectMeta");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Replace every character that cannot appear in an identifier with `_`.
/// A leading digit gets a `_` prefix; an empty name becomes `_`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Lower-case type identifier, e.g. `HTMLElement` -> `hTMLElement`, `type` -> `type_`
pub fn normalize_type_name(name: &str) -> String {
    let name = to_camel_case(&sanitize_identifier(name));
    if is_reserved_keyword(&name) {
        format!("{}_", name)
    } else {
        name
    }
}

/// Identifier for object keys, labels and value bindings.
///
/// BuckleScript drops one leading underscore when it maps a name back to
/// JavaScript, so names that would be illegal in Reason (keywords, leading
/// capitals) are prefixed with `_` instead of being re-cased.
pub fn normalize_field_name(name: &str) -> String {
    let name = sanitize_identifier(name);
    if is_reserved_keyword(&name) || name.starts_with(|c: char| c.is_ascii_uppercase()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Upper-case module identifier, e.g. `server` -> `Server`, `react-dom` -> `React_dom`
pub fn normalize_module_name(name: &str) -> String {
    let sanitized = sanitize_identifier(name);
    let trimmed = sanitized.trim_start_matches('_');
    if trimmed.is_empty() || trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("M{}", trimmed)
    } else {
        to_pascal_case(trimmed)
    }
}
