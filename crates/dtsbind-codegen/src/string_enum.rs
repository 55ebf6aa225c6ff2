//! Inline encoding of unions made only of string literals
//!
//! `"small" | "large"` never gets a named declaration. It becomes a
//! polymorphic variant that BuckleScript compiles back to the literal strings,
//! so callers can still pass the literals directly.

use crate::template::quote;
use dtsbind_core::naming::{is_reserved_keyword, sanitize_identifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEnum {
    cases: Vec<Case>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Case {
    literal: String,
    tag: String,
}

impl Case {
    fn new(literal: &str) -> Self {
        let mut tag = sanitize_identifier(literal);
        if is_reserved_keyword(&tag) {
            tag.push('_');
        }
        Self {
            literal: literal.to_string(),
            tag,
        }
    }

    fn needs_alias(&self) -> bool {
        self.tag != self.literal
    }

    /// Non-empty and made only of ASCII letters and digits
    fn is_plain(&self) -> bool {
        !self.literal.is_empty() && self.literal.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// Spell `literal` with identifier characters only, without losing information:
/// `_` doubles and any other character becomes `_x<hex>_`.
fn escape_literal(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for c in literal.chars() {
        match c {
            '_' => out.push_str("__"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => out.push_str(&format!("_x{:x}_", u32::from(c))),
        }
    }
    out
}

impl StringEnum {
    pub fn new<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cases: literals.into_iter().map(|l| Case::new(l.as_ref())).collect(),
        }
    }

    /// `` [ | `small | `large] ``, aliasing literals that are not valid tags
    pub fn type_text(&self) -> String {
        let cases: Vec<String> = self
            .cases
            .iter()
            .map(|case| {
                if case.needs_alias() {
                    format!("[@bs.as {}] `{}", quote(&case.literal), case.tag)
                } else {
                    format!("`{}", case.tag)
                }
            })
            .collect();
        format!("[ | {}]", cases.join(" | "))
    }

    /// `enum_small_large`.
    ///
    /// Sets holding any literal outside `[A-Za-z0-9]+` are escaped, joined by
    /// `_o_` and marked with a double underscore (`enum__a_x2d_b`), so distinct
    /// sets never share a name.
    pub fn canonical_name(&self) -> String {
        if self.cases.iter().all(Case::is_plain) {
            let literals: Vec<&str> = self.cases.iter().map(|c| c.literal.as_str()).collect();
            return format!("enum_{}", literals.join("_"));
        }
        let escaped: Vec<String> = self.cases.iter().map(|c| escape_literal(&c.literal)).collect();
        format!("enum__{}", escaped.join("_o_"))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
