//! Prompt Renderer - Substitute `{{key}}` placeholders in templates
//!
//! Substitution is a single left-to-right scan: every `{{name}}` span is
//! resolved on its own against the variable map, so the result never depends on
//! key order and substituted values are never scanned again.

use std::collections::HashMap;
use std::fmt;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Text emitted for an empty list value
pub const EMPTY_LIST_TEXT: &str = "None";

/// A value that can be substituted into a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValue {
    Text(String),
    Integer(i64),
    /// Rendered joined by ", "
    List(Vec<String>),
    /// Rendered as the empty string
    Empty,
}

impl fmt::Display for PromptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptValue::Text(text) => f.write_str(text),
            PromptValue::Integer(n) => write!(f, "{}", n),
            PromptValue::List(items) if items.is_empty() => f.write_str(EMPTY_LIST_TEXT),
            PromptValue::List(items) => f.write_str(&items.join(", ")),
            PromptValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for PromptValue {
    fn from(value: &str) -> Self {
        PromptValue::Text(value.to_string())
    }
}

impl From<String> for PromptValue {
    fn from(value: String) -> Self {
        PromptValue::Text(value)
    }
}

impl From<i64> for PromptValue {
    fn from(value: i64) -> Self {
        PromptValue::Integer(value)
    }
}

impl From<i32> for PromptValue {
    fn from(value: i32) -> Self {
        PromptValue::Integer(value.into())
    }
}

impl From<u32> for PromptValue {
    fn from(value: u32) -> Self {
        PromptValue::Integer(value.into())
    }
}

impl From<Vec<String>> for PromptValue {
    fn from(value: Vec<String>) -> Self {
        PromptValue::List(value)
    }
}

impl From<Vec<&str>> for PromptValue {
    fn from(value: Vec<&str>) -> Self {
        PromptValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<PromptValue>> From<Option<T>> for PromptValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PromptValue::Empty, Into::into)
    }
}

/// Variables available to a template, keyed by placeholder name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptVars {
    values: HashMap<String, PromptValue>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PromptValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one for this key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PromptValue>) -> Option<PromptValue> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&PromptValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<PromptValue>> FromIterator<(K, V)> for PromptVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = PromptVars::new();
        for (key, value) in iter {
            vars.insert(key, value);
        }
        vars
    }
}

/// Replace every `{{key}}` whose key is present in `vars`.
///
/// Placeholders with no matching key are left verbatim, as is an unterminated `{{`.
pub fn substitute(template: &str, vars: &PromptVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };

        match vars.get(&after_open[..end]) {
            Some(value) => {
                out.push_str(&value.to_string());
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Step one brace forward so `{{{name}}}` still resolves the inner span
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Placeholder names in order of first appearance, without duplicates
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        let name = &after_open[..end];
        if !name.is_empty() && !name.contains('{') {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
            rest = &after_open[end + CLOSE.len()..];
        } else {
            rest = &rest[start + 1..];
        }
    }

    names
}
