//! Named placeholder substitution
//!
//! Rewrites `@name` placeholders into literal SQL text. This is plain text
//! replacement, not parameter binding: named values must never carry
//! untrusted input. Positional values are bound separately, after this pass.

use serde_json::Value;
use std::collections::BTreeMap;

/// Value substituted for a `@name` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum NamedValue {
    /// Rendered as a single-quoted literal: `'value'`
    Text(String),
    /// Rendered as a comma-joined list of quoted literals: `'a','b'`
    List(Vec<String>),
    /// Rendered verbatim, unquoted
    Literal(String),
}

impl NamedValue {
    /// Render this value as SQL text
    pub fn render(&self) -> String {
        match self {
            NamedValue::Text(text) => quote(text),
            NamedValue::List(items) => items
                .iter()
                .map(|item| quote(item))
                .collect::<Vec<_>>()
                .join(","),
            NamedValue::Literal(literal) => literal.clone(),
        }
    }
}

fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

impl From<&str> for NamedValue {
    fn from(value: &str) -> Self {
        NamedValue::Text(value.to_string())
    }
}

impl From<String> for NamedValue {
    fn from(value: String) -> Self {
        NamedValue::Text(value)
    }
}

impl From<&String> for NamedValue {
    fn from(value: &String) -> Self {
        NamedValue::Text(value.clone())
    }
}

impl From<Vec<String>> for NamedValue {
    fn from(values: Vec<String>) -> Self {
        NamedValue::List(values)
    }
}

impl From<Vec<&str>> for NamedValue {
    fn from(values: Vec<&str>) -> Self {
        NamedValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for NamedValue {
    fn from(values: &[&str]) -> Self {
        NamedValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NamedValue {
    fn from(values: [&str; N]) -> Self {
        NamedValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NamedValue {
                fn from(value: $ty) -> Self {
                    NamedValue::Literal(value.to_string())
                }
            }
        )*
    };
}

literal_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool);

impl From<Value> for NamedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => NamedValue::Text(text),
            Value::Array(items) if items.iter().all(Value::is_string) => NamedValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            other => NamedValue::Literal(other.to_string()),
        }
    }
}

/// Replace every `@name` occurrence in `template` with the rendered value.
///
/// The template is scanned once and inserted text is never rescanned, so a
/// value containing `@other` stays literal. At each `@` the longest matching
/// name wins, so `@id` never rewrites the prefix of `@ids`.
pub fn substitute(template: &str, named: &BTreeMap<String, NamedValue>) -> String {
    if named.is_empty() {
        return template.to_string();
    }

    let mut entries: Vec<(&str, String)> = named
        .iter()
        .map(|(name, value)| (name.as_str(), value.render()))
        .collect();
    entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut sql = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(at) = rest.find('@') {
        sql.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        match entries.iter().find(|(name, _)| after.starts_with(name)) {
            Some((name, rendered)) => {
                sql.push_str(rendered);
                rest = &after[name.len()..];
            }
            None => {
                sql.push('@');
                rest = after;
            }
        }
    }
    sql.push_str(rest);
    sql
}
