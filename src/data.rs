//! Untyped data values: parse-tree to [`Value`] conversion and text rendering.
//!
//! This is the schema-less path. Header items with composite values, schema
//! option values (`default`, `choices`) and the `any` type all go through it.
//! String tokens shaped like `$name` are replaced with the variable's value
//! when a [`HeaderCollection`] resolves them.

use crate::ast::{Child, Node, Token, TreeKind};
use crate::header::{HeaderCollection, HeaderValue};
use crate::{Number, Value, ValueMap};

/// Converts a parse-tree node into a value, substituting declared variables.
///
/// Empty slots become [`Value::Null`]; positional object members are keyed
/// by their index.
///
/// # Examples
///
/// ```rust
/// use internet_object::{data, io_value, parser};
///
/// let node = parser::parse_data("[1, T, N]").unwrap();
/// let value = data::value_from_node(&node, None);
/// assert_eq!(value, io_value!({ "0": [1, true, null] }));
/// ```
#[must_use]
pub fn value_from_node(node: &Node, vars: Option<&HeaderCollection>) -> Value {
    match node {
        Node::Token(token) => token_value(token, vars),
        Node::Tree(tree) => match tree.kind {
            TreeKind::Array | TreeKind::Collection => Value::Array(
                tree.children
                    .iter()
                    .map(|child| child_value(child, vars))
                    .collect(),
            ),
            TreeKind::Object => {
                let mut map = ValueMap::with_capacity(tree.children.len());
                for (index, child) in tree.children.iter().enumerate() {
                    let key = match child {
                        Child::Pair(kv) => kv.key.clone(),
                        Child::Item(_) => index.to_string(),
                    };
                    map.insert(key, child_value(child, vars));
                }
                Value::Object(map)
            }
        },
    }
}

/// The literal value of a node, without variable substitution.
#[must_use]
pub fn literal_value(node: &Node) -> Value {
    value_from_node(node, None)
}

fn child_value(child: &Child, vars: Option<&HeaderCollection>) -> Value {
    child
        .node()
        .map_or(Value::Null, |node| value_from_node(node, vars))
}

fn token_value(token: &Token, vars: Option<&HeaderCollection>) -> Value {
    if token.is_variable_ref() {
        if let Some(HeaderValue::Value(value)) = vars.and_then(|v| v.get_variable(&token.text)) {
            return value.clone();
        }
    }
    token.value.clone()
}

/// Renders a value as text without any schema.
///
/// # Examples
///
/// ```rust
/// use internet_object::{data, io_value};
///
/// let value = io_value!({ "name": "Alice", "tags": ["a", "b,c"], "x": null });
/// assert_eq!(data::to_text(&value), r#"{name: Alice,tags: [a,"b,c"],x: N}"#);
/// ```
#[must_use]
pub fn to_text(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push('N'),
        Value::Bool(b) => out.push(if *b { 'T' } else { 'F' }),
        Value::Number(n) => out.push_str(&number_text(n)),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            write_members(out, map);
            out.push('}');
        }
        Value::DateTime(dt) => write_string(out, &dt.to_rfc3339()),
    }
}

/// Renders the members of an object as `key: value` pairs without braces,
/// the form a top-level record takes.
#[must_use]
pub fn members_text(map: &ValueMap) -> String {
    let mut out = String::new();
    write_members(&mut out, map);
    out
}

fn write_members(out: &mut String, map: &ValueMap) {
    for (i, (key, item)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push_str(": ");
        write_value(out, item);
    }
}

#[inline]
pub(crate) fn number_text(n: &Number) -> String {
    n.to_string()
}

/// Returns `true` if `s` cannot be written as an open (unquoted) string.
#[inline]
#[must_use]
pub fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.chars().any(|ch| {
            matches!(
                ch,
                ',' | ':' | '{' | '}' | '[' | ']' | '~' | '"' | '\\'
            ) || ch.is_control()
        })
        || matches!(s, "T" | "F" | "N" | "true" | "false" | "null")
        || s.parse::<f64>().is_ok()
}

/// Writes `s` to `out`, quoting and escaping when required.
pub fn write_string(out: &mut String, s: &str) {
    if !needs_quotes(s) {
        out.push_str(s);
        return;
    }

    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\0' => out.push_str("\\0"),
            ch if ch.is_control() => out.push_str(&format!("\\u{:04x}", ch as u32)),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
