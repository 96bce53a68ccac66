//! Header collections and the header compiler.
//!
//! A header either declares a bare schema (`name, age: number`) or is a
//! collection of single-pair items, each introduced by `~`:
//!
//! ```text
//! ~ $address: {street, city}
//! ~ $schema: {name, address: $address}
//! ~ min_age: 18
//! ~ adult_age: $min_age
//! ```
//!
//! Items are compiled strictly in declaration order, and a `$name` reference
//! only sees items declared before it. An unresolved reference is kept as
//! literal text.
//!
//! ## Examples
//!
//! ```rust
//! use internet_object::{compile_header, Value};
//!
//! let header = compile_header("~ $a: 1\n~ b: $a\n~ c: $later\n~ later: 2").unwrap();
//! assert_eq!(header.keys(), vec!["$a", "b", "c", "later"]);
//! assert_eq!(header.get("b").and_then(|v| v.as_value()), Some(&Value::from(1)));
//! assert_eq!(header.get("c").and_then(|v| v.as_value()), Some(&Value::from("$later")));
//! ```

use crate::ast::{is_variable_name, Child, KeyValue, Node, NodeKind, Position, Tree, TreeKind};
use crate::registry::TypeRegistry;
use crate::{data, parser, Error, Result, Schema, Value};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Header item key that sets the document schema rather than a variable.
pub const SCHEMA_KEY: &str = "$schema";

/// A header entry: a plain value or a compiled schema.
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Value(Value),
    Schema(Schema),
}

impl HeaderValue {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            HeaderValue::Value(value) => Some(value),
            HeaderValue::Schema(_) => None,
        }
    }

    #[must_use]
    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            HeaderValue::Schema(schema) => Some(schema),
            HeaderValue::Value(_) => None,
        }
    }
}

impl From<Value> for HeaderValue {
    fn from(value: Value) -> Self {
        HeaderValue::Value(value)
    }
}

impl From<Schema> for HeaderValue {
    fn from(schema: Schema) -> Self {
        HeaderValue::Schema(schema)
    }
}

/// Input to [`HeaderCollection::compile`]: header text, or an already parsed tree.
#[derive(Clone, Copy, Debug)]
pub enum HeaderSource<'a> {
    Text(&'a str),
    Tree(&'a Node),
}

impl<'a> From<&'a str> for HeaderSource<'a> {
    fn from(text: &'a str) -> Self {
        HeaderSource::Text(text)
    }
}

impl<'a> From<&'a String> for HeaderSource<'a> {
    fn from(text: &'a String) -> Self {
        HeaderSource::Text(text)
    }
}

impl<'a> From<&'a Node> for HeaderSource<'a> {
    fn from(node: &'a Node) -> Self {
        HeaderSource::Tree(node)
    }
}

/// A schema supplied by the caller to replace the one the header declares.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaOverride {
    Schema(Schema),
    /// Schema text. The text itself is not compiled: the schema is recompiled
    /// from the header's own tree, which older documents rely on.
    Text(String),
}

impl From<Schema> for SchemaOverride {
    fn from(schema: Schema) -> Self {
        SchemaOverride::Schema(schema)
    }
}

impl From<&str> for SchemaOverride {
    fn from(text: &str) -> Self {
        SchemaOverride::Text(text.to_string())
    }
}

/// Ordered variables declared by a header, plus the document schema.
///
/// Variables keep their first-seen position even when overwritten. The
/// schema lives in its own slot and is not one of the [`keys`](Self::keys).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HeaderCollection {
    entries: IndexMap<String, HeaderValue>,
    schema: Option<Schema>,
}

impl HeaderCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Variable keys in declaration order. The returned vector is a copy.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries.get(key)
    }

    /// Looks up a `$name` reference.
    ///
    /// Anything not shaped like a reference yields `None`. The name is looked
    /// up without its `$` first, then as written, so both `a: 1` and `$a: 1`
    /// answer `$a`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use internet_object::{HeaderCollection, Value};
    ///
    /// let mut header = HeaderCollection::new();
    /// header.set("color", Value::from("red"));
    ///
    /// assert!(header.get_variable("$color").is_some());
    /// assert!(header.get_variable("color").is_none());
    /// assert!(header.get_variable("$").is_none());
    /// ```
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&HeaderValue> {
        if !is_variable_name(name) {
            return None;
        }
        self.get(&name[1..]).or_else(|| self.get(name))
    }

    /// Inserts a new key at the end, or overwrites an existing key in place.
    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<HeaderValue>,
    {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Removes a key, keeping the order of the others. Absent keys are ignored.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    /// Iterates variables in declaration order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, HeaderValue> {
        self.entries.iter()
    }

    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn set_schema(&mut self, schema: Schema) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    /// Compiles a header from text or a parse tree.
    ///
    /// An object tree is a bare schema. A collection tree is a list of
    /// single-pair items compiled in order. `schema` replaces whatever schema
    /// the header declares.
    ///
    /// # Errors
    ///
    /// - [`InvalidHeader`](crate::ErrorKind::InvalidHeader) when the tree is
    ///   neither an object nor a collection
    /// - [`InvalidHeaderItem`](crate::ErrorKind::InvalidHeaderItem) for a
    ///   malformed collection item
    /// - schema and syntax errors from the collaborators
    ///
    /// # Examples
    ///
    /// ```rust
    /// use internet_object::{registry, HeaderCollection, MemberDef, Schema};
    ///
    /// let custom: Schema = vec![MemberDef::new("id", "number")].into_iter().collect();
    /// let header = HeaderCollection::compile("name, age", Some(custom.into()), registry::builtin()).unwrap();
    /// assert_eq!(header.schema().map(Schema::len), Some(1));
    /// ```
    pub fn compile<'a, S>(
        source: S,
        schema: Option<SchemaOverride>,
        registry: &TypeRegistry,
    ) -> Result<HeaderCollection>
    where
        S: Into<HeaderSource<'a>>,
    {
        let parsed;
        let tree = match source.into() {
            HeaderSource::Text(text) => {
                parsed = parser::parse_header(text)?;
                &parsed
            }
            HeaderSource::Tree(node) => node,
        };

        let mut header = HeaderCollection::new();
        match tree {
            Node::Tree(t) if t.kind == TreeKind::Object => {
                header.set_schema(Schema::compile(tree, None, registry)?);
            }
            Node::Tree(t) if t.kind == TreeKind::Collection => {
                header.compile_items(t, registry)?;
            }
            other => {
                return Err(Error::invalid_header(
                    format!(
                        "Invalid value found in header: expected an object or a collection, found {}",
                        other.kind()
                    ),
                    Some(other.position()),
                ))
            }
        }

        match schema {
            Some(SchemaOverride::Schema(schema)) => {
                header.set_schema(schema);
            }
            Some(SchemaOverride::Text(_)) => {
                warn!("schema override text is ignored; recompiling from the header tree");
                header.set_schema(Schema::compile(tree, None, registry)?);
            }
            None => {}
        }

        Ok(header)
    }

    fn compile_items(&mut self, tree: &Tree, registry: &TypeRegistry) -> Result<()> {
        for child in &tree.children {
            let kv = header_item(child, tree.position)?;
            let value = kv.value.as_ref().ok_or_else(|| {
                Error::invalid_header_item(
                    format!("The header item \"{}\" has no value", kv.key),
                    Some(kv.position),
                )
            })?;

            debug!(key = %kv.key, kind = %value.kind(), "compiling header item");

            let entry = if kv.key.starts_with('$') && value.kind() == NodeKind::Object {
                HeaderValue::Schema(Schema::compile(value, Some(&*self), registry)?)
            } else {
                match value {
                    Node::Tree(_) => HeaderValue::Value(data::value_from_node(value, Some(&*self))),
                    Node::Token(token) => {
                        let resolved = if token.is_variable_ref() {
                            self.get_variable(&token.text).cloned()
                        } else {
                            None
                        };
                        resolved.unwrap_or_else(|| HeaderValue::Value(token.value.clone()))
                    }
                }
            };

            self.store(&kv.key, entry);
        }
        Ok(())
    }

    fn store(&mut self, key: &str, entry: HeaderValue) {
        match entry {
            HeaderValue::Schema(schema) if key == SCHEMA_KEY => {
                self.set_schema(schema);
            }
            entry => {
                self.set(key, entry);
            }
        }
    }
}

/// A collection item must be an object holding exactly one `key: value` pair.
fn header_item(child: &Child, collection: Position) -> Result<&KeyValue> {
    let item = match child {
        Child::Item(Some(Node::Tree(tree))) if tree.kind == TreeKind::Object => tree,
        other => {
            return Err(Error::invalid_header_item(
                "A header item must be an object",
                other.node().map(Node::position).or(Some(collection)),
            ))
        }
    };

    match item.children.as_slice() {
        [Child::Pair(kv)] => Ok(kv),
        [_] => Err(Error::invalid_header_item(
            "A header item must be written as key: value",
            Some(item.position),
        )),
        children => Err(Error::invalid_header_item(
            format!(
                "A header item must contain exactly one key-value pair, found {}",
                children.len()
            ),
            Some(item.position),
        )),
    }
}
