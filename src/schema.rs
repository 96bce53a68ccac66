//! Schemas and member definitions.
//!
//! A [`Schema`] is an ordered mapping from field name to [`MemberDef`]. It is
//! usually compiled from header text with [`Schema::compile`], but can be
//! built by hand with the `MemberDef` builder methods.
//!
//! ## Schema Notation
//!
//! ```text
//! name                      any value, required
//! name?                     optional
//! name*                     nullable (suffixes combine: name?*)
//! age: number               registered type
//! tags: [string]            array of strings ([] is an array of anything)
//! address: {street, city}   nested object
//! address: $address         object using a schema declared in the header
//! age: {number, min: 18, max: 99, default: 21}
//! size: {string, choices: [S, M, L]}
//! ```
//!
//! Type options are `default`, `choices`, `min`, `max`, `optional`, `null`
//! and `schema` (the element of an array or the fields of an object).
//!
//! ## Examples
//!
//! ```rust
//! use internet_object::{parser, registry, Schema};
//!
//! let node = parser::parse_header("name, age?: {number, min: 0}, tags: [string]").unwrap();
//! let schema = Schema::compile(&node, None, registry::builtin()).unwrap();
//!
//! let age = schema.get("age").unwrap();
//! assert!(age.optional);
//! assert_eq!(age.type_name, "number");
//! assert_eq!(schema.get("tags").and_then(|d| d.element()).map(|e| e.type_name.as_str()), Some("string"));
//! ```

use crate::ast::{Child, Node, Position, TokenKind, Tree, TreeKind};
use crate::data;
use crate::header::{HeaderCollection, HeaderValue};
use crate::registry::TypeRegistry;
use crate::{Error, Result, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Validation and typing rules for one field.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberDef {
    pub name: String,
    /// Name of the registered type handler.
    pub type_name: String,
    pub optional: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub choices: Option<Vec<Value>>,
    /// Element definition of an array.
    pub schema: Option<Box<MemberDef>>,
    /// Field definitions of an object.
    pub fields: Option<Schema>,
}

impl MemberDef {
    /// Creates a required, non-nullable definition of the given type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use internet_object::{MemberDef, Value};
    ///
    /// let def = MemberDef::new("size", "string")
    ///     .optional()
    ///     .with_choices(vec![Value::from("S"), Value::from("M")]);
    /// assert!(def.optional && !def.nullable);
    /// ```
    pub fn new<N: Into<String>, T: Into<String>>(name: N, type_name: T) -> Self {
        MemberDef {
            name: name.into(),
            type_name: type_name.into(),
            optional: false,
            nullable: false,
            default: None,
            min: None,
            max: None,
            choices: None,
            schema: None,
            fields: None,
        }
    }

    /// Creates an `array` definition with the given element definition.
    pub fn array_of<N: Into<String>>(name: N, element: MemberDef) -> Self {
        MemberDef::new(name, "array").with_element(element)
    }

    /// Creates an `object` definition with the given fields.
    pub fn object_of<N: Into<String>>(name: N, fields: Schema) -> Self {
        MemberDef::new(name, "object").with_fields(fields)
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn with_default<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = Some(choices);
        self
    }

    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: MemberDef) -> Self {
        self.schema = Some(Box::new(element));
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Schema) -> Self {
        self.fields = Some(fields);
        self
    }

    /// The element definition of an array.
    #[must_use]
    pub fn element(&self) -> Option<&MemberDef> {
        self.schema.as_deref()
    }
}

/// An ordered mapping from field name to [`MemberDef`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Schema {
    fields: IndexMap<String, MemberDef>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition under its own name. A redefinition replaces the old
    /// one in place.
    pub fn insert(&mut self, def: MemberDef) -> Option<MemberDef> {
        self.fields.insert(def.name.clone(), def)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MemberDef> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, MemberDef> {
        self.fields.keys()
    }

    /// Definitions in declaration order.
    pub fn defs(&self) -> indexmap::map::Values<'_, String, MemberDef> {
        self.fields.values()
    }

    /// Definition at a position, for positional record members.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&MemberDef> {
        self.fields.get_index(index).map(|(_, def)| def)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// Compiles an object parse tree into a schema.
    ///
    /// `vars` resolves `$name` references to previously declared schemas and
    /// values; `registry` decides which type names exist.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSchema`](crate::ErrorKind::InvalidSchema) for
    /// malformed definitions and [`InvalidType`](crate::ErrorKind::InvalidType)
    /// for unregistered type names.
    pub fn compile(
        node: &Node,
        vars: Option<&HeaderCollection>,
        registry: &TypeRegistry,
    ) -> Result<Schema> {
        let tree = match node {
            Node::Tree(tree) if tree.kind == TreeKind::Object => tree,
            other => {
                return Err(Error::invalid_schema(
                    format!("A schema must be an object, found {}", other.kind()),
                    Some(other.position()),
                ))
            }
        };

        let mut schema = Schema::new();
        for child in &tree.children {
            let def = compile_field(child, tree.position, vars, registry)?;
            if schema.contains(&def.name) {
                return Err(Error::invalid_schema(
                    format!("The field \"{}\" is defined more than once", def.name),
                    child.node().map(Node::position),
                ));
            }
            schema.insert(def);
        }

        debug!(fields = schema.len(), "compiled schema");
        Ok(schema)
    }
}

impl FromIterator<MemberDef> for Schema {
    fn from_iter<T: IntoIterator<Item = MemberDef>>(iter: T) -> Self {
        Schema {
            fields: iter
                .into_iter()
                .map(|def| (def.name.clone(), def))
                .collect(),
        }
    }
}

fn compile_field(
    child: &Child,
    parent: Position,
    vars: Option<&HeaderCollection>,
    registry: &TypeRegistry,
) -> Result<MemberDef> {
    match child {
        Child::Item(Some(Node::Token(token))) if token.kind == TokenKind::String => {
            let (name, optional, nullable) = split_name(&token.text, token.position)?;
            let mut def = MemberDef::new(name, "any");
            def.optional = optional;
            def.nullable = nullable;
            Ok(def)
        }
        Child::Item(Some(node)) => Err(Error::invalid_schema(
            "Expected a field name",
            Some(node.position()),
        )),
        Child::Item(None) => Err(Error::invalid_schema("Empty field in schema", Some(parent))),
        Child::Pair(kv) => {
            let (name, optional, nullable) = split_name(&kv.key, kv.position)?;
            let mut def = match &kv.value {
                Some(node) => compile_member(name, node, vars, registry)?,
                None => MemberDef::new(name, "any"),
            };
            def.optional |= optional;
            def.nullable |= nullable;
            Ok(def)
        }
    }
}

/// Strips the `?` (optional) and `*` (nullable) suffixes from a field name.
fn split_name(raw: &str, position: Position) -> Result<(String, bool, bool)> {
    let mut name = raw;
    let mut optional = false;
    let mut nullable = false;

    loop {
        if let Some(rest) = name.strip_suffix('?') {
            optional = true;
            name = rest;
        } else if let Some(rest) = name.strip_suffix('*') {
            nullable = true;
            name = rest;
        } else {
            break;
        }
    }

    if name.is_empty() {
        return Err(Error::invalid_schema(
            format!("Invalid field name \"{}\"", raw),
            Some(position),
        ));
    }
    Ok((name.to_string(), optional, nullable))
}

fn compile_member(
    name: String,
    node: &Node,
    vars: Option<&HeaderCollection>,
    registry: &TypeRegistry,
) -> Result<MemberDef> {
    match node {
        Node::Token(token) if token.is_variable_ref() => {
            match vars.and_then(|v| v.get_variable(&token.text)) {
                Some(HeaderValue::Schema(fields)) => Ok(MemberDef::object_of(name, fields.clone())),
                _ => Err(Error::invalid_schema(
                    format!("The variable \"{}\" does not refer to a schema", token.text),
                    Some(token.position),
                )),
            }
        }
        Node::Token(token) if token.kind == TokenKind::String => {
            if !registry.contains(&token.text) {
                return Err(Error::invalid_type(&token.text, Some(token.position)));
            }
            let mut def = MemberDef::new(name, token.text.as_str());
            if def.type_name == "array" {
                def.schema = Some(Box::new(MemberDef::new("", "any")));
            }
            Ok(def)
        }
        Node::Token(token) => Err(Error::invalid_schema(
            format!("Expected a type name, found \"{}\"", token.text),
            Some(token.position),
        )),
        Node::Tree(tree) => match tree.kind {
            TreeKind::Array => compile_array(name, tree, vars, registry),
            TreeKind::Object => match leading_type_name(tree, registry) {
                Some(type_name) => compile_typedef(name, type_name, tree, vars, registry),
                None => Ok(MemberDef::object_of(
                    name,
                    Schema::compile(node, vars, registry)?,
                )),
            },
            TreeKind::Collection => Err(Error::invalid_schema(
                "A collection cannot be used as a field type",
                Some(tree.position),
            )),
        },
    }
}

fn compile_array(
    name: String,
    tree: &Tree,
    vars: Option<&HeaderCollection>,
    registry: &TypeRegistry,
) -> Result<MemberDef> {
    let element = match tree.children.as_slice() {
        [] | [Child::Item(None)] => MemberDef::new("", "any"),
        [Child::Item(Some(node))] => compile_member(String::new(), node, vars, registry)?,
        [Child::Pair(kv)] => {
            return Err(Error::invalid_schema(
                format!("Unexpected key \"{}\" in array schema", kv.key),
                Some(kv.position),
            ))
        }
        _ => {
            return Err(Error::invalid_schema(
                "An array schema declares exactly one element type",
                Some(tree.position),
            ))
        }
    };
    Ok(MemberDef::array_of(name, element))
}

/// `{number, min: 1}` starts with a registered type name; `{street, city}` does not.
fn leading_type_name<'t>(tree: &'t Tree, registry: &TypeRegistry) -> Option<&'t str> {
    match tree.children.first() {
        Some(Child::Item(Some(Node::Token(token))))
            if token.kind == TokenKind::String && registry.contains(&token.text) =>
        {
            Some(token.text.as_str())
        }
        _ => None,
    }
}

fn compile_typedef(
    name: String,
    type_name: &str,
    tree: &Tree,
    vars: Option<&HeaderCollection>,
    registry: &TypeRegistry,
) -> Result<MemberDef> {
    let mut def = MemberDef::new(name, type_name);
    if type_name == "array" {
        def.schema = Some(Box::new(MemberDef::new("", "any")));
    }

    for child in tree.children.iter().skip(1) {
        let kv = match child {
            Child::Pair(kv) => kv,
            other => {
                return Err(Error::invalid_schema(
                    "Type options must be written as key: value",
                    other.node().map(Node::position).or(Some(tree.position)),
                ))
            }
        };
        let node = kv.value.as_ref().ok_or_else(|| {
            Error::invalid_schema(
                format!("The option \"{}\" has no value", kv.key),
                Some(kv.position),
            )
        })?;

        match kv.key.as_str() {
            "default" => def.default = Some(data::value_from_node(node, vars)),
            "choices" => match data::value_from_node(node, vars) {
                Value::Array(items) => def.choices = Some(items),
                _ => {
                    return Err(Error::invalid_schema(
                        "The choices option must be an array",
                        Some(kv.position),
                    ))
                }
            },
            "min" => def.min = Some(number_option(&kv.key, node, vars, kv.position)?),
            "max" => def.max = Some(number_option(&kv.key, node, vars, kv.position)?),
            "optional" => def.optional = bool_option(&kv.key, node, vars, kv.position)?,
            "null" => def.nullable = bool_option(&kv.key, node, vars, kv.position)?,
            "schema" => {
                let nested = compile_member(String::new(), node, vars, registry)?;
                if def.type_name == "array" {
                    def.schema = Some(Box::new(nested));
                } else {
                    def.fields = Some(nested.fields.ok_or_else(|| {
                        Error::invalid_schema(
                            "The schema option must describe an object",
                            Some(kv.position),
                        )
                    })?);
                }
            }
            other => {
                return Err(Error::invalid_schema(
                    format!("Unknown type option \"{}\"", other),
                    Some(kv.position),
                ))
            }
        }
    }

    Ok(def)
}

fn number_option(
    key: &str,
    node: &Node,
    vars: Option<&HeaderCollection>,
    position: Position,
) -> Result<f64> {
    data::value_from_node(node, vars).as_f64().ok_or_else(|| {
        Error::invalid_schema(format!("The {} option must be a number", key), Some(position))
    })
}

fn bool_option(
    key: &str,
    node: &Node,
    vars: Option<&HeaderCollection>,
    position: Position,
) -> Result<bool> {
    data::value_from_node(node, vars).as_bool().ok_or_else(|| {
        Error::invalid_schema(format!("The {} option must be a boolean", key), Some(position))
    })
}
