//! # internet_object
//!
//! A schema-driven reader and writer for Internet Object documents.
//!
//! ## What is Internet Object?
//!
//! Internet Object is a compact text notation. A document has an optional
//! header that declares a schema and named variables, then a data section of
//! one or more records, separated by a `---` line:
//!
//! ```text
//! ~ $address: {street, city}
//! ~ $schema: {name, age: {number, min: 0}, tags?: [string], address?: $address}
//! ~ default_city: Paris
//! ---
//! ~ Alice, 30, [admin, dev], {Main St, $default_city}
//! ~ Bob, 25
//! ```
//!
//! Records are positional: values line up with the schema fields in order.
//!
//! ## Key Features
//!
//! - **Header compilation**: ordered variables plus a compiled [`Schema`],
//!   with `$name` references resolved in declaration order
//! - **Type registry**: every field type is a [`TypeHandler`] looked up by name
//!   in an explicit [`TypeRegistry`]; custom types plug in at startup
//! - **Shared validation**: optional, nullable, default and choices rules run
//!   the same way for every type
//! - **Recursion guard**: nested composites stop at [`Options::max_depth`]
//! - **Structured errors**: one [`Error`] type with a kind, message and source
//!   position
//!
//! ## Quick Start
//!
//! ```rust
//! use internet_object::{compile_header, from_str_with_header, io_value, to_string_with_header};
//!
//! let header = compile_header("name, age: number, tags?: [string]").unwrap();
//!
//! let record = from_str_with_header("Alice, 30, [admin, dev]", &header).unwrap();
//! assert_eq!(record, io_value!({ "name": "Alice", "age": 30, "tags": ["admin", "dev"] }));
//!
//! let text = to_string_with_header(&record, &header).unwrap();
//! assert_eq!(text, "Alice,30,[admin,dev]");
//! ```
//!
//! ### Variables
//!
//! ```rust
//! use internet_object::{compile_header, Value};
//!
//! let header = compile_header("~ $min: 18\n~ adult: $min\n~ early: $late\n~ late: 1").unwrap();
//! assert_eq!(header.get("adult").and_then(|v| v.as_value()), Some(&Value::from(18)));
//! // declared later, so not resolved
//! assert_eq!(header.get("early").and_then(|v| v.as_value()), Some(&Value::from("$late")));
//! ```
//!
//! ### Working with Type Handlers Directly
//!
//! ```rust
//! use internet_object::types::{ArrayDef, Context, TypeHandler};
//! use internet_object::{io_value, parser, registry, MemberDef, Options};
//!
//! let def = MemberDef::array_of("scores", MemberDef::new("", "number"));
//! let options = Options::default();
//! let ctx = Context::new(registry::builtin(), None, &options);
//!
//! let node = parser::parse_value("[1, 2, 3]").unwrap();
//! let value = ArrayDef.parse(node.as_ref(), &def, &ctx).unwrap();
//! assert_eq!(value, Some(io_value!([1, 2, 3])));
//! assert_eq!(ArrayDef.serialize(value.as_ref(), &def, &ctx).unwrap(), "[1,2,3]");
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Nesting is bounded in both the parser and the type handlers
//! - Proper error propagation with `Result` types
//!
//! ## Notation
//!
//! See the [`format`] module for the notation accepted by the parser and the
//! schema compiler.

pub mod ast;
pub mod data;
pub mod error;
pub mod format;
pub mod header;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

pub use ast::{Node, Position};
pub use error::{Error, ErrorKind, Result};
pub use header::{HeaderCollection, HeaderSource, HeaderValue, SchemaOverride};
pub use map::ValueMap;
pub use options::Options;
pub use registry::{RegistryBuilder, TypeRegistry};
pub use schema::{MemberDef, Schema};
pub use types::{Context, TypeHandler};
pub use value::{Number, Value};

use ast::TreeKind;

/// Compile header text with the built-in types.
///
/// # Examples
///
/// ```rust
/// use internet_object::compile_header;
///
/// let header = compile_header("name, age?: number").unwrap();
/// assert_eq!(header.schema().map(|s| s.len()), Some(2));
/// assert!(header.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if the header is malformed or names an unknown type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn compile_header(text: &str) -> Result<HeaderCollection> {
    HeaderCollection::compile(text, None, registry::builtin())
}

/// Parse a data section against a compiled header.
///
/// A single record yields an object; a `~` collection yields an array of
/// records. Without a schema the data is read free-form.
///
/// # Examples
///
/// ```rust
/// use internet_object::{compile_header, from_str_with_header, io_value};
///
/// let header = compile_header("name, age: number").unwrap();
/// let people = from_str_with_header("~ Alice, 30\n~ Bob, 25", &header).unwrap();
/// assert_eq!(
///     people,
///     io_value!([{ "name": "Alice", "age": 30 }, { "name": "Bob", "age": 25 }])
/// );
/// ```
///
/// # Errors
///
/// Returns the first syntax or validation error. Error messages include line
/// and column information where available.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_header(text: &str, header: &HeaderCollection) -> Result<Value> {
    from_str_with_options(text, header, registry::builtin(), &Options::default())
}

/// Parse a data section with an explicit registry and options.
///
/// # Errors
///
/// Returns the first syntax or validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(
    text: &str,
    header: &HeaderCollection,
    registry: &TypeRegistry,
    options: &Options,
) -> Result<Value> {
    let node = parser::parse_data(text)?;
    let ctx = Context::new(registry, Some(header), options);
    read_section(&node, header.schema(), &ctx)
}

/// Parse a whole document: header, `---`, data.
///
/// A document without a `---` line is all data.
///
/// # Examples
///
/// ```rust
/// use internet_object::{from_document, io_value};
///
/// let (header, data) = from_document("~ $schema: {name, age: number}\n---\nAlice, 30").unwrap();
/// assert!(header.schema().is_some());
/// assert_eq!(data, io_value!({ "name": "Alice", "age": 30 }));
/// ```
///
/// # Errors
///
/// Returns the first syntax, header or validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document(text: &str) -> Result<(HeaderCollection, Value)> {
    let document = parser::parse_document(text)?;
    let registry = registry::builtin();

    let header = match &document.header {
        Some(node) => HeaderCollection::compile(node, None, registry)?,
        None => HeaderCollection::new(),
    };

    let options = Options::default();
    let ctx = Context::new(registry, Some(&header), &options);
    let data = match &document.data {
        Some(node) => read_section(node, header.schema(), &ctx)?,
        None => Value::Null,
    };
    Ok((header, data))
}

fn read_section(node: &Node, schema: Option<&Schema>, ctx: &Context<'_>) -> Result<Value> {
    match node {
        Node::Tree(tree) if tree.kind == TreeKind::Collection => tree
            .children
            .iter()
            .map(|item| match item.node() {
                Some(record) => read_section(record, schema, ctx),
                None => Ok(Value::Null),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Node::Tree(tree) if tree.kind == TreeKind::Object => match schema {
            Some(schema) if !schema.is_empty() => {
                types::object::parse_members(tree, schema, ctx).map(Value::Object)
            }
            _ => Ok(data::value_from_node(node, ctx.vars)),
        },
        other => Ok(data::value_from_node(other, ctx.vars)),
    }
}

/// Validate in-memory data against a compiled header.
///
/// Accepts a single record (object) or an array of records. Fields are
/// returned in schema order with defaults applied.
///
/// # Examples
///
/// ```rust
/// use internet_object::{compile_header, io_value, load_with_header};
///
/// let header = compile_header("name, role?: {string, default: user}").unwrap();
/// let loaded = load_with_header(&io_value!({ "name": "Dana" }), &header).unwrap();
/// assert_eq!(loaded, io_value!({ "name": "Dana", "role": "user" }));
/// ```
///
/// # Errors
///
/// Returns the first validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load_with_header(value: &Value, header: &HeaderCollection) -> Result<Value> {
    let options = Options::default();
    let ctx = Context::new(registry::builtin(), Some(header), &options);

    let schema = match header.schema() {
        Some(schema) if !schema.is_empty() => schema,
        _ => return Ok(value.clone()),
    };

    match value {
        Value::Array(records) => records
            .iter()
            .map(|record| types::object::load_members(record_map(record)?, schema, &ctx).map(Value::Object))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        record => types::object::load_members(record_map(record)?, schema, &ctx).map(Value::Object),
    }
}

/// Render in-memory data as a data section for a compiled header.
///
/// Records are written positionally; an array becomes a `~` collection.
///
/// # Examples
///
/// ```rust
/// use internet_object::{compile_header, io_value, to_string_with_header};
///
/// let header = compile_header("name, age?: number").unwrap();
/// let people = io_value!([{ "name": "Alice", "age": 30 }, { "name": "Bob" }]);
/// assert_eq!(to_string_with_header(&people, &header).unwrap(), "~ Alice,30\n~ Bob");
/// ```
///
/// # Errors
///
/// Returns the first validation error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_header(value: &Value, header: &HeaderCollection) -> Result<String> {
    let options = Options::default();
    let ctx = Context::new(registry::builtin(), Some(header), &options);
    let schema = header.schema().filter(|schema| !schema.is_empty());

    match value {
        Value::Array(records) => {
            let mut lines = Vec::with_capacity(records.len());
            for record in records {
                lines.push(format!("~ {}", write_record(record, schema, &ctx)?));
            }
            Ok(lines.join("\n"))
        }
        record => write_record(record, schema, &ctx),
    }
}

fn write_record(record: &Value, schema: Option<&Schema>, ctx: &Context<'_>) -> Result<String> {
    match schema {
        Some(schema) => types::object::render_members(record_map(record)?, schema, ctx),
        None => Ok(match record {
            Value::Object(map) => data::members_text(map),
            other => data::to_text(other),
        }),
    }
}

fn record_map(value: &Value) -> Result<&ValueMap> {
    value.as_object().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidObject,
            format!("Expected a record object, found {}", value.type_label()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_form_without_schema() {
        let header = compile_header("~ greeting: hello").unwrap();
        let value = from_str_with_header("msg: $greeting, n: 1", &header).unwrap();
        assert_eq!(value, io_value!({ "msg": "hello", "n": 1 }));
        assert_eq!(to_string_with_header(&value, &header).unwrap(), "msg: hello,n: 1");
    }

    #[test]
    fn test_records_must_be_objects() {
        let header = compile_header("name").unwrap();
        let err = to_string_with_header(&io_value!([1]), &header).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidObject);
        let err = load_with_header(&Value::from("x"), &header).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidObject);
    }

    #[test]
    fn test_document_without_header() {
        let (header, data) = from_document("a: 1").unwrap();
        assert!(header.schema().is_none());
        assert_eq!(data, io_value!({ "a": 1 }));
    }
}
