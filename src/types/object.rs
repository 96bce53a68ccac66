//! The `object` type.
//!
//! Members are matched to the schema fields either by position
//! (`{Alice, 25}`) or by name (`{age: 25, name: Alice}`); the two styles can
//! be mixed. Every field is dispatched to its own handler one level deeper.
//! Serialization is always positional, in schema order, with trailing empty
//! members dropped.
//!
//! An object without fields is free-form: any members, rendered as-is.

use super::{check_common, describe, Checked, Context, Rendering, TypeHandler};
use crate::ast::{Child, Node, Position, Tree, TreeKind};
use crate::{data, Error, ErrorKind, MemberDef, Result, Schema, Value, ValueMap};
use tracing::trace;

#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectDef;

fn invalid<M: Into<String>>(message: M, position: Option<Position>) -> Error {
    Error::at(ErrorKind::InvalidObject, message, position)
}

/// `def.fields` when it declares any, `None` for a free-form object.
fn declared_fields(def: &MemberDef) -> Option<&Schema> {
    def.fields.as_ref().filter(|fields| !fields.is_empty())
}

/// Matches the members of an object tree to `fields` and parses each one.
pub(crate) fn parse_members(tree: &Tree, fields: &Schema, ctx: &Context<'_>) -> Result<ValueMap> {
    let mut slots: Vec<Option<Option<&Node>>> = vec![None; fields.len()];

    for (index, child) in tree.children.iter().enumerate() {
        let (slot, node, position) = match child {
            Child::Item(node) => {
                if index >= fields.len() {
                    return Err(invalid(
                        format!(
                            "Found {} or more values, but only {} fields are defined",
                            index + 1,
                            fields.len()
                        ),
                        node.as_ref().map(Node::position).or(Some(tree.position)),
                    ));
                }
                (index, node.as_ref(), node.as_ref().map(Node::position))
            }
            Child::Pair(kv) => {
                let slot = fields.index_of(&kv.key).ok_or_else(|| {
                    invalid(format!("Unknown field \"{}\"", kv.key), Some(kv.position))
                })?;
                (slot, kv.value.as_ref(), Some(kv.position))
            }
        };

        if slots[slot].is_some() {
            return Err(invalid(
                format!("The field \"{}\" is given more than once", describe_slot(fields, slot)),
                position.or(Some(tree.position)),
            ));
        }
        slots[slot] = Some(node);
    }

    let mut map = ValueMap::with_capacity(fields.len());
    for (def, slot) in fields.defs().zip(slots) {
        trace!(field = %def.name, type_name = %def.type_name, depth = ctx.depth, "object member");
        let node = slot.flatten();
        let handler = ctx.handler(def, node.map(Node::position).or(Some(tree.position)))?;
        if let Some(value) = handler.parse(node, def, ctx)? {
            map.insert(def.name.clone(), value);
        }
    }
    Ok(map)
}

fn describe_slot(fields: &Schema, slot: usize) -> &str {
    fields.get_index(slot).map_or("", |def| def.name.as_str())
}

/// Loads each field of a native object.
pub(crate) fn load_members(map: &ValueMap, fields: &Schema, ctx: &Context<'_>) -> Result<ValueMap> {
    reject_unknown_keys(map, fields)?;

    let mut out = ValueMap::with_capacity(fields.len());
    for def in fields.defs() {
        trace!(field = %def.name, type_name = %def.type_name, depth = ctx.depth, "object member");
        let handler = ctx.handler(def, None)?;
        if let Some(value) = handler.load(map.get(&def.name), def, ctx)? {
            out.insert(def.name.clone(), value);
        }
    }
    Ok(out)
}

/// Renders the members of a native object positionally, without braces.
pub(crate) fn render_members(map: &ValueMap, fields: &Schema, ctx: &Context<'_>) -> Result<String> {
    reject_unknown_keys(map, fields)?;

    let mut parts = Vec::with_capacity(fields.len());
    for def in fields.defs() {
        let handler = ctx.handler(def, None)?;
        parts.push(handler.serialize(map.get(&def.name), def, ctx)?);
    }
    while parts.last().map_or(false, String::is_empty) {
        parts.pop();
    }
    Ok(parts.join(","))
}

fn reject_unknown_keys(map: &ValueMap, fields: &Schema) -> Result<()> {
    match map.keys().find(|key| !fields.contains(key)) {
        Some(key) => Err(invalid(format!("Unknown field \"{}\"", key), None)),
        None => Ok(()),
    }
}

fn object_tree<'n>(node: &'n Node, def: &MemberDef) -> Result<&'n Tree> {
    match node {
        Node::Tree(tree) if tree.kind == TreeKind::Object => Ok(tree),
        other => Err(invalid(
            format!("Expected an object for {}, found {}", describe(def), other.kind()),
            Some(other.position()),
        )),
    }
}

impl TypeHandler for ObjectDef {
    fn name(&self) -> &'static str {
        "object"
    }

    fn parse(&self, node: Option<&Node>, def: &MemberDef, ctx: &Context<'_>) -> Result<Option<Value>> {
        let node = match check_common(def, node)? {
            Checked::Continue(node) => node,
            Checked::Substituted(result) => return Ok(result),
        };
        let tree = object_tree(node, def)?;

        match declared_fields(def) {
            Some(fields) => {
                let inner = ctx.descend(Some(tree.position))?;
                parse_members(tree, fields, &inner).map(|map| Some(Value::Object(map)))
            }
            None => Ok(Some(data::value_from_node(node, ctx.vars))),
        }
    }

    fn load(&self, value: Option<&Value>, def: &MemberDef, ctx: &Context<'_>) -> Result<Option<Value>> {
        let value = match check_common(def, value)? {
            Checked::Continue(value) => value,
            Checked::Substituted(result) => return Ok(result),
        };
        let map = value.as_object().ok_or_else(|| {
            invalid(
                format!("Expected an object for {}, found {}", describe(def), value.type_label()),
                None,
            )
        })?;

        match declared_fields(def) {
            Some(fields) => {
                let inner = ctx.descend(None)?;
                load_members(map, fields, &inner).map(|map| Some(Value::Object(map)))
            }
            None => Ok(Some(value.clone())),
        }
    }

    fn serialize(&self, value: Option<&Value>, def: &MemberDef, ctx: &Context<'_>) -> Result<String> {
        let value = match super::serialize_common(def, value)? {
            Rendering::Done(text) => return Ok(text),
            Rendering::Value(value) => value,
        };
        let map = value.as_object().ok_or_else(|| {
            invalid(
                format!("Expected an object for {}, found {}", describe(def), value.type_label()),
                None,
            )
        })?;

        match declared_fields(def) {
            Some(fields) => {
                let inner = ctx.descend(None)?;
                Ok(format!("{{{}}}", render_members(map, fields, &inner)?))
            }
            None => Ok(data::to_text(&value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;
    use crate::{io_value, registry, Options};

    fn person() -> MemberDef {
        let fields: Schema = vec![
            MemberDef::new("name", "string"),
            MemberDef::new("age", "number").optional(),
            MemberDef::new("tags", "array")
                .with_element(MemberDef::new("", "string"))
                .optional(),
        ]
        .into_iter()
        .collect();
        MemberDef::object_of("person", fields)
    }

    fn parse(text: &str, def: &MemberDef) -> Result<Option<Value>> {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        ObjectDef.parse(parse_value(text)?.as_ref(), def, &ctx)
    }

    fn serialize(value: &Value, def: &MemberDef) -> Result<String> {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        ObjectDef.serialize(Some(value), def, &ctx)
    }

    #[test]
    fn test_positional_and_keyed() {
        let def = person();
        let expected = io_value!({ "name": "Alice", "age": 30 });

        assert_eq!(parse("{Alice, 30}", &def).unwrap(), Some(expected.clone()));
        assert_eq!(parse("{age: 30, name: Alice}", &def).unwrap(), Some(expected.clone()));
        assert_eq!(parse("{Alice, age: 30}", &def).unwrap(), Some(expected));
    }

    #[test]
    fn test_absent_members_are_omitted() {
        let value = parse("{Bob, , [a, b]}", &person()).unwrap().unwrap();
        assert_eq!(value, io_value!({ "name": "Bob", "tags": ["a", "b"] }));
    }

    #[test]
    fn test_member_errors() {
        let def = person();
        assert_eq!(parse("{age: 3}", &def).unwrap_err().kind, ErrorKind::MissingRequiredField);
        assert_eq!(parse("{Al, colour: red}", &def).unwrap_err().kind, ErrorKind::InvalidObject);
        assert_eq!(parse("{Al, 1, [], extra}", &def).unwrap_err().kind, ErrorKind::InvalidObject);
        assert_eq!(parse("{Al, name: Bo}", &def).unwrap_err().kind, ErrorKind::InvalidObject);
        assert_eq!(parse("[Al]", &def).unwrap_err().kind, ErrorKind::InvalidObject);
        assert_eq!(parse("{Al, old}", &def).unwrap_err().kind, ErrorKind::InvalidNumber);
    }

    #[test]
    fn test_serialize_trims_trailing_empties() {
        let def = person();
        assert_eq!(serialize(&io_value!({ "name": "Alice" }), &def).unwrap(), "{Alice}");
        assert_eq!(
            serialize(&io_value!({ "name": "Alice", "tags": ["x"] }), &def).unwrap(),
            "{Alice,,[x]}"
        );
        assert_eq!(
            serialize(&io_value!({ "name": "Alice", "nick": "Al" }), &def).unwrap_err().kind,
            ErrorKind::InvalidObject
        );
    }

    #[test]
    fn test_load() {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let def = person();

        let value = io_value!({ "age": 41, "name": "Carol" });
        let loaded = ObjectDef.load(Some(&value), &def, &ctx).unwrap().unwrap();
        let keys: Vec<_> = loaded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "age"]);

        let err = ObjectDef.load(Some(&io_value!({ "age": 41 })), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField);
    }

    #[test]
    fn test_free_form() {
        let def = MemberDef::new("meta", "object");
        let value = parse("{a: 1, b: x}", &def).unwrap().unwrap();
        assert_eq!(value, io_value!({ "a": 1, "b": "x" }));
        assert_eq!(serialize(&value, &def).unwrap(), "{a: 1,b: x}");
    }
}
