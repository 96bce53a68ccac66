//! The `array` type.
//!
//! Parse and load share one procedure: run the common checks, require a
//! sequence, resolve the element handler from the registry, then dispatch
//! every element to it one level deeper. Only the per-element call differs
//! (`parse` for nodes, `load` for values).

use super::{check_common, Candidate, Checked, Context, Rendering, TypeHandler};
use crate::ast::{Child, Node, Position, TreeKind};
use crate::{Error, ErrorKind, MemberDef, Result, Value};
use tracing::trace;

const TYPE_NAME: &str = "array";

/// Handler for `[elem]` and `{array, schema: elem}` fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayDef;

/// An array candidate: a parse-tree node or a native value.
trait Sequence: Candidate + Copy + Sized {
    const KIND: &'static str;

    fn elements(self, def: &MemberDef) -> Result<Vec<Option<Self>>>;

    fn dispatch(
        handler: &dyn TypeHandler,
        element: Option<Self>,
        def: &MemberDef,
        ctx: &Context<'_>,
    ) -> Result<Option<Value>>;
}

impl<'n> Sequence for &'n Node {
    const KIND: &'static str = "parse";

    fn elements(self, def: &MemberDef) -> Result<Vec<Option<Self>>> {
        let tree = match self {
            Node::Tree(tree) if tree.kind == TreeKind::Array => tree,
            other => return Err(not_an_array(def, &other.kind().to_string(), Some(other.position()))),
        };

        tree.children
            .iter()
            .map(|child| match child {
                Child::Item(slot) => Ok(slot.as_ref()),
                Child::Pair(kv) => Err(Error::at(
                    ErrorKind::InvalidValue,
                    format!("Unexpected key \"{}\" in array {}", kv.key, super::describe(def)),
                    Some(kv.position),
                )),
            })
            .collect()
    }

    fn dispatch(
        handler: &dyn TypeHandler,
        element: Option<Self>,
        def: &MemberDef,
        ctx: &Context<'_>,
    ) -> Result<Option<Value>> {
        handler.parse(element, def, ctx)
    }
}

impl<'v> Sequence for &'v Value {
    const KIND: &'static str = "load";

    fn elements(self, def: &MemberDef) -> Result<Vec<Option<Self>>> {
        match self {
            Value::Array(items) => Ok(items
                .iter()
                .map(|item| match def.element() {
                    Some(element) => slot(item, element),
                    None => Some(item),
                })
                .collect()),
            other => Err(not_an_array(def, other.type_label(), None)),
        }
    }

    fn dispatch(
        handler: &dyn TypeHandler,
        element: Option<Self>,
        def: &MemberDef,
        ctx: &Context<'_>,
    ) -> Result<Option<Value>> {
        handler.load(element, def, ctx)
    }
}

/// Reads an in-memory element. An empty slot is held as null, and it reads
/// back as absent for an optional element that does not accept null.
fn slot<'v>(item: &'v Value, element: &MemberDef) -> Option<&'v Value> {
    if item.is_null() && element.optional && !element.nullable {
        None
    } else {
        Some(item)
    }
}

fn not_an_array(def: &MemberDef, found: &str, position: Option<Position>) -> Error {
    Error::at(
        ErrorKind::InvalidValue,
        format!("Expected an array for {}, found {}", super::describe(def), found),
        position,
    )
}

/// The element definition and its handler. Both are schema-authoring faults
/// when missing, reported as `InvalidType`.
fn element_handler<'d, 'a>(
    def: &'d MemberDef,
    ctx: &Context<'a>,
    position: Option<Position>,
) -> Result<(&'d MemberDef, &'a dyn TypeHandler)> {
    let element = def.element().ok_or_else(|| {
        Error::at(
            ErrorKind::InvalidType,
            format!("The array {} does not declare an element type", super::describe(def)),
            position,
        )
    })?;
    Ok((element, ctx.handler(element, position)?))
}

fn process<C: Sequence>(candidate: Option<C>, def: &MemberDef, ctx: &Context<'_>) -> Result<Option<Value>> {
    let value = match check_common(def, candidate)? {
        Checked::Continue(value) => value,
        Checked::Substituted(result) => return Ok(result),
    };

    let position = value.position();
    let elements = value.elements(def)?;
    let (element, handler) = element_handler(def, ctx, position)?;
    let inner = ctx.descend(position)?;

    let mut items = Vec::with_capacity(elements.len());
    for (index, item) in elements.into_iter().enumerate() {
        trace!(
            mode = C::KIND,
            index,
            type_name = %element.type_name,
            depth = inner.depth,
            "array element"
        );
        // an empty slot keeps its place as null, see `slot`
        items.push(C::dispatch(handler, item, element, &inner)?.unwrap_or(Value::Null));
    }

    Ok(Some(Value::Array(items)))
}

impl TypeHandler for ArrayDef {
    fn name(&self) -> &'static str {
        TYPE_NAME
    }

    fn parse(&self, node: Option<&Node>, def: &MemberDef, ctx: &Context<'_>) -> Result<Option<Value>> {
        process(node, def, ctx)
    }

    fn load(&self, value: Option<&Value>, def: &MemberDef, ctx: &Context<'_>) -> Result<Option<Value>> {
        process(value, def, ctx)
    }

    fn serialize(&self, value: Option<&Value>, def: &MemberDef, ctx: &Context<'_>) -> Result<String> {
        if def.type_name != TYPE_NAME {
            return Err(Error::new(
                ErrorKind::InvalidArray,
                format!(
                    "The array handler cannot serialize {} declared as \"{}\"",
                    super::describe(def),
                    def.type_name
                ),
            ));
        }

        let value = match super::serialize_common(def, value)? {
            Rendering::Done(text) => return Ok(text),
            Rendering::Value(value) => value,
        };

        let (element, handler) = element_handler(def, ctx, None)?;
        let items = value
            .as_array()
            .ok_or_else(|| not_an_array(def, value.type_label(), None))?;
        let inner = ctx.descend(None)?;

        let mut parts = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            trace!(mode = "serialize", index, type_name = %element.type_name, "array element");
            parts.push(handler.serialize(slot(item, element), element, &inner)?);
        }

        Ok(format!("[{}]", parts.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;
    use crate::{io_value, registry, Options};

    fn numbers() -> MemberDef {
        MemberDef::array_of("scores", MemberDef::new("", "number"))
    }

    fn parse(text: &str, def: &MemberDef) -> Result<Option<Value>> {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let node = parse_value(text)?;
        ArrayDef.parse(node.as_ref(), def, &ctx)
    }

    fn load(value: Option<&Value>, def: &MemberDef) -> Result<Option<Value>> {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        ArrayDef.load(value, def, &ctx)
    }

    fn serialize(value: Option<&Value>, def: &MemberDef) -> Result<String> {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        ArrayDef.serialize(value, def, &ctx)
    }

    #[test]
    fn test_basic_array() {
        let def = numbers();
        let value = io_value!([1, 2, 3]);

        assert_eq!(serialize(Some(&value), &def).unwrap(), "[1,2,3]");
        assert_eq!(parse("[1,2,3]", &def).unwrap(), Some(value.clone()));
        assert_eq!(load(Some(&value), &def).unwrap(), Some(value));
    }

    #[test]
    fn test_optional_absent() {
        let def = numbers().optional();
        assert_eq!(serialize(None, &def).unwrap(), "");
        assert_eq!(parse("", &def).unwrap(), None);
        assert_eq!(load(None, &def).unwrap(), None);
    }

    #[test]
    fn test_nullable_null() {
        let def = numbers().nullable();
        assert_eq!(serialize(Some(&Value::Null), &def).unwrap(), "N");
        assert_eq!(parse("N", &def).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_required_absent() {
        let err = parse("", &numbers()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField);
    }

    #[test]
    fn test_default_is_serialized() {
        let def = numbers().optional().with_default(io_value!([7]));
        assert_eq!(serialize(None, &def).unwrap(), "[7]");
        assert_eq!(parse("", &def).unwrap(), Some(io_value!([7])));
    }

    #[test]
    fn test_serialize_requires_array_def() {
        let def = MemberDef::new("scores", "number");
        let err = serialize(Some(&io_value!([1])), &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArray);

        let err = serialize(None, &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArray);
    }

    #[test]
    fn test_element_validation() {
        let def = numbers();
        let err = parse("[1, two, 3]", &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidNumber);
        assert_eq!(err.position, Some(Position::new(1, 5)));

        let err = parse("[1, N]", &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NullNotAllowed);

        let err = parse("[1, , 3]", &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField);
    }

    #[test]
    fn test_not_a_sequence() {
        let err = parse("{a: 1}", &numbers()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);

        let err = parse("[a: 1]", &numbers()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);

        let err = load(Some(&Value::from(5)), &numbers()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
    }

    #[test]
    fn test_missing_or_unknown_element_type() {
        let def = MemberDef::new("scores", "array");
        let err = serialize(Some(&io_value!([1])), &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidType);

        let def = MemberDef::array_of("scores", MemberDef::new("", "money"));
        assert_eq!(parse("[1]", &def).unwrap_err().kind, ErrorKind::InvalidType);
        assert_eq!(load(Some(&io_value!([1])), &def).unwrap_err().kind, ErrorKind::InvalidType);
    }

    #[test]
    fn test_nested_arrays() {
        let def = MemberDef::array_of(
            "matrix",
            MemberDef::array_of("", MemberDef::new("", "number").nullable()),
        );
        let value = parse("[[1, 2], [], [N]]", &def).unwrap().unwrap();
        assert_eq!(value, io_value!([[1, 2], [], [null]]));
        assert_eq!(serialize(Some(&value), &def).unwrap(), "[[1,2],[],[N]]");
    }

    #[test]
    fn test_depth_guard() {
        let mut def = MemberDef::new("", "number");
        for _ in 0..4 {
            def = MemberDef::array_of("", def);
        }

        let options = Options::new().with_max_depth(3);
        let ctx = Context::new(registry::builtin(), None, &options);
        let node = parse_value("[[[[1]]]]").unwrap();
        let err = ArrayDef.parse(node.as_ref(), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);

        let value = io_value!([[[[1]]]]);
        let err = ArrayDef.serialize(Some(&value), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);
    }

    #[test]
    fn test_empty_slots_round_trip() {
        let def = MemberDef::array_of("tags", MemberDef::new("", "string").optional());

        let parsed = parse("[a, , c]", &def).unwrap().unwrap();
        let text = serialize(Some(&parsed), &def).unwrap();
        assert_eq!(text, "[a,,c]");
        assert_eq!(load(Some(&parsed), &def).unwrap(), Some(parsed.clone()));
        assert_eq!(parse(&text, &def).unwrap(), Some(parsed));
    }

    #[test]
    fn test_empty_slot_takes_element_default() {
        let def = MemberDef::array_of("tags", MemberDef::new("", "string").optional().with_default("x"));
        let parsed = parse("[a, , c]", &def).unwrap().unwrap();
        assert_eq!(parsed, io_value!(["a", "x", "c"]));
        assert_eq!(serialize(Some(&parsed), &def).unwrap(), "[a,x,c]");
    }

    #[test]
    fn test_nullable_element_keeps_null() {
        let def = MemberDef::array_of("tags", MemberDef::new("", "string").optional().nullable());
        assert_eq!(serialize(Some(&io_value!(["a", null])), &def).unwrap(), "[a,N]");

        let required = MemberDef::array_of("tags", MemberDef::new("", "string"));
        let err = load(Some(&io_value!(["a", null])), &required).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NullNotAllowed);
    }

    #[test]
    fn test_array_choices() {
        let def = numbers().with_choices(vec![io_value!([1, 2]), io_value!([3])]);

        assert_eq!(parse("[1, 2]", &def).unwrap(), Some(io_value!([1, 2])));
        assert_eq!(load(Some(&io_value!([3.0])), &def).unwrap(), Some(io_value!([3.0])));

        let err = parse("[1, 3]", &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidChoice);
        assert_eq!(err.position, Some(Position::new(1, 1)));

        let err = load(Some(&io_value!([2, 1])), &def).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidChoice);
    }
}
