//! The `boolean` type, written `T`/`F` (or `true`/`false`).

use super::{load_scalar, parse_scalar, serialize_scalar, type_mismatch, Context, Scalar, TypeHandler};
use crate::ast::{Node, Position};
use crate::{ErrorKind, MemberDef, Result, Value};

#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanDef;

impl Scalar for BooleanDef {
    fn check(&self, value: Value, def: &MemberDef, position: Option<Position>) -> Result<Value> {
        match value {
            Value::Bool(_) => Ok(value),
            other => Err(type_mismatch(
                ErrorKind::InvalidBoolean,
                def,
                "a boolean",
                other.type_label(),
                position,
            )),
        }
    }
}

impl TypeHandler for BooleanDef {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn parse(&self, node: Option<&Node>, def: &MemberDef, ctx: &Context<'_>) -> Result<Option<Value>> {
        parse_scalar(self, node, def, ctx)
    }

    fn load(&self, value: Option<&Value>, def: &MemberDef, _ctx: &Context<'_>) -> Result<Option<Value>> {
        load_scalar(self, value, def)
    }

    fn serialize(&self, value: Option<&Value>, def: &MemberDef, _ctx: &Context<'_>) -> Result<String> {
        serialize_scalar(self, value, def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_value;
    use crate::{registry, Options};

    #[test]
    fn test_round_trip() {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let def = MemberDef::new("active", "boolean");

        for (text, expected) in [("T", true), ("true", true), ("F", false), ("false", false)] {
            let node = parse_value(text).unwrap();
            let value = BooleanDef.parse(node.as_ref(), &def, &ctx).unwrap().unwrap();
            assert_eq!(value, Value::Bool(expected));
            let out = BooleanDef.serialize(Some(&value), &def, &ctx).unwrap();
            assert_eq!(out, if expected { "T" } else { "F" });
        }
    }

    #[test]
    fn test_rejects_other_values() {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let def = MemberDef::new("active", "boolean");

        let node = parse_value("yes").unwrap();
        let err = BooleanDef.parse(node.as_ref(), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidBoolean);
        assert_eq!(
            BooleanDef.load(Some(&Value::from(1)), &def, &ctx).unwrap_err().kind,
            ErrorKind::InvalidBoolean
        );
    }
}
