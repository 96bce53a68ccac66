//! The `number` type. `min` and `max` bound the value.

use super::{
    check_bounds, load_scalar, parse_scalar, serialize_scalar, type_mismatch, Context, Scalar,
    TypeHandler,
};
use crate::ast::{Node, Position};
use crate::{ErrorKind, MemberDef, Result, Value};

#[derive(Clone, Copy, Debug, Default)]
pub struct NumberDef;

impl Scalar for NumberDef {
    fn check(&self, value: Value, def: &MemberDef, position: Option<Position>) -> Result<Value> {
        let number = match &value {
            Value::Number(n) => n.as_f64(),
            other => {
                return Err(type_mismatch(
                    ErrorKind::InvalidNumber,
                    def,
                    "a number",
                    other.type_label(),
                    position,
                ))
            }
        };
        check_bounds(def, number, "value", position)?;
        Ok(value)
    }
}

impl TypeHandler for NumberDef {
    fn name(&self) -> &'static str {
        "number"
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
