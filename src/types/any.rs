//! The `any` type: accepts every value, renders it free-form.

use super::{load_scalar, parse_scalar, serialize_scalar, Context, Scalar, TypeHandler};
use crate::ast::{Node, Position};
use crate::{MemberDef, Result, Value};

/// Handler for untyped fields such as a bare `name` in a schema.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyDef;

impl Scalar for AnyDef {
    fn check(&self, value: Value, _def: &MemberDef, _position: Option<Position>) -> Result<Value> {
        Ok(value)
    }
}

impl TypeHandler for AnyDef {
    fn name(&self) -> &'static str {
        "any"
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
