//! The `string` type. `min` and `max` bound the length in characters.

use super::{
    check_bounds, load_scalar, parse_scalar, serialize_scalar, type_mismatch, Context, Scalar,
    TypeHandler,
};
use crate::ast::{Node, Position};
use crate::{ErrorKind, MemberDef, Result, Value};

#[derive(Clone, Copy, Debug, Default)]
pub struct StringDef;

impl Scalar for StringDef {
    fn check(&self, value: Value, def: &MemberDef, position: Option<Position>) -> Result<Value> {
        let length = match &value {
            Value::String(s) => s.chars().count(),
            other => {
                return Err(type_mismatch(
                    ErrorKind::InvalidString,
                    def,
                    "a string",
                    other.type_label(),
                    position,
                ))
            }
        };
        check_bounds(def, length as f64, "length", position)?;
        Ok(value)
    }
}

impl TypeHandler for StringDef {
    fn name(&self) -> &'static str {
        "string"
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

    fn parse(text: &str, def: &MemberDef) -> Result<Option<Value>> {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        StringDef.parse(parse_value(text)?.as_ref(), def, &ctx)
    }

    #[test]
    fn test_parse() {
        let def = MemberDef::new("name", "string");
        assert_eq!(parse("Alice Smith", &def).unwrap(), Some(Value::from("Alice Smith")));
        assert_eq!(parse("\"42\"", &def).unwrap(), Some(Value::from("42")));
        assert_eq!(parse("42", &def).unwrap_err().kind, ErrorKind::InvalidString);
    }

    #[test]
    fn test_length_bounds() {
        let def = MemberDef::new("code", "string").with_min(2.0).with_max(3.0);
        assert!(parse("ab", &def).is_ok());
        assert_eq!(parse("a", &def).unwrap_err().kind, ErrorKind::InvalidMinValue);
        assert_eq!(parse("abcd", &def).unwrap_err().kind, ErrorKind::InvalidMaxValue);
        // characters, not bytes
        assert!(parse("äöü", &def).is_ok());
    }

    #[test]
    fn test_serialize_quotes_when_needed() {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let def = MemberDef::new("name", "string");

        let text = StringDef.serialize(Some(&Value::from("a, b")), &def, &ctx).unwrap();
        assert_eq!(text, "\"a, b\"");
        let text = StringDef.serialize(Some(&Value::from("plain")), &def, &ctx).unwrap();
        assert_eq!(text, "plain");
        let err = StringDef.serialize(Some(&Value::from(1)), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidString);
    }
}
