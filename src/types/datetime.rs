//! The `datetime` type: RFC 3339 timestamps, normalized to UTC.
//!
//! Timestamps contain `:` so they are always written quoted.

use super::{load_scalar, parse_scalar, serialize_scalar, type_mismatch, Context, Scalar, TypeHandler};
use crate::ast::{Node, Position};
use crate::{Error, ErrorKind, MemberDef, Result, Value};
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeDef;

impl Scalar for DateTimeDef {
    fn check(&self, value: Value, def: &MemberDef, position: Option<Position>) -> Result<Value> {
        match value {
            Value::DateTime(_) => Ok(value),
            Value::String(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| {
                    Error::at(
                        ErrorKind::InvalidDateTime,
                        format!(
                            "Expected an RFC 3339 timestamp for {}, found \"{}\" ({})",
                            super::describe(def),
                            text,
                            e
                        ),
                        position,
                    )
                }),
            other => Err(type_mismatch(
                ErrorKind::InvalidDateTime,
                def,
                "a timestamp",
                other.type_label(),
                position,
            )),
        }
    }
}

impl TypeHandler for DateTimeDef {
    fn name(&self) -> &'static str {
        "datetime"
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
    use chrono::TimeZone;

    #[test]
    fn test_parse_and_serialize() {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let def = MemberDef::new("joined", "datetime");

        let node = parse_value("\"2024-03-01T10:30:00+02:00\"").unwrap();
        let value = DateTimeDef.parse(node.as_ref(), &def, &ctx).unwrap().unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(value, Value::DateTime(expected));

        let text = DateTimeDef.serialize(Some(&value), &def, &ctx).unwrap();
        assert_eq!(text, "\"2024-03-01T08:30:00+00:00\"");
    }

    #[test]
    fn test_load_accepts_text() {
        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        let def = MemberDef::new("joined", "datetime");

        let value = Value::from("2024-03-01T08:30:00Z");
        assert!(DateTimeDef.load(Some(&value), &def, &ctx).unwrap().unwrap().is_datetime());

        let err = DateTimeDef.load(Some(&Value::from("yesterday")), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDateTime);
        let err = DateTimeDef.load(Some(&Value::from(5)), &def, &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDateTime);
    }
}
