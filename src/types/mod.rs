//! Type handlers.
//!
//! Every registered type implements [`TypeHandler`]: `parse` validates a
//! parse-tree node, `load` validates an in-memory [`Value`], and `serialize`
//! renders a value as text. All three run the [common field
//! checks](common::check_common) first and return early when those settle the
//! result (absent, null, default).
//!
//! `None` in and out of a handler means *absent*; [`Value::Null`] is the
//! explicit null marker.

pub mod common;

mod any;
mod array;
mod boolean;
mod datetime;
mod number;
pub(crate) mod object;
mod string;

pub use any::AnyDef;
pub use array::ArrayDef;
pub use boolean::BooleanDef;
pub use common::{check_common, Candidate, Checked};
pub use datetime::DateTimeDef;
pub use number::NumberDef;
pub use object::ObjectDef;
pub use string::StringDef;

use crate::ast::{Node, Position};
use crate::header::HeaderCollection;
use crate::registry::TypeRegistry;
use crate::{data, Error, ErrorKind, MemberDef, Options, Result, Value};
use std::borrow::Cow;

/// Parse, load and serialize for one type name.
///
/// Handlers are stateless and shared by every call through the registry.
pub trait TypeHandler: Send + Sync {
    /// The name schemas use to refer to this type.
    fn name(&self) -> &'static str;

    /// Validates a parse-tree node (or its absence) against `def`.
    fn parse(&self, node: Option<&Node>, def: &MemberDef, ctx: &Context<'_>)
        -> Result<Option<Value>>;

    /// Validates an in-memory value (or its absence) against `def`.
    fn load(&self, value: Option<&Value>, def: &MemberDef, ctx: &Context<'_>)
        -> Result<Option<Value>>;

    /// Renders a value. Absent renders as the empty string, null as `N`.
    fn serialize(&self, value: Option<&Value>, def: &MemberDef, ctx: &Context<'_>)
        -> Result<String>;
}

/// Everything a handler call can see besides its own value and definition.
#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub registry: &'a TypeRegistry,
    /// Header variables for `$name` substitution while parsing.
    pub vars: Option<&'a HeaderCollection>,
    pub options: &'a Options,
    /// Composite levels entered so far.
    pub depth: usize,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(
        registry: &'a TypeRegistry,
        vars: Option<&'a HeaderCollection>,
        options: &'a Options,
    ) -> Self {
        Context {
            registry,
            vars,
            options,
            depth: 0,
        }
    }

    /// The context for the members of a composite one level down.
    ///
    /// # Errors
    ///
    /// Fails with [`MaxDepthExceeded`](ErrorKind::MaxDepthExceeded) past
    /// [`Options::max_depth`].
    pub fn descend(&self, position: Option<Position>) -> Result<Context<'a>> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded,
                format!("Nesting exceeds the maximum depth of {}", self.options.max_depth),
                position,
            ));
        }
        Ok(Context { depth, ..*self })
    }

    /// The handler registered for `def`'s type.
    pub fn handler(&self, def: &MemberDef, position: Option<Position>) -> Result<&'a dyn TypeHandler> {
        self.registry.resolve(&def.type_name, position)
    }
}

/// `"name"` for named fields, `element` for anonymous array elements.
pub(crate) fn describe(def: &MemberDef) -> String {
    if def.name.is_empty() {
        "element".to_string()
    } else {
        format!("\"{}\"", def.name)
    }
}

/// The per-type mismatch error, e.g. a string where a number was declared.
pub(crate) fn type_mismatch(
    kind: ErrorKind,
    def: &MemberDef,
    expected: &str,
    found: &str,
    position: Option<Position>,
) -> Error {
    Error::at(
        kind,
        format!("Expected {} for {}, found {}", expected, describe(def), found),
        position,
    )
}

/// What serialize does after the common checks.
pub(crate) enum Rendering<'v> {
    /// Output is settled: `""` when absent, `N` for null.
    Done(String),
    /// Render this value, the input or a substituted default.
    Value(Cow<'v, Value>),
}

pub(crate) fn serialize_common<'v>(def: &MemberDef, value: Option<&'v Value>) -> Result<Rendering<'v>> {
    Ok(match check_common(def, value)? {
        Checked::Continue(value) => Rendering::Value(Cow::Borrowed(value)),
        Checked::Substituted(None) => Rendering::Done(String::new()),
        Checked::Substituted(Some(Value::Null)) => Rendering::Done("N".to_string()),
        Checked::Substituted(Some(default)) => Rendering::Value(Cow::Owned(default)),
    })
}

/// The type-specific half of a scalar type.
pub(crate) trait Scalar {
    /// Validates a value that passed the common checks, converting it if the
    /// type has a richer form (e.g. datetime text).
    fn check(&self, value: Value, def: &MemberDef, position: Option<Position>) -> Result<Value>;

    fn render(&self, value: &Value) -> String {
        data::to_text(value)
    }
}

pub(crate) fn parse_scalar<S: Scalar>(
    scalar: &S,
    node: Option<&Node>,
    def: &MemberDef,
    ctx: &Context<'_>,
) -> Result<Option<Value>> {
    let node = match check_common(def, node)? {
        Checked::Continue(node) => node,
        Checked::Substituted(result) => return Ok(result),
    };
    let value = data::value_from_node(node, ctx.vars);
    scalar.check(value, def, Some(node.position())).map(Some)
}

pub(crate) fn load_scalar<S: Scalar>(
    scalar: &S,
    value: Option<&Value>,
    def: &MemberDef,
) -> Result<Option<Value>> {
    let value = match check_common(def, value)? {
        Checked::Continue(value) => value,
        Checked::Substituted(result) => return Ok(result),
    };
    scalar.check(value.clone(), def, None).map(Some)
}

pub(crate) fn serialize_scalar<S: Scalar>(
    scalar: &S,
    value: Option<&Value>,
    def: &MemberDef,
) -> Result<String> {
    match serialize_common(def, value)? {
        Rendering::Done(text) => Ok(text),
        Rendering::Value(value) => {
            let value = scalar.check(value.into_owned(), def, None)?;
            Ok(scalar.render(&value))
        }
    }
}

/// Enforces `min`/`max` on a measured quantity (a number, or a length).
pub(crate) fn check_bounds(
    def: &MemberDef,
    measured: f64,
    what: &str,
    position: Option<Position>,
) -> Result<()> {
    if let Some(min) = def.min {
        if measured < min {
            return Err(Error::at(
                ErrorKind::InvalidMinValue,
                format!(
                    "The {} of {} must be at least {}, found {}",
                    what,
                    describe(def),
                    min,
                    measured
                ),
                position,
            ));
        }
    }
    if let Some(max) = def.max {
        if measured > max {
            return Err(Error::at(
                ErrorKind::InvalidMaxValue,
                format!(
                    "The {} of {} must be at most {}, found {}",
                    what,
                    describe(def),
                    max,
                    measured
                ),
                position,
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn test_descend_enforces_depth() {
        let options = Options::new().with_max_depth(2);
        let ctx = Context::new(registry::builtin(), None, &options);

        let one = ctx.descend(None).unwrap();
        let two = one.descend(None).unwrap();
        assert_eq!(two.depth, 2);

        let err = two.descend(Some(Position::new(1, 5))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);
        assert_eq!(err.position, Some(Position::new(1, 5)));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&MemberDef::new("age", "number")), "\"age\"");
        assert_eq!(describe(&MemberDef::new("", "number")), "element");
    }
}
