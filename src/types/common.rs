//! Checks shared by every type handler.
//!
//! Applied in order:
//!
//! 1. absent: optional fields yield their default (or stay absent), required
//!    fields fail with `MissingRequiredField`
//! 2. null: nullable fields yield null, others fail with `NullNotAllowed`
//! 3. choices: the value must be one of them, else `InvalidChoice`
//!
//! Anything left over continues to the type-specific logic unchanged.

use super::describe;
use crate::ast::{Node, Position};
use crate::{data, Error, ErrorKind, MemberDef, Result, Value};
use std::borrow::Cow;

/// Outcome of [`check_common`].
#[derive(Clone, Debug, PartialEq)]
pub enum Checked<T> {
    /// Run the type-specific logic on this value.
    Continue(T),
    /// The result is settled; `None` means absent.
    Substituted(Option<Value>),
}

/// A value the common checks can inspect: a parse-tree node or a native value.
pub trait Candidate {
    fn is_null(&self) -> bool;

    /// The value compared against `choices`.
    fn choice_value(&self) -> Cow<'_, Value>;

    fn position(&self) -> Option<Position>;
}

impl Candidate for &Node {
    fn is_null(&self) -> bool {
        Node::is_null(self)
    }

    fn choice_value(&self) -> Cow<'_, Value> {
        match self {
            Node::Token(token) => Cow::Borrowed(&token.value),
            Node::Tree(_) => Cow::Owned(data::literal_value(self)),
        }
    }

    fn position(&self) -> Option<Position> {
        Some(Node::position(self))
    }
}

impl Candidate for &Value {
    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn choice_value(&self) -> Cow<'_, Value> {
        Cow::Borrowed(*self)
    }

    fn position(&self) -> Option<Position> {
        None
    }
}

/// Runs the shared absent, null and choice rules for `def`.
///
/// # Errors
///
/// `MissingRequiredField`, `NullNotAllowed` or `InvalidChoice`.
///
/// # Examples
///
/// ```rust
/// use internet_object::types::{check_common, Checked};
/// use internet_object::{MemberDef, Value};
///
/// let def = MemberDef::new("size", "string").optional().with_default("M");
/// let absent: Option<&Value> = None;
/// assert_eq!(check_common(&def, absent).unwrap(), Checked::Substituted(Some(Value::from("M"))));
///
/// let value = Value::from("L");
/// assert_eq!(check_common(&def, Some(&value)).unwrap(), Checked::Continue(&value));
/// ```
pub fn check_common<C: Candidate>(def: &MemberDef, value: Option<C>) -> Result<Checked<C>> {
    let value = match value {
        Some(value) => value,
        None if def.optional => return Ok(Checked::Substituted(def.default.clone())),
        None => {
            return Err(Error::new(
                ErrorKind::MissingRequiredField,
                format!("A value is required for {}", describe(def)),
            ))
        }
    };

    if value.is_null() {
        if def.nullable {
            return Ok(Checked::Substituted(Some(Value::Null)));
        }
        return Err(Error::at(
            ErrorKind::NullNotAllowed,
            format!("Null is not allowed for {}", describe(def)),
            value.position(),
        ));
    }

    if let Some(choices) = &def.choices {
        let candidate = value.choice_value();
        if !choices.iter().any(|choice| same_choice(choice, &candidate)) {
            return Err(Error::at(
                ErrorKind::InvalidChoice,
                format!(
                    "The value {} of {} is not one of the allowed choices",
                    candidate,
                    describe(def)
                ),
                value.position(),
            ));
        }
    }

    Ok(Checked::Continue(value))
}

/// Numbers compare by value, so `1` matches `1.0`.
fn same_choice(choice: &Value, candidate: &Value) -> bool {
    match (choice, candidate) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_choice(x, y))
        }
        _ => choice == candidate,
    }
}
