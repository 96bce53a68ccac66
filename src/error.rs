//! Error types for header compilation, parsing, loading and serialization.
//!
//! Every component reports failures through the single structured [`Error`]
//! type: a fixed [`ErrorKind`], a descriptive message and, when one is known,
//! the [`Position`] of the offending token or node.
//!
//! ## Error Categories
//!
//! - **Structural faults**: malformed headers, header items and schemas,
//!   unregistered types, syntax errors
//! - **Validation faults**: missing required fields, disallowed nulls,
//!   choice mismatches, bound violations and per-value type mismatches
//!
//! Both categories travel through the same `Result` path and abort the whole
//! operation. [`ErrorKind::is_validation`] tells them apart.
//!
//! ## Examples
//!
//! ```rust
//! use internet_object::{compile_header, ErrorKind};
//!
//! let err = compile_header("~ a: 1, b: 2").unwrap_err();
//! assert_eq!(err.kind, ErrorKind::InvalidHeaderItem);
//! assert!(err.to_string().starts_with("invalid-header-item"));
//! ```

use crate::ast::Position;
use std::fmt;
use thiserror::Error;

/// The fixed taxonomy of failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The header is neither a schema object nor a collection.
    InvalidHeader,
    /// A header collection item is not an object holding exactly one pair.
    InvalidHeaderItem,
    /// An array handler was asked to work with a non-array member definition.
    InvalidArray,
    /// The value does not have the shape the handler requires.
    InvalidValue,
    /// The type name is missing or not registered.
    InvalidType,
    /// The schema text could not be compiled.
    InvalidSchema,
    MissingRequiredField,
    NullNotAllowed,
    InvalidChoice,
    InvalidMinValue,
    InvalidMaxValue,
    InvalidString,
    InvalidNumber,
    InvalidBoolean,
    InvalidDateTime,
    InvalidObject,
    /// Nested processing went deeper than the configured limit.
    MaxDepthExceeded,
    /// Malformed source text.
    Syntax,
}

impl ErrorKind {
    /// Returns the stable kebab-case code of this kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use internet_object::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::NullNotAllowed.as_str(), "null-not-allowed");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidHeader => "invalid-header",
            ErrorKind::InvalidHeaderItem => "invalid-header-item",
            ErrorKind::InvalidArray => "invalid-array",
            ErrorKind::InvalidValue => "invalid-value",
            ErrorKind::InvalidType => "invalid-type",
            ErrorKind::InvalidSchema => "invalid-schema",
            ErrorKind::MissingRequiredField => "value-required",
            ErrorKind::NullNotAllowed => "null-not-allowed",
            ErrorKind::InvalidChoice => "invalid-value-choice",
            ErrorKind::InvalidMinValue => "invalid-min-value",
            ErrorKind::InvalidMaxValue => "invalid-max-value",
            ErrorKind::InvalidString => "invalid-string",
            ErrorKind::InvalidNumber => "invalid-number",
            ErrorKind::InvalidBoolean => "invalid-boolean",
            ErrorKind::InvalidDateTime => "invalid-datetime",
            ErrorKind::InvalidObject => "invalid-object",
            ErrorKind::MaxDepthExceeded => "max-depth-exceeded",
            ErrorKind::Syntax => "syntax-error",
        }
    }

    /// Returns `true` for faults raised while validating a value against its
    /// member definition, as opposed to malformed headers, schemas or text.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidValue
                | ErrorKind::MissingRequiredField
                | ErrorKind::NullNotAllowed
                | ErrorKind::InvalidChoice
                | ErrorKind::InvalidMinValue
                | ErrorKind::InvalidMaxValue
                | ErrorKind::InvalidString
                | ErrorKind::InvalidNumber
                | ErrorKind::InvalidBoolean
                | ErrorKind::InvalidDateTime
                | ErrorKind::InvalidObject
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured failure: what went wrong, why, and where.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}{}", located(.position))]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<Position>,
}

fn located(position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!(" at line {}, column {}", pos.line, pos.column),
        None => String::new(),
    }
}

impl Error {
    /// Creates an error without source position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use internet_object::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidType, "unknown type \"money\"");
    /// assert_eq!(err.to_string(), "invalid-type: unknown type \"money\"");
    /// ```
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Error {
            kind,
            message: message.into(),
            position: None,
        }
    }

    /// Creates an error pointing at an optional source position.
    pub fn at<M: Into<String>>(kind: ErrorKind, message: M, position: Option<Position>) -> Self {
        Error {
            kind,
            message: message.into(),
            position,
        }
    }

    /// Creates a syntax error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use internet_object::{ast::Position, Error};
    ///
    /// let err = Error::syntax(Position::new(3, 7), "expected ']'");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn syntax<M: Into<String>>(position: Position, message: M) -> Self {
        Error::at(ErrorKind::Syntax, message, Some(position))
    }

    pub fn invalid_header<M: Into<String>>(message: M, position: Option<Position>) -> Self {
        Error::at(ErrorKind::InvalidHeader, message, position)
    }

    pub fn invalid_header_item<M: Into<String>>(message: M, position: Option<Position>) -> Self {
        Error::at(ErrorKind::InvalidHeaderItem, message, position)
    }

    pub fn invalid_schema<M: Into<String>>(message: M, position: Option<Position>) -> Self {
        Error::at(ErrorKind::InvalidSchema, message, position)
    }

    /// Creates an error for a missing or unregistered type name.
    pub fn invalid_type(type_name: &str, position: Option<Position>) -> Self {
        Error::at(
            ErrorKind::InvalidType,
            format!("The type \"{}\" is not registered.", type_name),
            position,
        )
    }

    /// Returns `true` if this error came from value validation.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind.is_validation()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
