//! Internet Object Notation
//!
//! This module documents the notation as implemented by this library. It
//! contains no code.
//!
//! # Overview
//!
//! A document is a header and a data section separated by a line holding only
//! `---`. Either section may be omitted; a document without the separator is
//! all data.
//!
//! ```text
//! ~ $schema: {name, age: number, active?: boolean}
//! ~ city: Paris
//! ---
//! ~ Alice, 30, T
//! ~ Bob, 25
//! ```
//!
//! # Values
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `N` or `null` | `N` |
//! | Boolean | `T`, `true`, `F`, `false` | `T` |
//! | Integer | decimal digits, optional sign | `-42` |
//! | Float | decimal with `.` or exponent | `2.5e3` |
//! | String | open or `"quoted"` | `Alice Smith` |
//! | Array | `[` values `]` | `[1, 2, 3]` |
//! | Object | `{` members `}` | `{Alice, age: 30}` |
//! | Variable | `$name` | `$city` |
//!
//! ## Strings
//!
//! Open strings run until one of `, : { } [ ] ~` or a line break, and are
//! trimmed. A string must be quoted when it:
//!
//! - is empty, or starts or ends with whitespace
//! - contains a separator, a quote, a backslash or a control character
//! - reads as a boolean, null or number (`T`, `N`, `42`)
//!
//! Quoted strings support `\" \\ \n \r \t \b \f \0` and `\uXXXX`.
//!
//! Timestamps contain `:` and are therefore always quoted:
//! `"2024-03-01T08:30:00+00:00"`.
//!
//! ## Members
//!
//! Objects and sections hold comma-separated members. A member is a bare value
//! (matched to a schema field by position), a `key: value` pair (matched by
//! name) or empty (absent):
//!
//! ```text
//! Alice, , [admin]        name = Alice, age absent, tags = [admin]
//! Alice, tags: [admin]    the same, mixing positions and keys
//! ```
//!
//! Arrays hold bare values only; an empty slot is an absent element.
//!
//! # Header
//!
//! A header is either a bare schema:
//!
//! ```text
//! name, age?: number, tags*: [string]
//! ```
//!
//! or a collection of `~` items, each a single `key: value` pair:
//!
//! | Item | Meaning |
//! |------|---------|
//! | `~ $schema: {…}` | the document schema |
//! | `~ $name: {…}` | a named schema, usable as a field type `$name` |
//! | `~ name: value` | a variable, referenced as `$name` |
//!
//! Items are compiled top to bottom. A `$name` reference sees only items
//! declared above it; anything else stays as the literal text `$name`.
//!
//! # Schema
//!
//! | Definition | Meaning |
//! |------------|---------|
//! | `name` | any value |
//! | `name?` | optional |
//! | `name*` | nullable |
//! | `name: type` | a registered type: `any`, `string`, `number`, `boolean`, `datetime`, `array`, `object` |
//! | `name: [type]` | array of `type`; `[]` is an array of any |
//! | `name: {a, b}` | nested object |
//! | `name: $schema_var` | nested object using a named schema |
//! | `name: {type, opt: value, …}` | type with options |
//!
//! Type options:
//!
//! - `default`: value used when an optional field is absent
//! - `choices`: array of allowed values
//! - `min`, `max`: bounds on a number's value or a string's length
//! - `optional`, `null`: boolean forms of the `?` and `*` suffixes
//! - `schema`: the element type of an array, or the fields of an object
//!
//! # Validation Order
//!
//! Every field runs the same checks before its type-specific ones:
//!
//! 1. **Absent**: optional fields take their default or stay absent; required
//!    fields fail
//! 2. **Null**: nullable fields yield null; others fail
//! 3. **Choices**: the value must be one of the declared choices
//!
//! # Output
//!
//! Records are written positionally in schema order. Absent fields are
//! written as nothing, null as `N`, and trailing empty members are dropped:
//!
//! ```text
//! Alice,30,T
//! Bob,25
//! ```
//!
//! Arrays are written as `[a,b,c]` with no spaces.
