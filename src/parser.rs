//! Text parser producing the [`ast`](crate::ast) parse tree.
//!
//! The parser is a single-pass character scanner with line/column tracking.
//! It knows nothing about schemas or types; it only builds trees.
//!
//! ## Usage
//!
//! ```rust
//! use internet_object::ast::NodeKind;
//! use internet_object::parser::{parse_document, parse_header};
//!
//! let header = parse_header("name, age?: number").unwrap();
//! assert_eq!(header.kind(), NodeKind::Object);
//!
//! let doc = parse_document("~ $a: 1\n~ b: $a\n---\nhello").unwrap();
//! assert_eq!(doc.header.map(|h| h.kind()), Some(NodeKind::Collection));
//! assert_eq!(doc.data.map(|d| d.kind()), Some(NodeKind::Object));
//! ```

use crate::ast::{Child, KeyValue, Node, Position, Token, TokenKind, Tree, TreeKind};
use crate::{Error, Number, Result, Value};

/// Line that separates the header section from the data section.
pub const SECTION_SEPARATOR: &str = "---";

const MAX_NESTING: usize = 128;

/// The two sections of a document. Either may be absent.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub header: Option<Node>,
    pub data: Option<Node>,
}

/// Parses a whole text as a header section.
///
/// # Errors
///
/// Returns a [`Syntax`](crate::ErrorKind::Syntax) error for malformed text.
pub fn parse_header(text: &str) -> Result<Node> {
    Parser::new(text).parse_section()
}

/// Parses a whole text as a data section.
///
/// # Errors
///
/// Returns a [`Syntax`](crate::ErrorKind::Syntax) error for malformed text.
pub fn parse_data(text: &str) -> Result<Node> {
    Parser::new(text).parse_section()
}

/// Parses a single value such as `[1, 2, 3]` or `{a, b}`.
///
/// Empty text is an absent value.
///
/// # Errors
///
/// Returns a [`Syntax`](crate::ErrorKind::Syntax) error for malformed text.
pub fn parse_value(text: &str) -> Result<Option<Node>> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    if parser.at_end() {
        return Ok(None);
    }
    let node = parser.parse_value()?;
    parser.expect_end()?;
    Ok(Some(node))
}

/// Splits a document at the first `---` line and parses both sections.
///
/// Positions in the data section refer to lines of the full document.
///
/// # Errors
///
/// Returns a [`Syntax`](crate::ErrorKind::Syntax) error for malformed text.
pub fn parse_document(text: &str) -> Result<Document> {
    let mut offset = 0;
    let mut line = 1;

    for raw in text.split_inclusive('\n') {
        if raw.trim() == SECTION_SEPARATOR {
            let header = &text[..offset];
            let data = &text[offset + raw.len()..];
            return Ok(Document {
                header: parse_optional_section(header, 1)?,
                data: parse_optional_section(data, line + 1)?,
            });
        }
        offset += raw.len();
        line += 1;
    }

    Ok(Document {
        header: None,
        data: parse_optional_section(text, 1)?,
    })
}

fn parse_optional_section(text: &str, first_line: usize) -> Result<Option<Node>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Parser::starting_at(text, first_line).parse_section().map(Some)
}

/// The parser. Most callers want [`parse_header`] or [`parse_document`].
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::starting_at(input, 1)
    }

    /// Creates a parser whose first line is numbered `line`.
    #[must_use]
    pub fn starting_at(input: &'a str, line: usize) -> Self {
        Parser {
            input,
            position: 0,
            line,
            column: 1,
            depth: 0,
        }
    }

    /// Parses one section: a `~` collection or a single member list.
    ///
    /// # Errors
    ///
    /// Returns a syntax error when the section is malformed or has trailing text.
    pub fn parse_section(&mut self) -> Result<Node> {
        self.skip_whitespace();
        let start = self.pos();

        if self.at_end() {
            return Ok(Node::Tree(Tree::new(TreeKind::Object, vec![], start)));
        }

        if self.peek_char() == Some('~') {
            return self.parse_collection();
        }

        let mut children = self.parse_members(None)?;
        self.expect_end()?;

        // A lone braced object is the section itself.
        let braced_object = children.len() == 1
            && matches!(
                &children[0],
                Child::Item(Some(Node::Tree(tree))) if tree.kind == TreeKind::Object
            );
        if braced_object {
            if let Some(Child::Item(Some(node))) = children.pop() {
                return Ok(node);
            }
        }

        Ok(Node::Tree(Tree::new(TreeKind::Object, children, start)))
    }

    fn parse_collection(&mut self) -> Result<Node> {
        let start = self.pos();
        let mut items = Vec::new();

        while self.peek_char() == Some('~') {
            let item_start = self.pos();
            self.next_char(); // consume '~'
            let members = self.parse_members(None)?;
            items.push(Child::Item(Some(Node::Tree(Tree::new(
                TreeKind::Object,
                members,
                item_start,
            )))));
            self.skip_whitespace();
        }

        self.expect_end()?;
        Ok(Node::Tree(Tree::new(TreeKind::Collection, items, start)))
    }

    fn parse_members(&mut self, close: Option<char>) -> Result<Vec<Child>> {
        let mut children = Vec::new();

        self.skip_whitespace();
        if self.at_list_end(close) {
            return Ok(children);
        }

        loop {
            children.push(self.parse_member(close)?);
            self.skip_whitespace();
            if self.peek_char() == Some(',') {
                self.next_char();
                continue;
            }
            break;
        }

        Ok(children)
    }

    fn parse_member(&mut self, close: Option<char>) -> Result<Child> {
        self.skip_whitespace();

        if self.peek_char() == Some(',') || self.at_list_end(close) {
            return Ok(Child::Item(None));
        }

        if matches!(self.peek_char(), Some('{') | Some('[')) {
            return Ok(Child::Item(Some(self.parse_value()?)));
        }

        let token = self.parse_token()?;
        self.skip_whitespace();

        if self.peek_char() == Some(':') {
            self.next_char(); // consume ':'
            let value = self.parse_optional_value(close)?;
            return Ok(Child::Pair(KeyValue {
                key: token.text,
                value,
                position: token.position,
            }));
        }

        Ok(Child::Item(Some(Node::Token(token))))
    }

    fn parse_optional_value(&mut self, close: Option<char>) -> Result<Option<Node>> {
        self.skip_whitespace();
        if self.peek_char() == Some(',') || self.at_list_end(close) {
            return Ok(None);
        }
        self.parse_value().map(Some)
    }

    fn parse_value(&mut self) -> Result<Node> {
        match self.peek_char() {
            Some('{') => self.parse_tree(TreeKind::Object, '}'),
            Some('[') => self.parse_tree(TreeKind::Array, ']'),
            _ => self.parse_token().map(Node::Token),
        }
    }

    fn parse_tree(&mut self, kind: TreeKind, close: char) -> Result<Node> {
        let start = self.pos();
        self.next_char(); // consume opening bracket

        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(Error::syntax(
                start,
                format!("Nesting deeper than {} levels", MAX_NESTING),
            ));
        }

        let children = self.parse_members(Some(close))?;
        self.skip_whitespace();

        let at = self.pos();
        match self.next_char() {
            Some(ch) if ch == close => {}
            Some(other) => {
                return Err(Error::syntax(
                    at,
                    format!("Expected '{}', found '{}'", close, other),
                ))
            }
            None => {
                return Err(Error::syntax(
                    at,
                    format!("Unexpected end of input, expected '{}'", close),
                ))
            }
        }

        self.depth -= 1;
        Ok(Node::Tree(Tree::new(kind, children, start)))
    }

    fn parse_token(&mut self) -> Result<Token> {
        let position = self.pos();

        if self.peek_char() == Some('"') {
            let text = self.parse_quoted()?;
            return Ok(Token {
                kind: TokenKind::String,
                value: Value::String(text.clone()),
                text,
                position,
            });
        }

        let text = self.parse_open()?;
        Ok(classify(text, position))
    }

    fn parse_quoted(&mut self) -> Result<String> {
        self.next_char(); // consume opening quote
        let mut result = String::new();

        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => match self.next_char() {
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('0') => result.push('\0'),
                    Some('u') => result.push(self.parse_unicode_escape()?),
                    Some(other) => {
                        // Unknown escape - preserve literally
                        result.push('\\');
                        result.push(other);
                    }
                    None => {
                        return Err(Error::syntax(
                            self.pos(),
                            "Unexpected end of input in string",
                        ))
                    }
                },
                other => result.push(other),
            }
        }

        Err(Error::syntax(self.pos(), "Unterminated string"))
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.next_char() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => {
                    return Err(Error::syntax(
                        self.pos(),
                        "Invalid unicode escape sequence (expected 4 hex digits)",
                    ))
                }
            }
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::syntax(self.pos(), "Invalid unicode code point"))
    }

    fn parse_open(&mut self) -> Result<String> {
        let start = self.position;
        let at = self.pos();

        while let Some(ch) = self.peek_char() {
            if matches!(
                ch,
                ',' | ':' | '{' | '}' | '[' | ']' | '~' | '\n' | '\r'
            ) {
                break;
            }
            self.next_char();
        }

        let text = self.input[start..self.position].trim();
        if text.is_empty() {
            return Err(match self.peek_char() {
                Some(ch) => Error::syntax(at, format!("Unexpected character '{}'", ch)),
                None => Error::syntax(at, "Unexpected end of input, expected a value"),
            });
        }
        Ok(text.to_string())
    }

    fn at_list_end(&self, close: Option<char>) -> bool {
        match (self.peek_char(), close) {
            (None, _) => true,
            (Some(ch), Some(close)) => ch == close,
            (Some(ch), None) => ch == '~',
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Ok(()),
            Some(ch) => Err(Error::syntax(
                self.pos(),
                format!("Unexpected character '{}'", ch),
            )),
        }
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.input[self.position..].chars().next()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }
}

fn classify(text: String, position: Position) -> Token {
    let (kind, value) = match text.as_str() {
        "T" | "true" => (TokenKind::Boolean, Value::Bool(true)),
        "F" | "false" => (TokenKind::Boolean, Value::Bool(false)),
        "N" | "null" => (TokenKind::Null, Value::Null),
        other => match parse_number(other) {
            Some(number) => (TokenKind::Number, Value::Number(number)),
            None => (TokenKind::String, Value::String(text.clone())),
        },
    };

    Token {
        kind,
        value,
        text,
        position,
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '-' | '+' | '.')) {
        return None;
    }
    if !text
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E'))
    {
        return None;
    }

    if let Ok(integer) = text.parse::<i64>() {
        return Some(Number::Integer(integer));
    }
    text.parse::<f64>().ok().map(Number::Float)
}
