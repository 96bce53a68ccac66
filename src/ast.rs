//! Parse-tree types.
//!
//! The [`parser`](crate::parser) produces these nodes; header compilation,
//! schema compilation and every [`TypeHandler`](crate::types::TypeHandler)
//! consume them. Nodes are immutable once built.
//!
//! A [`Node`] is either a scalar [`Token`] or a composite [`Tree`]. A tree's
//! children keep source order, and an empty slot such as the middle of
//! `a,,b` is kept as `Child::Item(None)` so positional meaning survives.

use crate::Value;
use std::fmt;

/// A line/column location in the source text, both 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexical kind of a scalar token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    String,
    Number,
    Boolean,
    Null,
}

/// A scalar token: its kind, literal value, source text and position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Value,
    /// The text as written, without surrounding quotes.
    pub text: String,
    pub position: Position,
}

impl Token {
    /// Returns `true` if this is a string token shaped like a variable
    /// reference: a `$` followed by at least one character.
    #[must_use]
    pub fn is_variable_ref(&self) -> bool {
        self.kind == TokenKind::String && is_variable_name(&self.text)
    }
}

/// Returns `true` if `name` starts with `$` and has at least one more character.
#[inline]
#[must_use]
pub fn is_variable_name(name: &str) -> bool {
    name.len() > 1 && name.starts_with('$')
}

/// Kind tag of a composite node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeKind {
    Collection,
    Object,
    Array,
}

/// Kind tag of any node, scalar tokens included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Collection,
    Object,
    Array,
    Scalar,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Collection => "collection",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Scalar => "scalar",
        })
    }
}

/// A `key: value` member of an object. The value is `None` for `key:` with
/// nothing after the colon.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Option<Node>,
    pub position: Position,
}

/// One child slot of a composite node.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Item(Option<Node>),
    Pair(KeyValue),
}

impl Child {
    /// Returns the child's value node, if any, regardless of whether it is keyed.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        match self {
            Child::Item(node) => node.as_ref(),
            Child::Pair(kv) => kv.value.as_ref(),
        }
    }
}

/// A composite node with ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub kind: TreeKind,
    pub children: Vec<Child>,
    pub position: Position,
}

impl Tree {
    #[must_use]
    pub fn new(kind: TreeKind, children: Vec<Child>, position: Position) -> Self {
        Tree {
            kind,
            children,
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Token(Token),
    Tree(Tree),
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Token(_) => NodeKind::Scalar,
            Node::Tree(tree) => match tree.kind {
                TreeKind::Collection => NodeKind::Collection,
                TreeKind::Object => NodeKind::Object,
                TreeKind::Array => NodeKind::Array,
            },
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Node::Token(token) => token.position,
            Node::Tree(tree) => tree.position,
        }
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            Node::Tree(_) => None,
        }
    }

    #[must_use]
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Node::Tree(tree) => Some(tree),
            Node::Token(_) => None,
        }
    }

    /// Returns `true` for a null-literal token (`N` or `null`).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Token(token) if token.kind == TokenKind::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_token(text: &str) -> Token {
        Token {
            kind: TokenKind::String,
            value: Value::from(text),
            text: text.to_string(),
            position: Position::new(1, 1),
        }
    }

    #[test]
    fn test_variable_ref_shape() {
        assert!(string_token("$a").is_variable_ref());
        assert!(string_token("$address").is_variable_ref());
        assert!(!string_token("$").is_variable_ref());
        assert!(!string_token("a$").is_variable_ref());

        let mut number = string_token("$1");
        number.kind = TokenKind::Number;
        assert!(!number.is_variable_ref());
    }

    #[test]
    fn test_node_kind() {
        let token = Node::Token(string_token("x"));
        assert_eq!(token.kind(), NodeKind::Scalar);

        let tree = Node::Tree(Tree::new(TreeKind::Array, vec![], Position::new(1, 1)));
        assert_eq!(tree.kind(), NodeKind::Array);
        assert_eq!(tree.kind().to_string(), "array");
    }
}
