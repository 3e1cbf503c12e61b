//! Schema model: an immutable tree of typed nodes describing the expected
//! shape of a document.
//!
//! Nodes are built with `const` constructors so a schema can live in a
//! `static`:
//!
//! ```
//! use json_bind::{Node, Path, Schema};
//!
//! #[derive(Default)]
//! struct Server { port: i64 }
//!
//! fn on_port(_: &Path<'_>, port: i64, server: &mut Server) { server.port = port; }
//!
//! static SERVER: [Node<'static, Server>; 1] = [Node::int(Some("port"), Some(on_port), "TCP port")];
//! static SCHEMA: Schema<'static, Server> = Schema::map(&SERVER);
//! ```
//!
//! The end of a child sequence is the end of the slice; there is no sentinel node.

use std::borrow::Cow;
use std::fmt;

use crate::path::Path;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

pub type StrHandler<C> = fn(&Path<'_>, &str, &mut C);
pub type IntHandler<C> = fn(&Path<'_>, i64, &mut C);
pub type DoubleHandler<C> = fn(&Path<'_>, f64, &mut C);
pub type BoolHandler<C> = fn(&Path<'_>, bool, &mut C);
pub type NullHandler<C> = fn(&Path<'_>, &mut C);

/// Child sequence of a map or list node.
pub type Children<'s, C> = Cow<'s, [Node<'s, C>]>;

/// Recognized type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[serde(alias = "integer")]
    Int,
    #[serde(alias = "string")]
    Str,
    #[serde(alias = "float", alias = "number")]
    Double,
    #[serde(alias = "boolean")]
    Bool,
    Null,
    #[serde(alias = "object")]
    Map,
    #[serde(alias = "array")]
    List,
}

/// Payload of a node, keyed by its type tag.
pub enum Shape<'s, C> {
    Int(Option<IntHandler<C>>),
    Str(Option<StrHandler<C>>),
    Double(Option<DoubleHandler<C>>),
    Bool(Option<BoolHandler<C>>),
    Null(Option<NullHandler<C>>),
    Map(Children<'s, C>),
    List(Children<'s, C>),
    /// Raw tag that isn't one of [`Kind`]'s codes.
    Corrupt(u16),
}

pub struct Node<'s, C> {
    /// `None`: any key (open-key map member) or an unnamed list alternative.
    pub key: Option<&'s str>,
    pub shape: Shape<'s, C>,
    /// Only used in diagnostics.
    pub description: &'s str,
}

/// Outermost node of a schema. Usually a map or a list.
pub struct Schema<'s, C> {
    root: Node<'s, C>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Int,
        Kind::Str,
        Kind::Double,
        Kind::Bool,
        Kind::Null,
        Kind::Map,
        Kind::List,
    ];

    pub const fn code(self) -> u16 {
        match self {
            Kind::Int => 0x0001,
            Kind::Str => 0x0002,
            Kind::Map => 0x0004,
            Kind::List => 0x0008,
            Kind::Double => 0x0010,
            Kind::Bool => 0x0011,
            Kind::Null => 0x0012,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Str => "str",
            Kind::Double => "double",
            Kind::Bool => "bool",
            Kind::Null => "null",
            Kind::Map => "map",
            Kind::List => "list",
        }
    }

    pub const fn is_scalar(self) -> bool {
        !matches!(self, Kind::Map | Kind::List)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'s, C> Shape<'s, C> {
    /// `None` for a corrupt tag.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Shape::Int(_) => Some(Kind::Int),
            Shape::Str(_) => Some(Kind::Str),
            Shape::Double(_) => Some(Kind::Double),
            Shape::Bool(_) => Some(Kind::Bool),
            Shape::Null(_) => Some(Kind::Null),
            Shape::Map(_) => Some(Kind::Map),
            Shape::List(_) => Some(Kind::List),
            Shape::Corrupt(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[Node<'s, C>]> {
        match self {
            Shape::Map(children) | Shape::List(children) => Some(&**children),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Shape::Corrupt(code) => *code,
            other => other.kind().map_or(0, Kind::code),
        }
    }
}

impl<'s, C> Node<'s, C> {
    pub const fn new(key: Option<&'s str>, shape: Shape<'s, C>, description: &'s str) -> Self {
        Self { key, shape, description }
    }

    pub const fn int(key: Option<&'s str>, handler: Option<IntHandler<C>>, description: &'s str) -> Self {
        Self::new(key, Shape::Int(handler), description)
    }

    pub const fn string(key: Option<&'s str>, handler: Option<StrHandler<C>>, description: &'s str) -> Self {
        Self::new(key, Shape::Str(handler), description)
    }

    pub const fn double(key: Option<&'s str>, handler: Option<DoubleHandler<C>>, description: &'s str) -> Self {
        Self::new(key, Shape::Double(handler), description)
    }

    pub const fn boolean(key: Option<&'s str>, handler: Option<BoolHandler<C>>, description: &'s str) -> Self {
        Self::new(key, Shape::Bool(handler), description)
    }

    pub const fn null(key: Option<&'s str>, handler: Option<NullHandler<C>>, description: &'s str) -> Self {
        Self::new(key, Shape::Null(handler), description)
    }

    pub const fn map(key: Option<&'s str>, children: &'s [Node<'s, C>], description: &'s str) -> Self {
        Self::new(key, Shape::Map(Cow::Borrowed(children)), description)
    }

    pub const fn list(key: Option<&'s str>, children: &'s [Node<'s, C>], description: &'s str) -> Self {
        Self::new(key, Shape::List(Cow::Borrowed(children)), description)
    }

    pub const fn corrupt(key: Option<&'s str>, code: u16, description: &'s str) -> Self {
        Self::new(key, Shape::Corrupt(code), description)
    }

    /// Key as shown in diagnostics; `*` for an open key.
    pub fn label(&self) -> &'s str {
        self.key.unwrap_or("*")
    }

    pub fn kind(&self) -> Option<Kind> {
        self.shape.kind()
    }
}

impl<'s, C> Schema<'s, C> {
    pub const fn map(children: &'s [Node<'s, C>]) -> Self {
        Self::from_node(Node::map(None, children, "document root"))
    }

    pub const fn list(children: &'s [Node<'s, C>]) -> Self {
        Self::from_node(Node::list(None, children, "document root"))
    }

    /// Wrap any node as the root. Scalar roots are walked like any other scalar.
    pub const fn from_node(root: Node<'s, C>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node<'s, C> {
        &self.root
    }
}

/// The single node of an open-key sequence, if `children` is one.
///
/// A sequence is open-key when it holds exactly one node and that node has no
/// key. Anything else (including an empty sequence) is a fixed key-set.
pub fn open_key<'a, 's, C>(children: &'a [Node<'s, C>]) -> Option<&'a Node<'s, C>> {
    match children {
        [only] if only.key.is_none() => Some(only),
        _ => None,
    }
}

// Manual impls: fn pointers are Clone/Debug for every `C`, a derive would
// demand `C: Clone`/`C: Debug`.

impl<C> Clone for Shape<'_, C> {
    fn clone(&self) -> Self {
        match self {
            Shape::Int(h) => Shape::Int(*h),
            Shape::Str(h) => Shape::Str(*h),
            Shape::Double(h) => Shape::Double(*h),
            Shape::Bool(h) => Shape::Bool(*h),
            Shape::Null(h) => Shape::Null(*h),
            Shape::Map(children) => Shape::Map(children.clone()),
            Shape::List(children) => Shape::List(children.clone()),
            Shape::Corrupt(code) => Shape::Corrupt(*code),
        }
    }
}

impl<C> Clone for Node<'_, C> {
    fn clone(&self) -> Self {
        Self { key: self.key, shape: self.shape.clone(), description: self.description }
    }
}

impl<C> fmt::Debug for Shape<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Int(h) => f.debug_tuple("Int").field(&h.is_some()).finish(),
            Shape::Str(h) => f.debug_tuple("Str").field(&h.is_some()).finish(),
            Shape::Double(h) => f.debug_tuple("Double").field(&h.is_some()).finish(),
            Shape::Bool(h) => f.debug_tuple("Bool").field(&h.is_some()).finish(),
            Shape::Null(h) => f.debug_tuple("Null").field(&h.is_some()).finish(),
            Shape::Map(children) => f.debug_tuple("Map").field(children).finish(),
            Shape::List(children) => f.debug_tuple("List").field(children).finish(),
            Shape::Corrupt(code) => f.debug_tuple("Corrupt").field(code).finish(),
        }
    }
}

impl<C> fmt::Debug for Node<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("shape", &self.shape)
            .field("description", &self.description)
            .finish()
    }
}

impl<C> fmt::Debug for Schema<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.root).finish()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    static FIXED: [Node<'static, ()>; 2] = [
        Node::string(Some("foo"), None, "foo"),
        Node::int(Some("bar"), None, "bar"),
    ];
    static OPEN: [Node<'static, ()>; 1] = [Node::string(None, None, "anything")];
    static KEYED_SINGLE: [Node<'static, ()>; 1] = [Node::string(Some("only"), None, "only")];
    static TWO_OPEN: [Node<'static, ()>; 2] = [
        Node::string(None, None, "a"),
        Node::string(None, None, "b"),
    ];

    #[test]
    fn open_key_needs_exactly_one_unkeyed_node() {
        assert!(open_key(&OPEN).is_some());
        assert!(open_key(&FIXED).is_none());
        assert!(open_key(&KEYED_SINGLE).is_none());
        assert!(open_key(&TWO_OPEN).is_none());
        assert!(open_key::<()>(&[]).is_none());
    }

    #[test]
    fn kind_codes_round_trip_and_reject_unknown() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(Kind::from_code(0), None);
        assert_eq!(Kind::from_code(123), None);
    }

    #[test]
    fn static_schema_exposes_its_root() {
        static ROOT: Schema<'static, ()> = Schema::map(&FIXED);
        let root = ROOT.root();
        assert_eq!(root.kind(), Some(Kind::Map));
        assert_eq!(root.label(), "*");
        let children = root.shape.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].key, Some("bar"));
    }

    #[test]
    fn corrupt_node_has_no_kind() {
        let node: Node<'_, ()> = Node::corrupt(Some("foo"), 123, "broken");
        assert_eq!(node.kind(), None);
        assert_eq!(node.shape.code(), 123);
        assert!(format!("{node:?}").contains("Corrupt"));
    }

    #[test]
    fn owned_children_clone_independently() {
        let node: Node<'_, ()> = Node::new(
            Some("sub"),
            Shape::List(Cow::Owned(vec![Node::int(None, None, "n")])),
            "list",
        );
        let copy = node.clone();
        assert_eq!(copy.shape.children().map(<[_]>::len), Some(1));
    }
}
