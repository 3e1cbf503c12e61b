//! Schemas described as JSON documents instead of Rust literals.
//!
//! ```json
//! {
//!   "type": "map",
//!   "children": [
//!     { "key": "version", "type": "string", "description": "Configuration version" },
//!     { "key": "users", "type": "map", "children": [
//!       { "type": "map", "description": "User", "children": [
//!         { "key": "password", "type": "str" }
//!       ]}
//!     ]}
//!   ]
//! }
//! ```
//!
//! `type` is a kind name (or alias) or a raw numeric tag; raw tags nobody
//! knows become corrupt nodes and are reported as such by the walk. Since a file
//! can't name Rust functions, callbacks come from a [`Handlers`] table, one per
//! scalar kind.

use std::borrow::Cow;
use std::path::{Path as FsPath, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::path::Path;
use crate::path_de::{self, DecodeError};
use crate::schema::{
    BoolHandler, DoubleHandler, IntHandler, Kind, Node, NullHandler, Schema, Shape, StrHandler,
};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub tag: Tag,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Named(Kind),
    Code(u16),
}

/// A parsed schema document. Build a walkable [`Schema`] from it with [`SchemaFile::build`].
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SchemaFile {
    root: NodeSpec,
}

/// Callbacks attached to every scalar node of a given kind.
pub struct Handlers<C> {
    pub int: Option<IntHandler<C>>,
    pub string: Option<StrHandler<C>>,
    pub double: Option<DoubleHandler<C>>,
    pub boolean: Option<BoolHandler<C>>,
    pub null: Option<NullHandler<C>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaFileError {
    #[error("failed to read schema file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema document {0}")]
    Decode(#[from] DecodeError),
    #[error("{kind} node at {at} cannot have children")]
    UnexpectedChildren { at: String, kind: String },
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Tag {
    pub fn kind(self) -> Option<Kind> {
        match self {
            Tag::Named(kind) => Some(kind),
            Tag::Code(code) => Kind::from_code(code),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Tag::Named(kind) => kind.code(),
            Tag::Code(code) => code,
        }
    }
}

impl<C> Default for Handlers<C> {
    fn default() -> Self {
        Self { int: None, string: None, double: None, boolean: None, null: None }
    }
}

impl FromStr for SchemaFile {
    type Err = SchemaFileError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Ok(path_de::from_str_with_path(src)?)
    }
}

impl SchemaFile {
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, SchemaFileError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SchemaFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(path_de::from_slice_with_path(&bytes)?)
    }

    pub fn root(&self) -> &NodeSpec {
        &self.root
    }

    /// Borrowing view of the document as a schema, with `handlers` wired in.
    pub fn build<C>(&self, handlers: &Handlers<C>) -> Result<Schema<'_, C>, SchemaFileError> {
        let mut trail = Path::root();
        build_node(&self.root, handlers, &mut trail).map(Schema::from_node)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn build_node<'s, C>(
    spec: &'s NodeSpec,
    handlers: &Handlers<C>,
    trail: &mut Path<'s>,
) -> Result<Node<'s, C>, SchemaFileError> {
    let kind = spec.tag.kind();
    let shape = match kind {
        Some(Kind::Map) => Shape::Map(Cow::Owned(build_children(spec, handlers, trail)?)),
        Some(Kind::List) => Shape::List(Cow::Owned(build_children(spec, handlers, trail)?)),
        _ if !spec.children.is_empty() => {
            return Err(SchemaFileError::UnexpectedChildren {
                at: trail.render(),
                kind: kind.map_or_else(|| format!("{:#06x}", spec.tag.code()), |k| k.to_string()),
            });
        }
        Some(Kind::Int) => Shape::Int(handlers.int),
        Some(Kind::Str) => Shape::Str(handlers.string),
        Some(Kind::Double) => Shape::Double(handlers.double),
        Some(Kind::Bool) => Shape::Bool(handlers.boolean),
        Some(Kind::Null) => Shape::Null(handlers.null),
        None => Shape::Corrupt(spec.tag.code()),
    };
    Ok(Node::new(spec.key.as_deref(), shape, &spec.description))
}

fn build_children<'s, C>(
    spec: &'s NodeSpec,
    handlers: &Handlers<C>,
    trail: &mut Path<'s>,
) -> Result<Vec<Node<'s, C>>, SchemaFileError> {
    spec.children
        .iter()
        .map(|child| {
            let label = child.key.as_deref().unwrap_or("*");
            trail.descend(label, |trail| build_node(child, handlers, trail))
        })
        .collect()
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
