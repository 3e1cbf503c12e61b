//! Recursive dispatch: walks a parsed document in lock-step with a schema.
//!
//! Scalars that fit their node fire the node's callback, maps and lists recurse,
//! anything else becomes a [`Fault`] routed through the [`Config`]. A fault the
//! handler suppresses counts as success for that subtree; one it doesn't
//! unwinds the whole walk.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{ErrorCode, Result};
use crate::path::Path;
use crate::report::{Config, Detail, Fault};
use crate::schema::{self, Node, Schema, Shape};

/// Dynamic type of a parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Object,
    Array,
    String,
    Int,
    /// Unsigned integer past `i64::MAX`.
    BigUint,
    Double,
    Bool,
    Null,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(n) if n.is_f64() => JsonKind::Double,
            Value::Number(n) if n.is_i64() => JsonKind::Int,
            Value::Number(_) => JsonKind::BigUint,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            JsonKind::Object => "object",
            JsonKind::Array => "array",
            JsonKind::String => "string",
            JsonKind::Int => "int",
            JsonKind::BigUint => "unsigned int beyond i64",
            JsonKind::Double => "double",
            JsonKind::Bool => "boolean",
            JsonKind::Null => "null",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINT
// ————————————————————————————————————————————————————————————————————————————

/// Walk `value` against `schema`, calling back into `ctx` for every accepted scalar.
pub fn walk<C>(value: &Value, schema: &Schema<'_, C>, ctx: &mut C, config: &Config) -> Result<()> {
    config.trace(format_args!("JSON root processing"));
    let mut path = Path::root();
    Walker { config, ctx }.node(value, schema.root(), &mut path)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNALS
// ————————————————————————————————————————————————————————————————————————————

struct Walker<'w, C> {
    config: &'w Config,
    ctx: &'w mut C,
}

impl<C> Walker<'_, C> {
    fn node<'v>(&mut self, value: &'v Value, node: &Node<'_, C>, path: &mut Path<'v>) -> Result<()> {
        let found = JsonKind::of(value);
        self.config.trace(format_args!("JSON scalar processing, found {found}"));
        match &node.shape {
            Shape::Map(children) => match value.as_object() {
                Some(members) => self.object(members, children, path),
                None => self.mismatch(ErrorCode::SchemaMandatesMap, node, path, found),
            },
            Shape::List(children) => match value.as_array() {
                Some(items) => self.list(items, children, path),
                None => self.mismatch(ErrorCode::SchemaMandatesList, node, path, found),
            },
            Shape::Corrupt(code) => {
                let rendered = path.render();
                let message = format!("schema has invalid/corrupt type {code:#06x} at {rendered}");
                self.config.raise(&Fault {
                    code: ErrorCode::SchemaInvalid,
                    reason: ErrorCode::SchemaInvalid.reason(),
                    message: &message,
                    detail: Detail::Node {
                        key: node.key,
                        description: node.description,
                        path: &rendered,
                        found,
                    },
                })
            }
            _ => self.scalar(value, node, path, found),
        }
    }

    fn scalar(&mut self, value: &Value, node: &Node<'_, C>, path: &Path<'_>, found: JsonKind) -> Result<()> {
        let ctx = &mut *self.ctx;
        let code = match (&node.shape, value) {
            (Shape::Str(handler), Value::String(s)) => {
                if let Some(handler) = handler {
                    handler(path, s, ctx);
                }
                return Ok(());
            }
            (Shape::Int(handler), Value::Number(n)) if n.is_i64() => {
                if let (Some(handler), Some(i)) = (handler, n.as_i64()) {
                    handler(path, i, ctx);
                }
                return Ok(());
            }
            (Shape::Double(handler), Value::Number(n)) if n.is_f64() => {
                if let (Some(handler), Some(d)) = (handler, n.as_f64()) {
                    handler(path, d, ctx);
                }
                return Ok(());
            }
            (Shape::Bool(handler), Value::Bool(b)) => {
                if let Some(handler) = handler {
                    handler(path, *b, ctx);
                }
                return Ok(());
            }
            (Shape::Null(handler), Value::Null) => {
                if let Some(handler) = handler {
                    handler(path, ctx);
                }
                return Ok(());
            }
            (Shape::Str(_), _) => ErrorCode::SchemaMandatesString,
            (Shape::Int(_), _) => ErrorCode::SchemaMandatesInt,
            (Shape::Double(_), _) => ErrorCode::SchemaMandatesDouble,
            (Shape::Bool(_), _) => ErrorCode::SchemaMandatesBool,
            (Shape::Null(_), _) => ErrorCode::SchemaMandatesNull,
            // containers and corrupt tags are handled by `node`
            (Shape::Map(_) | Shape::List(_) | Shape::Corrupt(_), _) => ErrorCode::SchemaInvalid,
        };
        self.mismatch(code, node, path, found)
    }

    fn object<'v>(
        &mut self,
        members: &'v Map<String, Value>,
        children: &[Node<'_, C>],
        path: &mut Path<'v>,
    ) -> Result<()> {
        self.config.trace(format_args!("JSON object processing"));

        if let Some(open) = schema::open_key(children) {
            self.config.trace(format_args!("JSON variable key object processing"));
            for (key, child) in members {
                path.descend(key, |path| self.node(child, open, path))?;
            }
            return Ok(());
        }

        self.config.trace(format_args!("JSON fixed key object processing"));
        for (key, child) in members {
            match children.iter().find(|n| n.key == Some(key.as_str())) {
                Some(node) => path.descend(key, |path| self.node(child, node, path))?,
                None => self.unexpected_key(key, path)?,
            }
        }
        Ok(())
    }

    /// Every element is checked against every alternative, in order; the first
    /// unsuppressed fault ends the list.
    fn list<'v>(&mut self, items: &'v [Value], alternatives: &[Node<'_, C>], path: &mut Path<'v>) -> Result<()> {
        self.config.trace(format_args!("JSON list/array processing"));
        for item in items {
            for alternative in alternatives {
                self.node(item, alternative, path)?;
            }
        }
        Ok(())
    }

    fn unexpected_key(&mut self, key: &str, path: &Path<'_>) -> Result<()> {
        let rendered = path.render();
        let message = format!("key {key} unexpected while parsing map at {rendered}");
        self.config.raise(&Fault {
            code: ErrorCode::UnexpectedKey,
            reason: ErrorCode::UnexpectedKey.reason(),
            message: &message,
            detail: Detail::Key { key, path: &rendered },
        })
    }

    fn mismatch(&mut self, code: ErrorCode, node: &Node<'_, C>, path: &Path<'_>, found: JsonKind) -> Result<()> {
        let rendered = path.render();
        let message = format!(
            "{} ({}) must be {} at {rendered}, found {found}",
            node.label(),
            node.description,
            expectation(code),
        );
        self.config.raise(&Fault {
            code,
            reason: code.reason(),
            message: &message,
            detail: Detail::Node {
                key: node.key,
                description: node.description,
                path: &rendered,
                found,
            },
        })
    }
}

fn expectation(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::SchemaMandatesString => "a string",
        ErrorCode::SchemaMandatesInt => "an integer",
        ErrorCode::SchemaMandatesDouble => "a double/float",
        ErrorCode::SchemaMandatesBool => "a boolean",
        ErrorCode::SchemaMandatesNull => "a null",
        ErrorCode::SchemaMandatesMap => "a map/object",
        ErrorCode::SchemaMandatesList => "a list/array",
        _ => "valid",
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
