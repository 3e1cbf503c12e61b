//! Declarative JSON-to-callback binding.
//!
//! Describe the expected document once as a tree of typed [`Node`]s, then walk
//! parsed documents against it: every accepted scalar calls its node's callback
//! with the value and the [`Path`] it was found at, every shape mismatch or
//! unknown key goes through the error handler of the walk's [`Config`].

pub mod error;
pub mod ingest;
pub mod path;
pub mod report;
pub mod schema;
pub mod schema_file;
pub mod walk;
mod path_de;

use std::path::Path as FsPath;

use serde_json::Value;

pub use error::{Category, Error, ErrorCode, Result};
pub use ingest::{read_file, read_str};
pub use path::Path;
pub use path_de::DecodeError;
pub use report::{Config, Detail, ErrorHandler, Fault, LogLevel, Logger, Severity};
pub use schema::{Kind, Node, Schema, Shape};
pub use schema_file::{Handlers, SchemaFile, SchemaFileError};
pub use walk::{JsonKind, walk};

/// Walk an already parsed document.
pub fn parse<C>(value: &Value, schema: &Schema<'_, C>, ctx: &mut C, config: &Config) -> Result<()> {
    walk(value, schema, ctx, config)
}

/// Parse `text` as JSON, then walk it.
pub fn parse_str<C>(text: &str, schema: &Schema<'_, C>, ctx: &mut C, config: &Config) -> Result<()> {
    let value = read_str(text, config)?;
    walk(&value, schema, ctx, config)
}

/// Read and parse the file at `path`, then walk it.
pub fn parse_file<C>(
    path: impl AsRef<FsPath>,
    schema: &Schema<'_, C>,
    ctx: &mut C,
    config: &Config,
) -> Result<()> {
    let value = read_file(path, config)?;
    walk(&value, schema, ctx, config)
}

/// `/`-joined key path, `/` for the root.
pub fn render_path(path: &Path<'_>) -> String {
    path.render()
}
