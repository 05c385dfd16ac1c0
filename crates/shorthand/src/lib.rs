//! # shorthand
//!
//! A one-line key/value syntax for nested, typed structured data, and a renderer
//! that turns structured data back into it.
//!
//! Shorthand is meant for command lines: trailing arguments are joined into one
//! string, parsed, and built into an object the caller marshals as JSON or YAML.
//! Dotted keys nest objects, brackets build lists, `.key` and `[]` continue from
//! the last touched node, `{...}` groups fields, and `@file` values pull in file
//! contents.
//!
//! ## Quick start
//!
//! ```rust
//! use shorthand::{parse_and_build, render, Value};
//!
//! let obj = parse_and_build("args", "foo.bar: 1, .baz: true, tags: a, b").unwrap();
//! assert_eq!(obj.get("tags").and_then(Value::as_list).map(Vec::len), Some(2));
//!
//! let json = serde_json::to_string(&obj).unwrap();
//! assert_eq!(json, r#"{"foo":{"bar":1,"baz":true},"tags":["a","b"]}"#);
//!
//! assert_eq!(render(&obj), "foo{bar: 1, baz: true}, tags: a, b");
//! ```
//!
//! ## Modules
//!
//! - [`parser`] — shorthand text → [`Ast`]
//! - [`builder`] — [`Ast`] → [`Object`], including `@file` resolution
//! - [`render`](mod@render) — [`Object`] → shorthand text
//! - [`types`] — the [`Value`] tree and its serde/serde_json conversions
//! - [`options`] — build configuration
//! - [`error`] — error type

pub mod ast;
pub mod builder;
pub mod error;
mod modifier;
pub mod options;
pub mod parser;
pub mod render;
pub mod types;

pub use ast::{Ast, Index, KeyPart, KeyValue, ValueExpr};
pub use builder::build;
pub use error::{Result, ShorthandError};
pub use options::Options;
pub use parser::parse;
pub use render::render;
pub use types::{Object, Value};

/// Parse and build in one step with default [`Options`].
///
/// `source_name` is only used in error messages.
pub fn parse_and_build(source_name: &str, input: &str) -> Result<Object> {
    parse_and_build_with(source_name, input, &Options::default())
}

/// Parse and build in one step.
pub fn parse_and_build_with(source_name: &str, input: &str, options: &Options) -> Result<Object> {
    let ast = parse(source_name, input)?;
    let object = build(&ast, options)?;
    tracing::debug!(source_name, fields = object.len(), "built shorthand document");
    Ok(object)
}
