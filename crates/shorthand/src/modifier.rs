//! `@file` value resolution.
//!
//! - `@name`: `.json` / `.yaml` / `.yml` files are decoded into a value tree,
//!   anything else becomes UTF-8 text.
//! - `@~name`: always UTF-8 text.
//! - `@%name`: base64 of the raw bytes.
//!
//! Each token costs one blocking read; nothing is cached between calls.

use crate::error::{Result, ShorthandError};
use crate::options::Options;
use crate::types::Value;
use base64::prelude::*;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Encoding {
    /// Pick by file extension.
    Detect,
    Text,
    Base64,
}

/// Resolve the text after `@` into the value it names.
pub(crate) fn load_file(reference: &str, options: &Options) -> Result<Value> {
    let (encoding, name) = if let Some(name) = reference.strip_prefix('~') {
        (Encoding::Text, name)
    } else if let Some(name) = reference.strip_prefix('%') {
        (Encoding::Base64, name)
    } else {
        (Encoding::Detect, reference)
    };

    let path = options.resolve_path(name);
    if !options.allow_files {
        return Err(ShorthandError::FileRead {
            path,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "file loading is disabled"),
        });
    }

    let data = std::fs::read(&path).map_err(|source| ShorthandError::FileRead {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = data.len(), ?encoding, "loaded file value");

    match encoding {
        Encoding::Base64 => Ok(Value::String(BASE64_STANDARD.encode(&data))),
        Encoding::Text => decode_text(&path, data),
        Encoding::Detect if name.ends_with(".json") => {
            let json: serde_json::Value =
                serde_json::from_slice(&data).map_err(|e| decode_error(&path, e))?;
            Ok(Value::from(json))
        }
        Encoding::Detect if name.ends_with(".yaml") || name.ends_with(".yml") => {
            let yaml: serde_json::Value =
                serde_yaml::from_slice(&data).map_err(|e| decode_error(&path, e))?;
            Ok(Value::from(yaml))
        }
        Encoding::Detect => decode_text(&path, data),
    }
}

fn decode_text(path: &Path, data: Vec<u8>) -> Result<Value> {
    String::from_utf8(data)
        .map(Value::String)
        .map_err(|e| decode_error(path, e))
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> ShorthandError {
    ShorthandError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
