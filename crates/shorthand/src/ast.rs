//! Parsed form of a shorthand document.
//!
//! An [`Ast`] is a mutation log, not a declarative tree: the builder applies its
//! entries in order, and later entries may overwrite or extend earlier ones.

use std::fmt;

/// All key/value entries of a document (or of one `{ ... }` group).
pub type Ast = Vec<KeyValue>;

/// One `key: value` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    /// `false` for back-references (`.key` / `[...]`), which continue from the
    /// builder's current position instead of the root.
    pub reset_context: bool,
    /// Never empty.
    pub parts: Vec<KeyPart>,
    pub value: ValueExpr,
}

/// A dot-separated segment of a key, with its bracket suffixes.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPart {
    /// `None` only for a leading `[` back-reference.
    pub name: Option<String>,
    pub indices: Vec<Index>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// `[]`: next free position.
    Append,
    /// `[n]`
    At(usize),
}

/// Right-hand side of an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Scalar { token: String, force_string: bool },
    /// `a, b, c` after a single colon. The `~` modifier covers every item.
    List {
        tokens: Vec<String>,
        force_string: bool,
    },
    Group(Ast),
    /// A bare `[]`.
    EmptyList,
}

impl KeyPart {
    pub fn named(name: impl Into<String>) -> Self {
        KeyPart {
            name: Some(name.into()),
            indices: Vec::new(),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Append => f.write_str("[]"),
            Index::At(n) => write!(f, "[{}]", n),
        }
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        for index in &self.indices {
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

impl fmt::Display for KeyValue {
    /// Writes the key as it would appear in source, e.g. `.foo[2].bar`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 || (!self.reset_context && part.name.is_some()) {
                f.write_str(".")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}
