//! Tree builder: applies an [`Ast`] to an empty object, entry by entry.
//!
//! The builder tracks two cursors, both stored as paths from the root and
//! resolved again on every use:
//!
//! - **context**: the object that keys are written into. Reset to the root by
//!   ordinary keys, kept by `.key` back-references.
//! - **active list**: the list that a leading `[` back-reference continues.
//!   Updated by every bracketed key part and by storing a list value under a key.
//!
//! Descending through an existing value of the wrong kind is a
//! [`ShorthandError::Structure`] error. `Null` counts as absent. Terminal
//! assignments always overwrite.

use crate::ast::{Ast, Index, KeyPart, KeyValue, ValueExpr};
use crate::error::{Result, ShorthandError};
use crate::modifier;
use crate::options::Options;
use crate::types::{Object, Value};
use std::fmt::Write;

/// Build an AST into an object. Nested groups are built recursively with a
/// fresh scope; the first error aborts the whole build.
pub fn build(ast: &Ast, options: &Options) -> Result<Object> {
    let mut builder = Builder {
        options,
        root: Value::Object(Object::new()),
        context: Vec::new(),
        active_list: None,
    };
    for entry in ast {
        builder.apply(entry)?;
    }
    match builder.root {
        Value::Object(obj) => Ok(obj),
        other => Err(structure(&[], format!("root became {}", other.kind()))),
    }
}

/// Largest list a build may produce. Indices at or past it are a
/// [`ShorthandError::Structure`] error instead of a huge `Null` padding.
pub const MAX_LIST_LEN: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Key(String),
    Index(usize),
}

type Path = Vec<Step>;

#[derive(Clone, Copy)]
enum Kind {
    Object,
    List,
}

impl Kind {
    fn empty(self) -> Value {
        match self {
            Kind::Object => Value::Object(Object::new()),
            Kind::List => Value::List(Vec::new()),
        }
    }

    fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Kind::Object, Value::Object(_)) | (Kind::List, Value::List(_))
        )
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::List => "list",
        }
    }
}

struct Builder<'o> {
    options: &'o Options,
    root: Value,
    context: Path,
    active_list: Option<Path>,
}

impl Builder<'_> {
    fn apply(&mut self, entry: &KeyValue) -> Result<()> {
        // Values resolve before anything is placed.
        let value = self.resolve_value(&entry.value)?;
        tracing::trace!(key = %entry, kind = value.kind(), "applying entry");

        if entry.reset_context {
            self.context.clear();
        }

        let (last, prefix) = entry
            .parts
            .split_last()
            .ok_or_else(|| structure(&self.context, "entry has an empty key".into()))?;
        for part in prefix {
            self.walk(part, None)?;
        }
        self.walk(last, Some(value))
    }

    fn resolve_value(&self, expr: &ValueExpr) -> Result<Value> {
        match expr {
            ValueExpr::Group(ast) => build(ast, self.options).map(Value::Object),
            ValueExpr::EmptyList => Ok(Value::List(Vec::new())),
            ValueExpr::Scalar {
                token,
                force_string,
            } => self.resolve_scalar(token, *force_string),
            ValueExpr::List {
                tokens,
                force_string,
            } => tokens
                .iter()
                .map(|token| self.resolve_scalar(token, *force_string))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
        }
    }

    fn resolve_scalar(&self, token: &str, force_string: bool) -> Result<Value> {
        if force_string {
            return Ok(Value::String(token.to_string()));
        }
        match token.strip_prefix('@') {
            Some(reference) if !reference.is_empty() => {
                modifier::load_file(reference, self.options)
            }
            _ => Ok(Value::infer(token)),
        }
    }

    /// Apply one key part. `value` is `Some` only for the last part of a key.
    fn walk(&mut self, part: &KeyPart, value: Option<Value>) -> Result<()> {
        if part.indices.is_empty() {
            let name = part
                .name
                .as_deref()
                .ok_or_else(|| structure(&self.context, "key part has no name".into()))?;
            let mut child = self.context.clone();
            child.push(Step::Key(name.to_string()));
            match value {
                Some(value) => {
                    let is_list = matches!(value, Value::List(_));
                    object_at(&mut self.root, &self.context)?.insert(name, value);
                    if is_list {
                        self.active_list = Some(child);
                    }
                }
                None => {
                    self.ensure(&self.context.clone(), Step::Key(name.to_string()), Kind::Object)?;
                    self.context = child;
                }
            }
            return Ok(());
        }

        let mut list = match &part.name {
            Some(name) => {
                let parent = self.context.clone();
                self.ensure(&parent, Step::Key(name.clone()), Kind::List)?
            }
            None => self
                .active_list
                .clone()
                .ok_or_else(|| structure(&self.context, "no list to continue with '['".into()))?,
        };
        self.active_list = Some(list.clone());

        let mut value = value;
        let count = part.indices.len();
        for (n, index) in part.indices.iter().enumerate() {
            let slot = self.claim_slot(&list, *index)?;
            if n + 1 < count {
                list = self.ensure(&list, Step::Index(slot), Kind::List)?;
                self.active_list = Some(list.clone());
            } else if let Some(value) = value.take() {
                list_at(&mut self.root, &list)?[slot] = value;
            } else {
                self.context = self.ensure(&list, Step::Index(slot), Kind::Object)?;
            }
        }
        Ok(())
    }

    /// Turn an index into a concrete position, padding the list with `Null`.
    /// Lists never grow past [`MAX_LIST_LEN`] slots.
    fn claim_slot(&mut self, list_path: &[Step], index: Index) -> Result<usize> {
        let list = list_at(&mut self.root, list_path)?;
        let slot = match index {
            Index::Append => list.len(),
            Index::At(n) => n,
        };
        let len = slot
            .checked_add(1)
            .filter(|len| *len <= MAX_LIST_LEN)
            .ok_or_else(|| {
                structure(
                    list_path,
                    format!("list index {} exceeds the limit of {} items", slot, MAX_LIST_LEN),
                )
            })?;
        if list.len() < len {
            list.resize(len, Value::Null);
        }
        Ok(slot)
    }

    /// Make sure `parent/step` holds a node of `kind`, creating it when absent
    /// or `Null`. Returns the child's path.
    fn ensure(&mut self, parent: &[Step], step: Step, kind: Kind) -> Result<Path> {
        let mut child = parent.to_vec();
        child.push(step.clone());

        let parent_node = node_at(&mut self.root, parent)
            .ok_or_else(|| structure(parent, "path no longer exists".into()))?;
        let slot = match (&step, parent_node) {
            (Step::Key(key), Value::Object(obj)) => {
                if !obj.contains_key(key) {
                    obj.insert(key.clone(), Value::Null);
                }
                obj.get_mut(key)
            }
            (Step::Index(i), Value::List(items)) => items.get_mut(*i),
            (_, other) => {
                let found = other.kind();
                return Err(structure(parent, format!("expected object or list, found {}", found)));
            }
        };
        let slot = slot.ok_or_else(|| structure(&child, "missing slot".into()))?;

        if slot.is_null() {
            *slot = kind.empty();
        } else if !kind.matches(slot) {
            let found = slot.kind();
            return Err(structure(
                &child,
                format!("expected {}, found {}", kind.name(), found),
            ));
        }
        Ok(child)
    }
}

fn node_at<'v>(root: &'v mut Value, path: &[Step]) -> Option<&'v mut Value> {
    let mut node = root;
    for step in path {
        node = match (step, node) {
            (Step::Key(key), Value::Object(obj)) => obj.get_mut(key)?,
            (Step::Index(i), Value::List(items)) => items.get_mut(*i)?,
            _ => return None,
        };
    }
    Some(node)
}

fn object_at<'v>(root: &'v mut Value, path: &[Step]) -> Result<&'v mut Object> {
    match node_at(root, path) {
        Some(Value::Object(obj)) => Ok(obj),
        Some(other) => {
            let found = other.kind();
            Err(structure(path, format!("expected object, found {}", found)))
        }
        None => Err(structure(path, "path no longer exists".into())),
    }
}

fn list_at<'v>(root: &'v mut Value, path: &[Step]) -> Result<&'v mut Vec<Value>> {
    match node_at(root, path) {
        Some(Value::List(items)) => Ok(items),
        Some(other) => {
            let found = other.kind();
            Err(structure(path, format!("expected list, found {}", found)))
        }
        None => Err(structure(path, "path no longer exists".into())),
    }
}

fn structure(path: &[Step], message: String) -> ShorthandError {
    ShorthandError::Structure {
        path: display_path(path),
        message,
    }
}

/// `foo[2].bar`, or `(root)` for the empty path.
fn display_path(path: &[Step]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for step in path {
        match step {
            Step::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Step::Index(i) => {
                let _ = write!(out, "[{}]", i);
            }
        }
    }
    out
}
