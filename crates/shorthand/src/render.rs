//! Renderer: turns a value tree back into shorthand text.
//!
//! Output is canonical, not a replay of how the tree was written:
//!
//! - **Sorted keys**: object fields are emitted in ascending key order
//! - **Back-reference collapse**: a nested single-key object is `.key: value`
//!   rather than `{key: value}`
//! - **Groups**: nested multi-key objects become `{a: 1, b: 2}`
//! - **Scalar lists**: `: 1, 2, 3` when the comma form re-parses to the same list,
//!   otherwise one `[]` entry per item
//! - **List continuation**: per-item entries continue with `[]`, or with a full
//!   path like `foo[1]` once a nested list has taken over `[]`
//! - **Forced strings**: strings the parser would coerce get `:~`
//! - **File placeholder**: strings over 50 characters or with a newline become `@file`
//!
//! # Example
//! ```
//! use shorthand::{parse_and_build, render};
//! let obj = parse_and_build("example", "foo{bar: 1, baz: 2}").unwrap();
//! assert_eq!(render(&obj), "foo{bar: 1, baz: 2}");
//! ```

use crate::types::{Object, Value};

/// Strings longer than this many characters are replaced by [`FILE_PLACEHOLDER`].
pub const MAX_INLINE_STRING: usize = 50;

/// Stand-in for values that belong in an external file.
pub const FILE_PLACEHOLDER: &str = "@file";

/// Render an object as shorthand. The result has no trailing delimiter.
pub fn render(object: &Object) -> String {
    let mut out = String::new();
    render_fields(object, &mut out);
    out
}

/// `k1<v1>, k2<v2>` in ascending key order.
fn render_fields(object: &Object, out: &mut String) {
    let mut fields: Vec<(&String, &Value)> = object.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    for (i, (key, value)) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        render_value(value, key, out);
    }
}

/// Everything that follows a key: `.child...`, `{...}`, list forms, or `: scalar`.
///
/// `path` is the key text that addresses `value` from the start of the current
/// scope (the document, or the enclosing group), e.g. `foo[1].bar`.
fn render_value(value: &Value, path: &str, out: &mut String) {
    match value {
        Value::Object(obj) if obj.len() == 1 => {
            for (key, child) in obj.iter() {
                out.push('.');
                out.push_str(key);
                render_value(child, &format!("{}.{}", path, key), out);
            }
        }
        Value::Object(obj) => {
            out.push('{');
            render_fields(obj, out);
            out.push('}');
        }
        Value::List(items) => render_list(items, path, out),
        scalar => {
            out.push(':');
            match scalar {
                Value::String(s) if needs_force(s) && !is_placeholder(s) => out.push_str("~ "),
                _ => out.push(' '),
            }
            render_scalar(scalar, out);
        }
    }
}

/// Lists pick the most compact form that parses back to the same list:
///
/// 1. **Empty**: `: []`
/// 2. **Comma list**: two or more scalars → `: v1, v2` (or `:~ v1, v2` when every
///    item is a string and some of them need forcing)
/// 3. **Per-item**: anything else → `[]<v1>, []<v2>`
///
/// In the per-item form, once an item has left some nested list active, the
/// remaining items are addressed by full path (`foo[1]<v2>`) so that `[]`
/// does not continue the nested list instead.
fn render_list(items: &[Value], path: &str, out: &mut String) {
    if items.is_empty() {
        out.push_str(": []");
        return;
    }

    if let Some(forced) = comma_form(items) {
        out.push_str(if forced { ":~ " } else { ": " });
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_scalar(item, out);
        }
        return;
    }

    let mut qualify = false;
    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", path, i);
        if i > 0 {
            out.push_str(", ");
        }
        if qualify {
            out.push_str(&item_path);
        } else {
            out.push_str("[]");
        }
        render_value(item, &item_path, out);
        qualify |= moves_active_list(item);
    }
}

/// `Some(forced)` when `items` can be written as one comma-separated scalar
/// list, with `forced` telling whether it needs `:~`.
fn comma_form(items: &[Value]) -> Option<bool> {
    if items.len() < 2 || !items.iter().all(fits_comma_list) {
        return None;
    }
    let any_forced = items
        .iter()
        .any(|item| matches!(item, Value::String(s) if needs_force(s) && !is_placeholder(s)));
    let all_strings = items.iter().all(|item| matches!(item, Value::String(_)));
    if any_forced && !all_strings {
        return None;
    }
    Some(any_forced)
}

/// Does rendering this list item leave a list other than its parent active?
///
/// Per-item nested lists do (their brackets descend into them), and so does a
/// single-key chain ending in any list, since a list stored under a key
/// becomes the active list.
fn moves_active_list(item: &Value) -> bool {
    match item {
        Value::List(items) => !items.is_empty() && comma_form(items).is_none(),
        Value::Object(obj) if obj.len() == 1 => {
            let mut node = item;
            while let Value::Object(obj) = node {
                match obj.iter().next() {
                    Some((_, child)) if obj.len() == 1 => node = child,
                    _ => return false,
                }
            }
            matches!(node, Value::List(_))
        }
        _ => false,
    }
}

/// Scalars only; strings that are empty or could be mistaken for the start of
/// the next entry need their own `[]:` entry.
fn fits_comma_list(item: &Value) -> bool {
    match item {
        Value::List(_) | Value::Object(_) => false,
        Value::String(s) => !s.is_empty() && !s.contains([':', '{']),
        _ => true,
    }
}

/// Bare literal text of a scalar (no colon, no modifier).
fn render_scalar(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::String(s) if is_placeholder(s) => out.push_str(FILE_PLACEHOLDER),
        Value::String(s) => out.push_str(s),
        // composites never reach here
        Value::List(_) | Value::Object(_) => out.push_str("null"),
    }
}

/// Floats always keep a `.` or exponent so they re-parse as floats.
fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return "null".to_string();
    }
    let s = f.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Too long or multi-line: should live in a file instead.
fn is_placeholder(s: &str) -> bool {
    s.chars().count() > MAX_INLINE_STRING || s.contains('\n')
}

/// Would this string read back as something else without `~`?
///
/// True for anything the parser coerces (`null`, `true`, `false`, numbers),
/// anything Rust parses as a float, `@file` references, and text the value
/// grammar treats specially (`{...}` groups and the bare `[]` empty list).
fn needs_force(s: &str) -> bool {
    !matches!(Value::infer(s), Value::String(_))
        || s.parse::<f64>().is_ok()
        || s.starts_with('@')
        || s.starts_with('{')
        || s == "[]"
}
