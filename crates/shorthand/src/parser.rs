//! Shorthand grammar: turns one line of text into an [`Ast`].
//!
//! ```text
//! document   := entry (',' entry)*
//! entry      := key ':' value | key group
//! key        := backref? part ('.' part)*
//! backref    := '.' | '['
//! part       := identifier index*
//! index      := '[' digits? ']'
//! value      := group | '[]' | '~'? scalar (',' scalar)*
//! group      := '{' document? '}'
//! ```
//!
//! Scalars are raw text up to the next `,` (or `}` inside a group), trimmed.
//! A comma after a scalar starts a new entry only when the text after it scans
//! as a key followed by `:` or `{`; otherwise it continues a scalar list.
//! Whitespace around `.`, `:`, `,` and braces is insignificant.

use crate::ast::{Ast, Index, KeyPart, KeyValue, ValueExpr};
use crate::error::{Result, ShorthandError};

/// Characters that can never appear in a key name.
const KEY_RESERVED: &[char] = &['.', '[', ']', '{', '}', ':', ',', '~', '@', '"'];

/// Parse shorthand text into an AST. `source_name` only appears in error messages.
pub fn parse(source_name: &str, input: &str) -> Result<Ast> {
    let mut parser = Parser {
        source_name,
        input,
        pos: 0,
    };
    let ast = parser.parse_document(false)?;
    tracing::debug!(source_name, entries = ast.len(), "parsed shorthand");
    Ok(ast)
}

/// Cursor over the input. Cloning is cheap and used for lookahead.
#[derive(Clone)]
struct Parser<'a> {
    source_name: &'a str,
    input: &'a str,
    /// Byte offset into `input`, always on a char boundary.
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn at_document_end(&self, in_group: bool) -> bool {
        match self.peek() {
            None => true,
            Some('}') => in_group,
            Some(_) => false,
        }
    }

    /// Entries up to end of input, or up to (not including) the closing `}` of a group.
    fn parse_document(&mut self, in_group: bool) -> Result<Ast> {
        let mut entries = Vec::new();
        self.skip_ws();
        if self.at_document_end(in_group) {
            return Ok(entries);
        }
        loop {
            entries.push(self.parse_entry(in_group)?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.at_document_end(in_group) {
                return Ok(entries);
            }
            return Err(self.unexpected("',' between entries"));
        }
    }

    fn parse_entry(&mut self, in_group: bool) -> Result<KeyValue> {
        let (reset_context, parts) = self.parse_key()?;
        self.skip_ws();
        let value = if self.eat('{') {
            self.parse_group_body()?
        } else if self.eat(':') {
            self.parse_value(in_group)?
        } else {
            return Err(self.unexpected("':' or '{' after key"));
        };
        Ok(KeyValue {
            reset_context,
            parts,
            value,
        })
    }

    /// Called just after the opening `{`.
    fn parse_group_body(&mut self) -> Result<ValueExpr> {
        let ast = self.parse_document(true)?;
        if !self.eat('}') {
            return Err(self.unexpected("'}' to close group"));
        }
        Ok(ValueExpr::Group(ast))
    }

    fn parse_key(&mut self) -> Result<(bool, Vec<KeyPart>)> {
        self.skip_ws();
        let mut parts = Vec::new();
        let reset_context = match self.peek() {
            Some('.') => {
                self.bump();
                self.skip_ws();
                false
            }
            Some('[') => {
                parts.push(KeyPart {
                    name: None,
                    indices: self.parse_indices()?,
                });
                false
            }
            _ => true,
        };
        if parts.is_empty() {
            parts.push(self.parse_part()?);
        }
        loop {
            let checkpoint = self.pos;
            self.skip_ws();
            if !self.eat('.') {
                self.pos = checkpoint;
                break;
            }
            self.skip_ws();
            parts.push(self.parse_part()?);
        }
        Ok((reset_context, parts))
    }

    fn parse_part(&mut self) -> Result<KeyPart> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace() && !KEY_RESERVED.contains(&c)) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected("a key name"));
        }
        let name = self.input[start..self.pos].to_string();
        Ok(KeyPart {
            name: Some(name),
            indices: self.parse_indices()?,
        })
    }

    fn parse_indices(&mut self) -> Result<Vec<Index>> {
        let mut indices = Vec::new();
        while self.eat('[') {
            self.skip_ws();
            let start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
            let digits = &self.input[start..self.pos];
            let index = if digits.is_empty() {
                Index::Append
            } else {
                let n = digits.parse::<usize>().map_err(|_| {
                    self.error_at(start, format!("list index {} is too large", digits))
                })?;
                Index::At(n)
            };
            self.skip_ws();
            if !self.eat(']') {
                return Err(self.unexpected("']' to close index"));
            }
            indices.push(index);
        }
        Ok(indices)
    }

    /// Called just after the `:` of an entry.
    fn parse_value(&mut self, in_group: bool) -> Result<ValueExpr> {
        let force_string = self.eat('~');
        self.skip_ws();
        if !force_string {
            if self.eat('{') {
                return self.parse_group_body();
            }
            if self.at_empty_list(in_group) {
                self.pos += "[]".len();
                return Ok(ValueExpr::EmptyList);
            }
        }

        let mut tokens = vec![self.scan_scalar(in_group)];
        loop {
            let checkpoint = self.pos;
            if !self.eat(',') {
                break;
            }
            if self.starts_entry() {
                self.pos = checkpoint;
                break;
            }
            let token_start = self.pos;
            let token = self.scan_scalar(in_group);
            if token.is_empty() {
                return Err(self.error_at(token_start, "expected a list item after ','".into()));
            }
            tokens.push(token);
        }

        if tokens.len() == 1 {
            let token = tokens.pop().unwrap_or_default();
            Ok(ValueExpr::Scalar {
                token,
                force_string,
            })
        } else {
            Ok(ValueExpr::List {
                tokens,
                force_string,
            })
        }
    }

    /// Raw scalar text up to the next delimiter, trimmed. Leaves the cursor on the delimiter.
    fn scan_scalar(&mut self, in_group: bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ',' || (in_group && c == '}') {
                break;
            }
            self.bump();
        }
        self.input[start..self.pos].trim().to_string()
    }

    /// Lookahead: does the text after a comma begin a new `key:` / `key{` entry?
    fn starts_entry(&self) -> bool {
        let mut ahead = self.clone();
        if ahead.parse_key().is_err() {
            return false;
        }
        ahead.skip_ws();
        matches!(ahead.peek(), Some(':') | Some('{'))
    }

    /// Lookahead: is the value a bare `[]`?
    fn at_empty_list(&self, in_group: bool) -> bool {
        let mut ahead = self.clone();
        if !ahead.rest().starts_with("[]") {
            return false;
        }
        ahead.pos += "[]".len();
        ahead.skip_ws();
        matches!(ahead.peek(), None | Some(','))
            || (in_group && ahead.peek() == Some('}'))
    }

    fn unexpected(&self, expected: &str) -> ShorthandError {
        let message = match self.peek() {
            Some(c) => format!("expected {}, found '{}'", expected, c),
            None => format!("expected {}, found end of input", expected),
        };
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: String) -> ShorthandError {
        let consumed = &self.input[..pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |current| current.chars().count())
            + 1;
        ShorthandError::Syntax {
            source_name: self.source_name.to_string(),
            line,
            column,
            message,
        }
    }
}
