//! Literal repr for tuple payloads.
//!
//! Tuples travel as `__tuple__(<repr>)` where the repr is a small literal
//! language: `None`, `True`, `False`, integers, floats, single- or
//! double-quoted strings, `(...)` tuples, `[...]` lists and `{k: v}` mappings.
//! The writer produces the canonical form (`(1,)` for one element, strings
//! single-quoted unless they contain `'` and no `"`); the reader accepts
//! either quote style and trailing commas.

use super::CodecError;
use crate::config::{Config, Key, Value};

/// Renders a value in literal form.
///
/// ```
/// use paramtree::{codec::literal, config::Value};
///
/// let tuple = Value::Tuple(vec![Value::Int(1), Value::from("a"), Value::Null]);
/// assert_eq!(literal::repr(&tuple).unwrap(), "(1, 'a', None)");
/// assert_eq!(literal::repr(&Value::Tuple(vec![Value::Int(7)])).unwrap(), "(7,)");
/// ```
pub fn repr(value: &Value) -> Result<String, CodecError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(f) => out.push_str(&float_repr(*f)?),
        Value::Text(s) => write_str(out, s),
        Value::Tuple(items) => {
            out.push('(');
            write_items(out, items)?;
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Value::List(items) => {
            out.push('[');
            write_items(out, items)?;
            out.push(']');
        }
        Value::Config(config) => {
            out.push('{');
            for (i, (key, value)) in config.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match key {
                    Key::Text(s) => write_str(out, s),
                    Key::Int(n) => out.push_str(&n.to_string()),
                    Key::Float(f) => out.push_str(&float_repr(*f)?),
                    other => {
                        return Err(CodecError::Unrepresentable {
                            what: format!("mapping key {other}"),
                            reason: "only string and numeric keys have a literal form".into(),
                        });
                    }
                }
                out.push_str(": ");
                write_value(out, value)?;
            }
            out.push('}');
        }
        other => {
            return Err(CodecError::Unrepresentable {
                what: other.type_name().to_string(),
                reason: "references and instances have no literal form".into(),
            });
        }
    }
    Ok(())
}

fn write_items(out: &mut String, items: &[Value]) -> Result<(), CodecError> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, item)?;
    }
    Ok(())
}

/// Shortest round-tripping float text, always with a decimal point or exponent.
pub(crate) fn float_repr(f: f64) -> Result<String, CodecError> {
    if !f.is_finite() {
        return Err(CodecError::Unrepresentable {
            what: format!("float {f}"),
            reason: "non-finite floats have no literal form".into(),
        });
    }
    Ok(format!("{f:?}"))
}

fn write_str(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Parses a complete literal.
pub fn parse(input: &str) -> Result<Value, CodecError> {
    let mut parser = Parser { input, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Parses a tuple payload, accepting a list literal as well.
pub fn parse_tuple(input: &str) -> Result<Vec<Value>, CodecError> {
    match parse(input)? {
        Value::Tuple(items) | Value::List(items) => Ok(items),
        other => Err(CodecError::InvalidLiteral {
            input: input.to_string(),
            offset: 0,
            reason: format!("expected a tuple, found {}", other.type_name()),
        }),
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> CodecError {
        CodecError::InvalidLiteral {
            input: self.input.to_string(),
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn value(&mut self) -> Result<Value, CodecError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => self.tuple(),
            Some('[') => {
                self.bump();
                Ok(Value::List(self.items(']')?.0))
            }
            Some('{') => self.mapping(),
            Some('\'' | '"') => Ok(Value::Text(self.string()?)),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.name(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn tuple(&mut self) -> Result<Value, CodecError> {
        self.bump();
        let (items, trailing_comma) = self.items(')')?;
        // `(x)` is a parenthesised value, `(x,)` a one-element tuple
        if items.len() == 1 && !trailing_comma {
            let mut items = items;
            return Ok(items.remove(0));
        }
        Ok(Value::Tuple(items))
    }

    /// Comma-separated values up to `close`; reports whether a trailing comma was seen.
    fn items(&mut self, close: char) -> Result<(Vec<Value>, bool), CodecError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.eat(close) {
                return Ok((items, trailing_comma));
            }
            items.push(self.value()?);
            trailing_comma = self.eat(',');
            if !trailing_comma {
                if self.eat(close) {
                    return Ok((items, false));
                }
                return Err(self.error(format!("expected ',' or '{close}'")));
            }
        }
    }

    fn mapping(&mut self) -> Result<Value, CodecError> {
        self.bump();
        let mut config = Config::new();
        loop {
            if self.eat('}') {
                return Ok(Value::Config(config));
            }
            let key = match self.value()? {
                Value::Text(s) => Key::Text(s),
                Value::Int(n) => Key::Int(n),
                Value::Float(f) => Key::Float(f),
                other => {
                    return Err(self.error(format!(
                        "{} cannot be used as a mapping key",
                        other.type_name()
                    )));
                }
            };
            if !self.eat(':') {
                return Err(self.error("expected ':'"));
            }
            let value = self.value()?;
            config.insert(key, value);
            if !self.eat(',') {
                if self.eat('}') {
                    return Ok(Value::Config(config));
                }
                return Err(self.error("expected ',' or '}'"));
            }
        }
    }

    fn string(&mut self) -> Result<String, CodecError> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self.bump().ok_or_else(|| self.error("dangling escape"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        'r' => out.push('\r'),
                        't' => out.push('\t'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        'x' => out.push(self.hex_escape(2)?),
                        'u' => out.push(self.hex_escape(4)?),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, CodecError> {
        let end = self.pos + digits;
        let hex = self
            .input
            .get(self.pos..end)
            .ok_or_else(|| self.error("truncated escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| self.error("escape is not a valid character"))
    }

    fn number(&mut self) -> Result<Value, CodecError> {
        let start = self.pos;
        let mut is_float = false;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let text = self.input[start..self.pos].replace('_', "");
        if is_float {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|e| self.error(format!("invalid float '{text}': {e}")))
        } else {
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|e| self.error(format!("invalid integer '{text}': {e}")))
        }
    }

    fn name(&mut self) -> Result<Value, CodecError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.input[start..self.pos] {
            "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            other => {
                let reason = format!("unknown name '{other}'");
                self.pos = start;
                Err(self.error(reason))
            }
        }
    }
}
