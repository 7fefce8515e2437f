//! Deserializer for PHP `serialize()` payloads found in WordPress meta values.
//!
//! Supports the scalar types (`N`, `b`, `i`, `d`, `s`), arrays (`a`) and plain
//! objects (`O`). Arrays whose keys are exactly `0..n` become JSON arrays,
//! everything else becomes an ordered JSON object. References (`r`, `R`) and
//! custom-serialized objects (`C`) are rejected.

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhpError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    #[error("expected '{expected}' at byte {offset}, found '{found}'")]
    Unexpected {
        expected: char,
        found: char,
        offset: usize,
    },

    #[error("unsupported type marker '{marker}' at byte {offset}")]
    UnsupportedType { marker: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("string at byte {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    #[error("array key at byte {0} must be an integer or a string")]
    InvalidKey(usize),

    #[error("trailing data at byte {0}")]
    TrailingData(usize),

    #[error("nesting too deep at byte {0}")]
    TooDeep(usize),
}

/// Deepest array or object nesting accepted before giving up
pub const MAX_DEPTH: usize = 512;

/// Parse a PHP-serialized string into a JSON value
pub fn unserialize(input: &str) -> Result<Value, PhpError> {
    let mut parser = Parser {
        bytes: input.as_bytes(),
        pos: 0,
        depth: 0,
    };

    let value = parser.value()?;

    if parser.bytes[parser.pos..]
        .iter()
        .any(|b| !b.is_ascii_whitespace())
    {
        return Err(PhpError::TrailingData(parser.pos));
    }

    Ok(value)
}

enum Key {
    Int(i64),
    Str(String),
}

impl Key {
    fn into_string(self) -> String {
        match self {
            Key::Int(i) => i.to_string(),
            Key::Str(s) => s,
        }
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Result<u8, PhpError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(PhpError::UnexpectedEnd(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, expected: u8) -> Result<(), PhpError> {
        let offset = self.pos;
        let found = self.next()?;
        if found != expected {
            return Err(PhpError::Unexpected {
                expected: expected as char,
                found: found as char,
                offset,
            });
        }
        Ok(())
    }

    /// Read up to (and consume) `end`, returning the bytes in between
    fn read_until(&mut self, end: u8) -> Result<&'a str, PhpError> {
        let bytes = self.bytes;
        let start = self.pos;
        let len = bytes[start..]
            .iter()
            .position(|b| *b == end)
            .ok_or(PhpError::UnexpectedEnd(bytes.len()))?;
        self.pos = start + len + 1;
        std::str::from_utf8(&bytes[start..start + len]).map_err(|_| PhpError::InvalidUtf8(start))
    }

    fn read_usize(&mut self, end: u8) -> Result<usize, PhpError> {
        let raw = self.read_until(end)?;
        raw.parse::<usize>()
            .map_err(|_| PhpError::InvalidNumber(raw.to_string()))
    }

    /// Read a `"…"` quoted run of exactly `len` bytes
    fn read_quoted(&mut self, len: usize) -> Result<String, PhpError> {
        self.expect(b'"')?;
        let start = self.pos;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(PhpError::UnexpectedEnd(self.bytes.len()))?;
        let text = std::str::from_utf8(&self.bytes[start..end])
            .map_err(|_| PhpError::InvalidUtf8(start))?
            .to_string();
        self.pos = end;
        self.expect(b'"')?;
        Ok(text)
    }

    fn value(&mut self) -> Result<Value, PhpError> {
        let offset = self.pos;
        match self.next()? {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                match self.read_until(b';')? {
                    "0" => Ok(Value::Bool(false)),
                    "1" => Ok(Value::Bool(true)),
                    other => Err(PhpError::InvalidNumber(other.to_string())),
                }
            }
            b'i' => {
                self.expect(b':')?;
                let raw = self.read_until(b';')?;
                raw.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| PhpError::InvalidNumber(raw.to_string()))
            }
            b'd' => {
                self.expect(b':')?;
                let raw = self.read_until(b';')?;
                let float = match raw {
                    "INF" => f64::INFINITY,
                    "-INF" => f64::NEG_INFINITY,
                    "NAN" => f64::NAN,
                    _ => raw
                        .parse::<f64>()
                        .map_err(|_| PhpError::InvalidNumber(raw.to_string()))?,
                };
                // JSON has no representation for non-finite floats
                Ok(Number::from_f64(float)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.to_string())))
            }
            b's' => {
                self.expect(b':')?;
                let len = self.read_usize(b':')?;
                let text = self.read_quoted(len)?;
                self.expect(b';')?;
                Ok(Value::String(text))
            }
            b'a' => {
                self.expect(b':')?;
                let count = self.read_usize(b':')?;
                let entries = self.entries(count)?;
                Ok(collect_array(entries))
            }
            b'O' => {
                self.expect(b':')?;
                let class_len = self.read_usize(b':')?;
                self.read_quoted(class_len)?;
                self.expect(b':')?;
                let count = self.read_usize(b':')?;
                let entries = self.entries(count)?;
                Ok(Value::Object(
                    entries
                        .into_iter()
                        .map(|(k, v)| (k.into_string(), v))
                        .collect(),
                ))
            }
            marker => Err(PhpError::UnsupportedType {
                marker: marker as char,
                offset,
            }),
        }
    }

    fn entries(&mut self, count: usize) -> Result<Vec<(Key, Value)>, PhpError> {
        if self.depth >= MAX_DEPTH {
            return Err(PhpError::TooDeep(self.pos));
        }
        self.depth += 1;
        let entries = self.entries_at_depth(count);
        self.depth -= 1;
        entries
    }

    fn entries_at_depth(&mut self, count: usize) -> Result<Vec<(Key, Value)>, PhpError> {
        self.expect(b'{')?;
        let mut entries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let offset = self.pos;
            let key = match self.value()? {
                Value::Number(n) => n.as_i64().map(Key::Int),
                Value::String(s) => Some(Key::Str(s)),
                _ => None,
            }
            .ok_or(PhpError::InvalidKey(offset))?;
            let value = self.value()?;
            entries.push((key, value));
        }
        self.expect(b'}')?;
        Ok(entries)
    }
}

fn collect_array(entries: Vec<(Key, Value)>) -> Value {
    let is_list = entries
        .iter()
        .enumerate()
        .all(|(idx, (key, _))| matches!(key, Key::Int(i) if *i == idx as i64));

    if is_list {
        Value::Array(entries.into_iter().map(|(_, v)| v).collect())
    } else {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into_string(), v))
            .collect();
        Value::Object(map)
    }
}
