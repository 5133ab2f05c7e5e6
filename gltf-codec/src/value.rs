//! Raw value types captured for fields the schema does not model.
//!
//! A [`Value`] is a small tagged tree mirroring the token structure it was
//! read from. Values are never interpreted by the codec, only stored and
//! written back, so numbers keep their original text.

use std::fmt;

/// A JSON number, kept exactly as written.
///
/// Keeping the lexeme (rather than an `f64`) makes unknown fields round-trip
/// byte for byte: `1.50`, `1e3` and `-0` come back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(Box<str>);

impl Number {
    /// Parse a number lexeme. Returns None unless the whole input is a
    /// valid JSON number.
    pub fn parse(text: &str) -> Option<Number> {
        match number_len(text.as_bytes()) {
            Ok(len) if len == text.len() => Some(Number(text.into())),
            _ => None,
        }
    }

    /// Shortest lexeme that reads back as `value`.
    ///
    /// Integral values keep a fractional part (`1.0`), so a float field
    /// written by the codec stays recognizable as a float. Returns None for
    /// NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Number> {
        if !value.is_finite() {
            return None;
        }
        // Debug formatting is shortest-roundtrip and always emits `.0` or an
        // exponent, both valid JSON.
        Some(Number(format!("{value:?}").into()))
    }

    /// The number as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to `f64`. Magnitudes beyond `f64` range become infinite.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        // The lexeme was validated on construction.
        self.0.parse().unwrap_or(f64::NAN)
    }

    /// Convert to `u64` if the lexeme is a non-negative integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        if !self.is_integer() {
            return None;
        }
        self.0.parse().ok()
    }

    /// Check if the lexeme has no fraction and no exponent.
    #[inline]
    pub fn is_integer(&self) -> bool {
        !self.0.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number(value.to_string().into())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why [`number_len`] rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberError {
    /// Input ended where a digit was required.
    Incomplete,
    /// A byte that cannot continue the number.
    Invalid(&'static str),
}

/// Length of the JSON number at the start of `bytes`.
///
/// Grammar: `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
pub(crate) fn number_len(bytes: &[u8]) -> Result<usize, NumberError> {
    let mut pos = 0;

    if bytes.first() == Some(&b'-') {
        pos += 1;
    }

    match bytes.get(pos) {
        Some(b'0') => pos += 1,
        Some(b'1'..=b'9') => pos += digits_len(&bytes[pos..]),
        Some(_) => return Err(NumberError::Invalid("expected digit")),
        None => return Err(NumberError::Incomplete),
    }

    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        let frac = digits_len(&bytes[pos..]);
        if frac == 0 {
            return Err(missing_digit(bytes, pos, "expected digit after decimal point"));
        }
        pos += frac;
    }

    if let Some(b'e' | b'E') = bytes.get(pos) {
        pos += 1;
        if let Some(b'+' | b'-') = bytes.get(pos) {
            pos += 1;
        }
        let exp = digits_len(&bytes[pos..]);
        if exp == 0 {
            return Err(missing_digit(bytes, pos, "expected digit in exponent"));
        }
        pos += exp;
    }

    Ok(pos)
}

#[inline]
fn missing_digit(bytes: &[u8], pos: usize, message: &'static str) -> NumberError {
    if pos == bytes.len() {
        NumberError::Incomplete
    } else {
        NumberError::Invalid(message)
    }
}

#[inline]
fn digits_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// A captured value of any shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,

    /// `true` or `false`
    Bool(bool),

    /// Number lexeme
    Number(Number),

    /// Decoded string
    String(String),

    /// Array elements in order
    Array(Vec<Value>),

    /// Object members in source order
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Check if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as object members.
    #[inline]
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Look up an object member by name (first match).
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}
