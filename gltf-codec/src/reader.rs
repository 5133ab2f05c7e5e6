//! Token readers and the read-side helpers every schema type builds on.
//!
//! # Architecture
//!
//! ```text
//! Input bytes        JsonReader            Deserializers
//!     │                  │                       │
//!     │──&[u8]──────────▶│                       │
//!     │                  │◀──next_token()────────│
//!     │                  │──Token───────────────▶│
//!     │                  │◀──peek_token()────────│ (array element lookahead)
//! ```
//!
//! The reader is forward-only. A deserializer consumes exactly the tokens of
//! the value it was asked to read and leaves the reader positioned right
//! after that value's last token.
//!
//! # Positioning convention
//!
//! Every `read_*` helper and every [`Property::deserialize`] is called with
//! the reader positioned *before* the value: object readers consume their own
//! `ObjectStart`, array readers their own `ArrayStart`.
//!
//! [`Property::deserialize`]: crate::Property::deserialize

use memchr::memchr3;

use crate::error::{Context, Error, ErrorKind, Result};
use crate::token::Token;
use crate::value::{number_len, Number, NumberError, Value};

// ============================================================================
// TokenReader
// ============================================================================

/// Sequential, forward-only token source.
///
/// `Ok(None)` means the stream has ended. Ending inside an unfinished value
/// is reported by the read helpers as [`ErrorKind::Truncated`].
pub trait TokenReader {
    /// Consume and return the next token.
    fn next_token(&mut self) -> Result<Option<Token>>;

    /// Return the next token without consuming it.
    fn peek_token(&mut self) -> Result<Option<&Token>>;

    /// Options the current parse runs with.
    fn options(&self) -> ReadOptions {
        ReadOptions::default()
    }
}

/// Parse-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Maximum container nesting before the reader gives up.
    pub max_depth: usize,
    /// Reject cameras carrying both `orthographic` and `perspective`
    /// instead of keeping both.
    pub strict_camera_variants: bool,
}

impl ReadOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strict_camera_variants(mut self, strict: bool) -> Self {
        self.strict_camera_variants = strict;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            strict_camera_variants: false,
        }
    }
}

// ============================================================================
// JsonReader
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// What the scanner expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the top-level value
    Start,
    /// After `{`: a name or `}`
    ObjectFirst,
    /// After a member value: `,` or `}`
    ObjectNext,
    /// After a member name: `:` then a value
    ObjectValue,
    /// After `[`: a value or `]`
    ArrayFirst,
    /// After an element: `,` or `]`
    ArrayNext,
    /// Top-level value complete
    Done,
}

/// Token reader over JSON text.
///
/// Validates structure as it goes (commas, colons, bracket matching), decodes
/// string escapes and keeps number lexemes verbatim.
#[derive(Debug)]
pub struct JsonReader<'a> {
    input: &'a [u8],
    pos: usize,
    stack: Vec<Frame>,
    state: State,
    peeked: Option<Token>,
    options: ReadOptions,
}

impl<'a> JsonReader<'a> {
    /// Create a reader with default options.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, ReadOptions::default())
    }

    /// Create a reader with explicit options.
    pub fn with_options(input: &'a [u8], options: ReadOptions) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::with_capacity(16),
            state: State::Start,
            peeked: None,
            options,
        }
    }

    /// Check that nothing but whitespace follows the top-level value.
    pub fn finish(&mut self) -> Result<()> {
        if self.peeked.is_some() || self.state != State::Done {
            return Err(ErrorKind::TrailingContent { offset: self.pos }.into());
        }
        self.skip_whitespace();
        if self.pos < self.input.len() {
            return Err(ErrorKind::TrailingContent { offset: self.pos }.into());
        }
        Ok(())
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek_byte() {
            self.pos += 1;
        }
    }

    fn scan(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };

        match self.state {
            State::Done => Err(ErrorKind::TrailingContent { offset: self.pos }.into()),
            State::ArrayFirst if b == b']' => {
                self.pos += 1;
                Ok(Some(self.close(Frame::Array)))
            }
            State::Start | State::ArrayFirst => self.scan_value(),
            State::ObjectFirst => match b {
                b'}' => {
                    self.pos += 1;
                    Ok(Some(self.close(Frame::Object)))
                }
                b'"' => self.scan_name(),
                _ => Err(Error::syntax(self.pos, "expected property name or '}'")),
            },
            State::ObjectNext => match b {
                b',' => {
                    self.pos += 1;
                    self.skip_whitespace();
                    match self.peek_byte() {
                        None => Ok(None),
                        Some(b'"') => self.scan_name(),
                        Some(_) => Err(Error::syntax(self.pos, "expected property name")),
                    }
                }
                b'}' => {
                    self.pos += 1;
                    Ok(Some(self.close(Frame::Object)))
                }
                _ => Err(Error::syntax(self.pos, "expected ',' or '}'")),
            },
            State::ObjectValue => {
                if b != b':' {
                    return Err(Error::syntax(self.pos, "expected ':'"));
                }
                self.pos += 1;
                self.skip_whitespace();
                if self.peek_byte().is_none() {
                    return Ok(None);
                }
                self.scan_value()
            }
            State::ArrayNext => match b {
                b',' => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek_byte().is_none() {
                        return Ok(None);
                    }
                    self.scan_value()
                }
                b']' => {
                    self.pos += 1;
                    Ok(Some(self.close(Frame::Array)))
                }
                _ => Err(Error::syntax(self.pos, "expected ',' or ']'")),
            },
        }
    }

    /// Scan a value starting at the current (non-whitespace) byte.
    fn scan_value(&mut self) -> Result<Option<Token>> {
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };

        match b {
            b'{' => {
                self.open(Frame::Object)?;
                Ok(Some(Token::ObjectStart))
            }
            b'[' => {
                self.open(Frame::Array)?;
                Ok(Some(Token::ArrayStart))
            }
            b'"' => {
                let Some(s) = self.scan_string()? else {
                    return Ok(None);
                };
                self.after_value();
                Ok(Some(Token::String(s)))
            }
            b't' => self.scan_literal(b"true", Token::Bool(true)),
            b'f' => self.scan_literal(b"false", Token::Bool(false)),
            b'n' => self.scan_literal(b"null", Token::Null),
            b'-' | b'0'..=b'9' => {
                let rest = &self.input[self.pos..];
                let len = match number_len(rest) {
                    Ok(len) => len,
                    Err(NumberError::Incomplete) => return Ok(None),
                    Err(NumberError::Invalid(msg)) => return Err(Error::syntax(self.pos, msg)),
                };
                // Validated ASCII, so the slice is valid UTF-8.
                let text = std::str::from_utf8(&rest[..len])
                    .map_err(|_| Error::syntax(self.pos, "invalid number"))?;
                let number = Number::parse(text)
                    .ok_or_else(|| Error::syntax(self.pos, "invalid number"))?;
                self.pos += len;
                self.after_value();
                Ok(Some(Token::Number(number)))
            }
            _ => Err(Error::syntax(self.pos, "expected value")),
        }
    }

    fn scan_name(&mut self) -> Result<Option<Token>> {
        let Some(name) = self.scan_string()? else {
            return Ok(None);
        };
        self.state = State::ObjectValue;
        Ok(Some(Token::PropertyName(name)))
    }

    fn scan_literal(&mut self, literal: &'static [u8], token: Token) -> Result<Option<Token>> {
        let rest = &self.input[self.pos..];
        if rest.starts_with(literal) {
            self.pos += literal.len();
            self.after_value();
            Ok(Some(token))
        } else if literal.starts_with(rest) {
            // Input ends partway through the literal.
            Ok(None)
        } else {
            Err(Error::syntax(self.pos, "invalid literal"))
        }
    }

    /// Scan a quoted string at the current `"`.
    ///
    /// Returns None if the input ends before the closing quote.
    fn scan_string(&mut self) -> Result<Option<String>> {
        let start = self.pos;
        self.pos += 1;
        let mut buf: Vec<u8> = Vec::new();

        loop {
            let rest = &self.input[self.pos..];
            let Some(offset) = memchr3(b'"', b'\\', b'\n', rest) else {
                if let Some(bad) = rest.iter().position(|&b| b < 0x20) {
                    return Err(Error::syntax(self.pos + bad, "control character in string"));
                }
                return Ok(None);
            };

            let chunk = &rest[..offset];
            if let Some(bad) = chunk.iter().position(|&b| b < 0x20) {
                return Err(Error::syntax(self.pos + bad, "control character in string"));
            }
            buf.extend_from_slice(chunk);
            self.pos += offset;

            match rest[offset] {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    self.pos += 1;
                    if !self.scan_escape(&mut buf)? {
                        return Ok(None);
                    }
                }
                _ => return Err(Error::syntax(self.pos, "control character in string")),
            }
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|_| Error::syntax(start, "invalid UTF-8 in string"))
    }

    /// Decode one escape sequence (after the backslash) into `buf`.
    ///
    /// Returns false if the input ends inside the escape.
    fn scan_escape(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        let Some(b) = self.peek_byte() else {
            return Ok(false);
        };
        self.pos += 1;

        let decoded = match b {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let Some(ch) = self.scan_unicode_escape()? else {
                    return Ok(false);
                };
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                return Ok(true);
            }
            _ => return Err(Error::syntax(self.pos - 1, "invalid escape")),
        };
        buf.push(decoded);
        Ok(true)
    }

    /// Decode `XXXX` (and a trailing `\uXXXX` low surrogate when needed).
    fn scan_unicode_escape(&mut self) -> Result<Option<char>> {
        let Some(high) = self.scan_hex4()? else {
            return Ok(None);
        };

        let code = match high {
            0xD800..=0xDBFF => {
                let rest = &self.input[self.pos..];
                if rest.len() < 2 {
                    return if b"\\u".starts_with(rest) {
                        Ok(None)
                    } else {
                        Err(Error::syntax(self.pos, "unpaired surrogate"))
                    };
                }
                if &rest[..2] != b"\\u" {
                    return Err(Error::syntax(self.pos, "unpaired surrogate"));
                }
                self.pos += 2;
                let Some(low) = self.scan_hex4()? else {
                    return Ok(None);
                };
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(Error::syntax(self.pos - 4, "unpaired surrogate"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(Error::syntax(self.pos - 4, "unpaired surrogate")),
            _ => high,
        };

        char::from_u32(code)
            .map(Some)
            .ok_or_else(|| Error::syntax(self.pos, "invalid unicode escape"))
    }

    fn scan_hex4(&mut self) -> Result<Option<u32>> {
        let rest = &self.input[self.pos..];
        let mut value = 0u32;
        for i in 0..4 {
            let Some(&b) = rest.get(i) else {
                return Ok(None);
            };
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(Error::syntax(self.pos + i, "invalid unicode escape")),
            };
            value = (value << 4) | digit as u32;
        }
        self.pos += 4;
        Ok(Some(value))
    }

    fn open(&mut self, frame: Frame) -> Result<()> {
        if self.stack.len() >= self.options.max_depth {
            return Err(ErrorKind::DepthLimit {
                limit: self.options.max_depth,
            }
            .into());
        }
        self.pos += 1;
        self.stack.push(frame);
        self.state = match frame {
            Frame::Object => State::ObjectFirst,
            Frame::Array => State::ArrayFirst,
        };
        Ok(())
    }

    fn close(&mut self, frame: Frame) -> Token {
        debug_assert_eq!(self.stack.last(), Some(&frame));
        self.stack.pop();
        self.after_value();
        match frame {
            Frame::Object => Token::ObjectEnd,
            Frame::Array => Token::ArrayEnd,
        }
    }

    fn after_value(&mut self) {
        self.state = match self.stack.last() {
            Some(Frame::Object) => State::ObjectNext,
            Some(Frame::Array) => State::ArrayNext,
            None => State::Done,
        };
    }
}

impl TokenReader for JsonReader<'_> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.peeked.take() {
            return Ok(Some(token));
        }
        self.scan()
    }

    fn peek_token(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.scan()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn options(&self) -> ReadOptions {
        self.options
    }
}

// ============================================================================
// Read helpers
// ============================================================================

/// Consume the next token, treating end of stream as truncation.
pub fn expect_token<R: TokenReader + ?Sized>(reader: &mut R, expected: &'static str) -> Result<Token> {
    reader.next_token()?.ok_or_else(|| Error::truncated(expected))
}

/// Read an object, handing every member name to `on_field`.
///
/// `on_field` must consume exactly one value. Errors raised inside it are
/// tagged with the member name.
pub fn read_object<R, F>(reader: &mut R, what: &'static str, mut on_field: F) -> Result<()>
where
    R: TokenReader + ?Sized,
    F: FnMut(&str, &mut R) -> Result<()>,
{
    match expect_token(reader, what)? {
        Token::ObjectStart => {}
        other => return Err(Error::structural(what, other)),
    }

    loop {
        match reader.next_token()? {
            Some(Token::PropertyName(name)) => on_field(&name, reader).in_field(&name)?,
            Some(Token::ObjectEnd) => return Ok(()),
            Some(other) => return Err(Error::structural("property name or '}'", other)),
            None => return Err(Error::truncated(what)),
        }
    }
}

/// Read an array, calling `on_item` once per element.
pub fn read_array<R, T, F>(reader: &mut R, mut on_item: F) -> Result<Vec<T>>
where
    R: TokenReader + ?Sized,
    F: FnMut(&mut R) -> Result<T>,
{
    match expect_token(reader, "array")? {
        Token::ArrayStart => {}
        other => return Err(Error::structural("array", other)),
    }

    let mut items = Vec::new();
    loop {
        let at_end = match reader.peek_token()? {
            Some(Token::ArrayEnd) => true,
            Some(_) => false,
            None => return Err(Error::truncated("array")),
        };
        if at_end {
            reader.next_token()?;
            return Ok(items);
        }
        let index = items.len();
        items.push(on_item(reader).in_index(index)?);
    }
}

/// Read a string scalar.
pub fn read_string<R: TokenReader + ?Sized>(reader: &mut R) -> Result<String> {
    match expect_token(reader, "string")? {
        Token::String(s) => Ok(s),
        other => Err(Error::conversion("string", other)),
    }
}

/// Read a number scalar as `f64`.
pub fn read_f64<R: TokenReader + ?Sized>(reader: &mut R) -> Result<f64> {
    match expect_token(reader, "number")? {
        Token::Number(n) => Ok(n.as_f64()),
        other => Err(Error::conversion("number", other)),
    }
}

/// Read a number that must stay finite once converted to `f64`.
///
/// Lexemes beyond the `f64` range would read as infinity and could not be
/// written back, so they are rejected here.
pub fn read_finite_f64<R: TokenReader + ?Sized>(reader: &mut R) -> Result<f64> {
    match read_f64(reader)? {
        value if value.is_finite() => Ok(value),
        value => Err(Error::conversion("finite number", value)),
    }
}

/// Read a non-negative integer that fits an index.
pub fn read_u32<R: TokenReader + ?Sized>(reader: &mut R) -> Result<u32> {
    match expect_token(reader, "index")? {
        Token::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| Error::conversion("index", Token::Number(n))),
        other => Err(Error::conversion("index", other)),
    }
}

/// Read a fixed-length array of numbers (vectors, quaternions, matrices).
pub fn read_floats<R: TokenReader + ?Sized, const N: usize>(reader: &mut R) -> Result<[f64; N]> {
    let items = read_array(reader, |r| read_finite_f64(r))?;
    let found = items.len();
    items.try_into().map_err(|_| {
        Error::new(ErrorKind::ScalarConversion {
            expected: "fixed-length number array",
            found: format!("array of {found} numbers (expected {N})"),
        })
    })
}

/// Capture the next value verbatim, recursing through containers.
pub fn read_value<R: TokenReader + ?Sized>(reader: &mut R) -> Result<Value> {
    let first = expect_token(reader, "value")?;
    value_from(first, reader)
}

fn value_from<R: TokenReader + ?Sized>(first: Token, reader: &mut R) -> Result<Value> {
    match first {
        Token::Null => Ok(Value::Null),
        Token::Bool(b) => Ok(Value::Bool(b)),
        Token::Number(n) => Ok(Value::Number(n)),
        Token::String(s) => Ok(Value::String(s)),
        Token::ArrayStart => {
            let mut items = Vec::new();
            loop {
                match expect_token(reader, "array")? {
                    Token::ArrayEnd => return Ok(Value::Array(items)),
                    token => {
                        let index = items.len();
                        items.push(value_from(token, reader).in_index(index)?);
                    }
                }
            }
        }
        Token::ObjectStart => {
            let mut members = Vec::new();
            loop {
                match expect_token(reader, "object")? {
                    Token::ObjectEnd => return Ok(Value::Object(members)),
                    Token::PropertyName(name) => {
                        let value = read_value(reader).in_field(&name)?;
                        members.push((name, value));
                    }
                    other => return Err(Error::structural("property name or '}'", other)),
                }
            }
        }
        other => Err(Error::structural("value", other)),
    }
}
