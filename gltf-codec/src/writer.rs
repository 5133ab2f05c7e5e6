//! Token writers and the write-side helpers schema types share.
//!
//! [`JsonWriter`] produces compact JSON: no insignificant whitespace, member
//! order exactly as written. It checks that calls are balanced (every value
//! inside an object is preceded by a name, containers are closed) so that a
//! buggy serializer fails loudly instead of producing malformed text.

use crate::error::{Error, ErrorKind, Result};
use crate::value::{Number, Value};

// ============================================================================
// TokenWriter
// ============================================================================

/// Sequential token sink mirroring [`TokenReader`](crate::TokenReader).
pub trait TokenWriter {
    fn write_object_start(&mut self) -> Result<()>;
    fn write_object_end(&mut self) -> Result<()>;
    fn write_array_start(&mut self) -> Result<()>;
    fn write_array_end(&mut self) -> Result<()>;
    fn write_property_name(&mut self, name: &str) -> Result<()>;
    fn write_null(&mut self) -> Result<()>;
    fn write_bool(&mut self, value: bool) -> Result<()>;
    fn write_number(&mut self, value: &Number) -> Result<()>;
    fn write_string(&mut self, value: &str) -> Result<()>;

    /// Write a float field value. NaN and infinities are rejected.
    fn write_f64(&mut self, value: f64) -> Result<()> {
        let number = Number::from_f64(value)
            .ok_or_else(|| Error::new(ErrorKind::NonFiniteNumber { value }))?;
        self.write_number(&number)
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_number(&Number::from(value))
    }
}

// ============================================================================
// JsonWriter
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    has_items: bool,
}

/// Token writer producing compact JSON text.
#[derive(Debug, Default)]
pub struct JsonWriter {
    out: Vec<u8>,
    stack: Vec<Frame>,
    /// A property name was written and its value is pending.
    after_name: bool,
    /// The top-level value is complete.
    done: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the output buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Finish writing and return the bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.stack.is_empty() || self.after_name {
            return Err(Error::writer("unclosed container"));
        }
        Ok(self.out)
    }

    /// Finish writing and return the text.
    pub fn into_string(self) -> Result<String> {
        let bytes = self.into_bytes()?;
        // Only ever fed from &str and ASCII punctuation.
        String::from_utf8(bytes).map_err(|_| Error::writer("output is not UTF-8"))
    }

    /// Bookkeeping before any value (scalar or container start).
    fn begin_value(&mut self) -> Result<()> {
        if self.after_name {
            self.after_name = false;
            return Ok(());
        }
        match self.stack.last_mut() {
            Some(Frame {
                container: Container::Array,
                has_items,
            }) => {
                if *has_items {
                    self.out.push(b',');
                }
                *has_items = true;
                Ok(())
            }
            Some(Frame {
                container: Container::Object,
                ..
            }) => Err(Error::writer("object member without a property name")),
            None if self.done => Err(Error::writer("more than one top-level value")),
            None => Ok(()),
        }
    }

    /// Bookkeeping after a complete value.
    fn end_value(&mut self) {
        if self.stack.is_empty() {
            self.done = true;
        }
    }

    fn open(&mut self, container: Container, byte: u8) -> Result<()> {
        self.begin_value()?;
        self.out.push(byte);
        self.stack.push(Frame {
            container,
            has_items: false,
        });
        Ok(())
    }

    fn close(&mut self, container: Container, byte: u8) -> Result<()> {
        if self.after_name {
            return Err(Error::writer("property name without a value"));
        }
        match self.stack.pop() {
            Some(frame) if frame.container == container => {
                self.out.push(byte);
                self.end_value();
                Ok(())
            }
            _ => Err(Error::writer("mismatched container end")),
        }
    }

    fn push_string(&mut self, s: &str) {
        self.out.push(b'"');
        let bytes = s.as_bytes();
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let escape: &[u8] = match b {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x08 => b"\\b",
                0x0c => b"\\f",
                0x00..=0x1f => {
                    self.out.extend_from_slice(&bytes[start..i]);
                    self.out.extend_from_slice(format!("\\u{b:04x}").as_bytes());
                    start = i + 1;
                    continue;
                }
                _ => continue,
            };
            self.out.extend_from_slice(&bytes[start..i]);
            self.out.extend_from_slice(escape);
            start = i + 1;
        }
        self.out.extend_from_slice(&bytes[start..]);
        self.out.push(b'"');
    }

    fn scalar(&mut self, text: &[u8]) -> Result<()> {
        self.begin_value()?;
        self.out.extend_from_slice(text);
        self.end_value();
        Ok(())
    }
}

impl TokenWriter for JsonWriter {
    fn write_object_start(&mut self) -> Result<()> {
        self.open(Container::Object, b'{')
    }

    fn write_object_end(&mut self) -> Result<()> {
        self.close(Container::Object, b'}')
    }

    fn write_array_start(&mut self) -> Result<()> {
        self.open(Container::Array, b'[')
    }

    fn write_array_end(&mut self) -> Result<()> {
        self.close(Container::Array, b']')
    }

    fn write_property_name(&mut self, name: &str) -> Result<()> {
        if self.after_name {
            return Err(Error::writer("property name without a value"));
        }
        match self.stack.last_mut() {
            Some(Frame {
                container: Container::Object,
                has_items,
            }) => {
                if *has_items {
                    self.out.push(b',');
                }
                *has_items = true;
            }
            _ => return Err(Error::writer("property name outside an object")),
        }
        self.push_string(name);
        self.out.push(b':');
        self.after_name = true;
        Ok(())
    }

    fn write_null(&mut self) -> Result<()> {
        self.scalar(b"null")
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        let text: &[u8] = if value { b"true" } else { b"false" };
        self.scalar(text)
    }

    fn write_number(&mut self, value: &Number) -> Result<()> {
        self.scalar(value.as_str().as_bytes())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.begin_value()?;
        self.push_string(value);
        self.end_value();
        Ok(())
    }
}

// ============================================================================
// Write helpers
// ============================================================================

/// Write a captured value back out, token for token.
pub fn write_value<W: TokenWriter + ?Sized>(writer: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::Null => writer.write_null(),
        Value::Bool(b) => writer.write_bool(*b),
        Value::Number(n) => writer.write_number(n),
        Value::String(s) => writer.write_string(s),
        Value::Array(items) => {
            writer.write_array_start()?;
            for item in items {
                write_value(writer, item)?;
            }
            writer.write_array_end()
        }
        Value::Object(members) => {
            writer.write_object_start()?;
            for (name, member) in members {
                writer.write_property_name(name)?;
                write_value(writer, member)?;
            }
            writer.write_object_end()
        }
    }
}

/// Write `"name":value` for a float field.
pub fn write_f64_field<W: TokenWriter + ?Sized>(writer: &mut W, name: &str, value: f64) -> Result<()> {
    writer.write_property_name(name)?;
    writer.write_f64(value).map_err(|e| e.in_field(name))
}

/// Write `"name":"value"` for a string field.
pub fn write_str_field<W: TokenWriter + ?Sized>(writer: &mut W, name: &str, value: &str) -> Result<()> {
    writer.write_property_name(name)?;
    writer.write_string(value)
}

/// Write `"name":[...]` for a float vector field.
pub fn write_floats_field<W: TokenWriter + ?Sized>(
    writer: &mut W,
    name: &str,
    values: &[f64],
) -> Result<()> {
    writer.write_property_name(name)?;
    writer.write_array_start()?;
    for (i, &v) in values.iter().enumerate() {
        writer
            .write_f64(v)
            .map_err(|e| e.in_index(i).in_field(name))?;
    }
    writer.write_array_end()
}
