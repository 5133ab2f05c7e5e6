//! Tokens - the vocabulary shared by token readers and writers.
//!
//! This is a SAX-style model: tokens are produced as the reader encounters
//! syntax, with no accumulation. Structure is represented by start/end pairs.
//!
//! For objects: ObjectStart, (PropertyName, value)..., ObjectEnd
//! For arrays: ArrayStart, value..., ArrayEnd
//!
//! A value is either a single scalar token or a balanced start/end run.
//!
//! ```text
//! {"yfov":1.0,"extras":[true]}
//!
//! ObjectStart
//! PropertyName("yfov")
//! Number(1.0)
//! PropertyName("extras")
//! ArrayStart
//! Bool(true)
//! ArrayEnd
//! ObjectEnd
//! ```

use std::fmt;

use crate::value::Number;

/// One token of a structured document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // ========== Structure ==========

    /// `{`
    ObjectStart,

    /// `}`
    ObjectEnd,

    /// `[`
    ArrayStart,

    /// `]`
    ArrayEnd,

    /// Object member name. The member's value follows as the next token(s).
    PropertyName(String),

    // ========== Scalars ==========

    /// `null`
    Null,

    /// `true` / `false`
    Bool(bool),

    /// Number, kept as written.
    Number(Number),

    /// String with escapes already decoded.
    String(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::ObjectStart => f.write_str("'{'"),
            Token::ObjectEnd => f.write_str("'}'"),
            Token::ArrayStart => f.write_str("'['"),
            Token::ArrayEnd => f.write_str("']'"),
            Token::PropertyName(name) => write!(f, "property name {name:?}"),
            Token::Null => f.write_str("null"),
            Token::Bool(b) => write!(f, "boolean {b}"),
            Token::Number(n) => write!(f, "number {n}"),
            Token::String(s) => write!(f, "string {s:?}"),
        }
    }
}
