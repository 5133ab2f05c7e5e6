//! Error types for reading and writing glTF documents.
//!
//! Every failure carries an [`ErrorKind`] plus the path of fields and array
//! indices that were being processed when it happened. The path is recorded
//! while the error unwinds through the enclosing deserializers, so a failure
//! deep inside a camera renders as `cameras[1].perspective.yfov`.

use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// A token of the wrong shape where an object/array boundary was required.
    #[error("expected {expected}, found {found}")]
    Structural {
        expected: &'static str,
        found: String,
    },

    /// The token stream ended in the middle of a value.
    #[error("unexpected end of input while reading {expected}")]
    Truncated { expected: &'static str },

    /// A scalar was present but not convertible to the expected type.
    #[error("cannot read {found} as {expected}")]
    ScalarConversion {
        expected: &'static str,
        found: String,
    },

    /// An index reference points outside its target array.
    #[error("{kind} index {index} is out of range ({len} available)")]
    ReferenceResolution {
        kind: &'static str,
        index: u32,
        len: usize,
    },

    /// Malformed JSON text.
    #[error("syntax error at byte {offset}: {message}")]
    Syntax {
        offset: usize,
        message: &'static str,
    },

    /// Containers nested deeper than the configured limit.
    #[error("nesting exceeds the limit of {limit} levels")]
    DepthLimit { limit: usize },

    /// A camera carries both `orthographic` and `perspective` (strict mode only).
    #[error("camera defines both orthographic and perspective projections")]
    ConflictingCameraVariants,

    /// NaN and infinities have no JSON representation.
    #[error("cannot write non-finite number {value}")]
    NonFiniteNumber { value: f64 },

    /// Bytes left over after the top-level value.
    #[error("trailing content at byte {offset}")]
    TrailingContent { offset: usize },

    /// Token writer misuse (unbalanced containers, value without a name).
    #[error("invalid write: {message}")]
    Writer { message: &'static str },
}

/// One step of the location an error was raised at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member.
    Field(String),
    /// Array element.
    Index(usize),
}

/// Error returned by every codec operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    /// Innermost segment first; reversed for display.
    path: Vec<PathSegment>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    pub(crate) fn structural(expected: &'static str, found: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Structural {
            expected,
            found: found.to_string(),
        })
    }

    pub(crate) fn truncated(expected: &'static str) -> Self {
        Self::new(ErrorKind::Truncated { expected })
    }

    pub(crate) fn conversion(expected: &'static str, found: impl fmt::Display) -> Self {
        Self::new(ErrorKind::ScalarConversion {
            expected,
            found: found.to_string(),
        })
    }

    pub(crate) fn syntax(offset: usize, message: &'static str) -> Self {
        Self::new(ErrorKind::Syntax { offset, message })
    }

    pub(crate) fn writer(message: &'static str) -> Self {
        Self::new(ErrorKind::Writer { message })
    }

    /// The failure category.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Path segments from the outermost object inwards.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Dotted path of the field being processed, e.g. `cameras[0].perspective`.
    ///
    /// Empty when the failure happened at the top level.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in self.segments() {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    pub(crate) fn in_field(mut self, name: &str) -> Self {
        self.path.push(PathSegment::Field(name.to_owned()));
        self
    }

    pub(crate) fn in_index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} (at {})", self.kind, self.path())
        }
    }
}

// No source: `Display` already renders the kind.
impl std::error::Error for Error {}

/// Attach location information to a failing result.
pub(crate) trait Context<T> {
    fn in_field(self, name: &str) -> Result<T>;
    fn in_index(self, index: usize) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[inline]
    fn in_field(self, name: &str) -> Result<T> {
        self.map_err(|e| e.in_field(name))
    }

    #[inline]
    fn in_index(self, index: usize) -> Result<T> {
        self.map_err(|e| e.in_index(index))
    }
}
