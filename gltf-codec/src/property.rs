//! Behavior shared by every schema object.
//!
//! Every glTF object may carry members the schema types do not model:
//! the reserved `extensions` / `extras` containers and arbitrary fields
//! written by newer tools. Those land in an [`ExtensionBag`] embedded in the
//! object, in the order they were read, and are written back last.
//!
//! Objects that live in one of the root's top-level arrays additionally embed
//! a [`ChildOfRoot`] holding their optional display name, and are referred
//! to from elsewhere in the document by [`Index`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use log::trace;
use phf::phf_map;

use crate::error::{ErrorKind, Result};
use crate::reader::{read_string, read_u32, read_value, TokenReader};
use crate::root::{GltfRoot, RootArray};
use crate::value::Value;
use crate::writer::{write_str_field, write_value, TokenWriter};

// ============================================================================
// Property trait
// ============================================================================

/// The read/write contract every schema type implements.
pub trait Property: Sized {
    /// Object name used in diagnostics (`"camera"`, `"asset"`, ...).
    const KIND: &'static str;

    /// Read one object.
    ///
    /// The reader must be positioned before the object's `ObjectStart`;
    /// on success it is positioned right after the matching `ObjectEnd`.
    /// `root` is the document being read; nested objects receive the same
    /// reference.
    fn deserialize<R: TokenReader + ?Sized>(root: &GltfRoot, reader: &mut R) -> Result<Self>;

    /// Write one object, eliding fields that hold their omission value.
    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()>;

    /// Members this object carried that the schema does not model.
    fn extension_bag(&self) -> &ExtensionBag;
}

// ============================================================================
// Reserved member names
// ============================================================================

/// Member names every glTF object reserves for extensibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reserved {
    /// `extensions`: keyed by extension name.
    Extensions,
    /// `extras`: application-specific data.
    Extras,
}

static RESERVED: phf::Map<&'static str, Reserved> = phf_map! {
    "extensions" => Reserved::Extensions,
    "extras" => Reserved::Extras,
};

impl Reserved {
    /// Classify a member name.
    #[inline]
    pub fn lookup(name: &str) -> Option<Reserved> {
        RESERVED.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Reserved::Extensions => "extensions",
            Reserved::Extras => "extras",
        }
    }
}

// ============================================================================
// ExtensionBag
// ============================================================================

/// Ordered, name-unique collection of unrecognized members.
///
/// Values are opaque: they are captured token for token and written back
/// without interpretation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionBag {
    entries: Vec<(String, Value)>,
}

impl ExtensionBag {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a member by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Insert a member, returning the previous value.
    ///
    /// A name that is already present keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a member, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Members in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// The `extensions` container, if present.
    pub fn extensions(&self) -> Option<&Value> {
        self.get(Reserved::Extensions.name())
    }

    /// The `extras` container, if present.
    pub fn extras(&self) -> Option<&Value> {
        self.get(Reserved::Extras.name())
    }

    /// Fallback for members a schema type does not recognize.
    ///
    /// Consumes exactly one value (recursing through nested containers) and
    /// stores it under `name`.
    pub fn read_default_property<R: TokenReader + ?Sized>(
        &mut self,
        name: &str,
        reader: &mut R,
    ) -> Result<()> {
        let value = read_value(reader)?;
        match Reserved::lookup(name) {
            Some(reserved) => trace!("captured reserved container {:?}", reserved.name()),
            None => trace!("captured unknown member {name:?}"),
        }
        self.insert(name, value);
        Ok(())
    }

    /// Write every member in order. Called last, before the object's end.
    pub fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        for (name, value) in &self.entries {
            writer.write_property_name(name)?;
            write_value(writer, value).map_err(|e| e.in_field(name))?;
        }
        Ok(())
    }
}

// ============================================================================
// ChildOfRoot
// ============================================================================

/// Members shared by objects stored in the root's top-level arrays.
///
/// The owning root is not stored here; it is passed to
/// [`Property::deserialize`] and to [`Index::get`](crate::Index::get).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildOfRoot {
    /// User-defined display name.
    pub name: Option<String>,
}

impl ChildOfRoot {
    /// Read `name` if that is the member at hand.
    ///
    /// Returns false (consuming nothing) for any other member.
    pub fn read_field<R: TokenReader + ?Sized>(&mut self, field: &str, reader: &mut R) -> Result<bool> {
        match field {
            "name" => {
                self.name = Some(read_string(reader)?);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        if let Some(name) = &self.name {
            write_str_field(writer, "name", name)?;
        }
        Ok(())
    }
}

// ============================================================================
// Index
// ============================================================================

/// Typed position in one of the root's top-level arrays.
///
/// Indices are plain integers on the wire and are never checked while
/// reading; [`Index::get`] resolves them against a root on demand.
pub struct Index<T> {
    value: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.value
    }

    pub(crate) fn read<R: TokenReader + ?Sized>(reader: &mut R) -> Result<Self> {
        read_u32(reader).map(Self::new)
    }

    pub(crate) fn write<W: TokenWriter + ?Sized>(self, writer: &mut W) -> Result<()> {
        writer.write_u32(self.value)
    }
}

impl<T: RootArray> Index<T> {
    /// Resolve against `root`.
    ///
    /// Fails with [`ErrorKind::ReferenceResolution`] when the index is past
    /// the end of the target array.
    pub fn get(self, root: &GltfRoot) -> Result<&T> {
        let items = T::items(root);
        items.get(self.value as usize).ok_or_else(|| {
            ErrorKind::ReferenceResolution {
                kind: T::KIND,
                index: self.value,
                len: items.len(),
            }
            .into()
        })
    }
}

// Manual impls: the derives would demand the same bounds of `T`.

impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Index<T> {}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({})", self.value)
    }
}

impl<T> fmt::Display for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<u32> for Index<T> {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}
