//! glTF Codec
//!
//! Reads and writes the JSON half of glTF 2.0 documents through a
//! forward-only token stream. Members the schema types do not model are kept
//! verbatim, so a read-then-write round trip loses nothing.
//!
//! # Architecture
//!
//! - **token.rs** - Token enum shared by readers and writers
//! - **reader.rs** - TokenReader trait, JSON scanner, read helpers
//! - **writer.rs** - TokenWriter trait, compact JSON writer, write helpers
//! - **value.rs** - Raw value tree for unmodelled members
//! - **property.rs** - Property trait, ExtensionBag, ChildOfRoot, Index
//! - **root.rs** - GltfRoot and reference resolution
//! - **schema/** - Asset, Camera, Orthographic, Perspective, Node, Scene
//!
//! # Example
//!
//! ```
//! use gltf_codec::{GltfRoot, Perspective};
//!
//! let root = GltfRoot::from_str(r#"{
//!     "asset": {"version": "2.0"},
//!     "cameras": [{"type": "perspective", "perspective": {"yfov": 1.0, "znear": 0.1}}],
//!     "meshes": [{"primitives": []}]
//! }"#)?;
//!
//! let persp: &Perspective = root.cameras[0].perspective.as_ref().unwrap();
//! assert!(persp.is_infinite());
//!
//! assert_eq!(
//!     root.to_string()?,
//!     r#"{"asset":{"version":"2.0"},"cameras":[{"perspective":{"yfov":1.0,"znear":0.1},"type":"perspective"}],"meshes":[{"primitives":[]}]}"#
//! );
//! # Ok::<(), gltf_codec::Error>(())
//! ```

pub mod error;
pub mod property;
pub mod reader;
pub mod root;
pub mod schema;
pub mod token;
pub mod value;
pub mod writer;

pub use error::{Error, ErrorKind, PathSegment, Result};
pub use property::{ChildOfRoot, ExtensionBag, Index, Property, Reserved};
pub use reader::{JsonReader, ReadOptions, TokenReader};
pub use root::{GltfRoot, RootArray};
pub use schema::{Asset, Camera, CameraType, Node, Orthographic, Perspective, Scene};
pub use token::Token;
pub use value::{Number, Value};
pub use writer::{JsonWriter, TokenWriter};

/// Read one object of type `T` from JSON bytes.
///
/// Types other than [`GltfRoot`] are read against an empty root; their
/// index members are kept unresolved.
pub fn from_slice<T: Property>(bytes: &[u8]) -> Result<T> {
    from_slice_with(bytes, ReadOptions::default())
}

/// Like [`from_slice`], with explicit parse options.
pub fn from_slice_with<T: Property>(bytes: &[u8], options: ReadOptions) -> Result<T> {
    let mut reader = JsonReader::with_options(bytes, options);
    let context = GltfRoot::default();
    let value = T::deserialize(&context, &mut reader)?;
    reader.finish()?;
    Ok(value)
}

pub fn from_str<T: Property>(s: &str) -> Result<T> {
    from_slice(s.as_bytes())
}

/// Write `value` as compact JSON bytes.
pub fn to_vec<T: Property>(value: &T) -> Result<Vec<u8>> {
    let mut writer = JsonWriter::new();
    value.serialize(&mut writer)?;
    writer.into_bytes()
}

/// Write `value` as compact JSON text.
pub fn to_string<T: Property>(value: &T) -> Result<String> {
    let mut writer = JsonWriter::new();
    value.serialize(&mut writer)?;
    writer.into_string()
}
