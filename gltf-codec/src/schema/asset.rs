//! `asset`: metadata about the glTF document.

use crate::error::Result;
use crate::property::{ExtensionBag, Property};
use crate::reader::{read_object, read_string, TokenReader};
use crate::root::GltfRoot;
use crate::writer::{write_str_field, TokenWriter};

/// Metadata about the document: who made it and which format version it
/// targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asset {
    /// Content owner, suitable for display.
    pub copyright: Option<String>,
    /// Tool that produced the document.
    pub generator: Option<String>,
    /// glTF version the document targets (`"2.0"`). Always written.
    pub version: String,
    /// Minimum glTF version a loader must support.
    pub min_version: Option<String>,
    pub bag: ExtensionBag,
}

impl Asset {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }
}

impl Property for Asset {
    const KIND: &'static str = "asset";

    fn deserialize<R: TokenReader + ?Sized>(_root: &GltfRoot, reader: &mut R) -> Result<Self> {
        let mut asset = Asset::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "copyright" => asset.copyright = Some(read_string(r)?),
                "generator" => asset.generator = Some(read_string(r)?),
                "version" => asset.version = read_string(r)?,
                "minVersion" => asset.min_version = Some(read_string(r)?),
                _ => asset.bag.read_default_property(name, r)?,
            }
            Ok(())
        })?;
        Ok(asset)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        if let Some(copyright) = &self.copyright {
            write_str_field(writer, "copyright", copyright)?;
        }
        if let Some(generator) = &self.generator {
            write_str_field(writer, "generator", generator)?;
        }
        write_str_field(writer, "version", &self.version)?;
        if let Some(min_version) = &self.min_version {
            write_str_field(writer, "minVersion", min_version)?;
        }
        self.bag.serialize(writer)?;
        writer.write_object_end()
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}
