//! The root document.
//!
//! [`GltfRoot`] owns every top-level array. It is built first and handed by
//! reference to each nested deserializer; cross-object references are stored
//! as [`Index`] values and resolved against the finished root on demand.

use log::debug;

use crate::error::{Context, Result};
use crate::property::{ExtensionBag, Index, Property};
use crate::reader::{read_array, read_object, read_string, JsonReader, ReadOptions, TokenReader};
use crate::schema::{Asset, Camera, Node, Scene};
use crate::writer::{JsonWriter, TokenWriter};

// ============================================================================
// Reference resolution
// ============================================================================

/// Types stored in one of the root's top-level arrays.
pub trait RootArray: Sized {
    /// Name used in resolution errors.
    const KIND: &'static str;

    fn items(root: &GltfRoot) -> &[Self];
}

impl RootArray for Camera {
    const KIND: &'static str = "camera";

    fn items(root: &GltfRoot) -> &[Self] {
        &root.cameras
    }
}

impl RootArray for Node {
    const KIND: &'static str = "node";

    fn items(root: &GltfRoot) -> &[Self] {
        &root.nodes
    }
}

impl RootArray for Scene {
    const KIND: &'static str = "scene";

    fn items(root: &GltfRoot) -> &[Self] {
        &root.scenes
    }
}

// ============================================================================
// GltfRoot
// ============================================================================

/// A complete glTF document.
///
/// Top-level members the crate does not model (`meshes`, `accessors`,
/// `buffers`, ...) are kept verbatim in `bag` and written back after the
/// modelled ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GltfRoot {
    /// Names of extensions used anywhere in the document.
    pub extensions_used: Vec<String>,
    /// Names of extensions a loader must support.
    pub extensions_required: Vec<String>,
    pub asset: Asset,
    /// Scene to display when none is selected.
    pub scene: Option<Index<Scene>>,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub cameras: Vec<Camera>,
    pub bag: ExtensionBag,
}

impl GltfRoot {
    /// Parse a document with default options.
    pub fn from_slice(bytes: &[u8]) -> Result<GltfRoot> {
        Self::from_slice_with(bytes, ReadOptions::default())
    }

    pub fn from_slice_with(bytes: &[u8], options: ReadOptions) -> Result<GltfRoot> {
        let mut reader = JsonReader::with_options(bytes, options);
        let root = Self::read(&mut reader)?;
        reader.finish()?;
        Ok(root)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<GltfRoot> {
        Self::from_slice(s.as_bytes())
    }

    /// Read a document from any token source.
    ///
    /// The reader must be positioned before the document's `ObjectStart`.
    pub fn read<R: TokenReader + ?Sized>(reader: &mut R) -> Result<GltfRoot> {
        let mut root = GltfRoot::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "extensionsUsed" => root.extensions_used = read_array(r, |r| read_string(r))?,
                "extensionsRequired" => {
                    root.extensions_required = read_array(r, |r| read_string(r))?
                }
                "asset" => root.asset = Asset::deserialize(&root, r)?,
                "scene" => root.scene = Some(Index::read(r)?),
                "scenes" => root.scenes = read_array(r, |r| Scene::deserialize(&root, r))?,
                "nodes" => root.nodes = read_array(r, |r| Node::deserialize(&root, r))?,
                "cameras" => root.cameras = read_array(r, |r| Camera::deserialize(&root, r))?,
                _ => root.bag.read_default_property(name, r)?,
            }
            Ok(())
        })?;

        debug!(
            "read glTF {}: {} scenes, {} nodes, {} cameras, {} unmodelled members",
            root.asset.version,
            root.scenes.len(),
            root.nodes.len(),
            root.cameras.len(),
            root.bag.len()
        );
        Ok(root)
    }

    /// Serialize as compact JSON bytes.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut writer = JsonWriter::with_capacity(1024);
        self.serialize(&mut writer)?;
        writer.into_bytes()
    }

    /// Serialize as compact JSON text.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String> {
        let mut writer = JsonWriter::with_capacity(1024);
        self.serialize(&mut writer)?;
        writer.into_string()
    }

    /// Resolve an index into the array holding `T`.
    #[inline]
    pub fn get<T: RootArray>(&self, index: Index<T>) -> Result<&T> {
        index.get(self)
    }

    /// The default scene, if the document names one.
    pub fn default_scene(&self) -> Option<Result<&Scene>> {
        self.scene.map(|index| index.get(self).in_field("scene"))
    }

    /// Resolve every index in the document.
    ///
    /// Reading never checks references; call this to find dangling ones.
    /// The error path names the offending member, e.g. `nodes[2].camera`.
    pub fn check_references(&self) -> Result<()> {
        if let Some(scene) = self.scene {
            scene.get(self).in_field("scene")?;
        }
        for (i, scene) in self.scenes.iter().enumerate() {
            scene.check_references(self).in_index(i).in_field("scenes")?;
        }
        for (i, node) in self.nodes.iter().enumerate() {
            node.check_references(self).in_index(i).in_field("nodes")?;
        }
        Ok(())
    }
}

impl Property for GltfRoot {
    const KIND: &'static str = "glTF document";

    /// A document is its own root; the context argument is not consulted.
    fn deserialize<R: TokenReader + ?Sized>(_context: &GltfRoot, reader: &mut R) -> Result<Self> {
        Self::read(reader)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        write_strings(writer, "extensionsUsed", &self.extensions_used)?;
        write_strings(writer, "extensionsRequired", &self.extensions_required)?;
        writer.write_property_name("asset")?;
        self.asset.serialize(writer).in_field("asset")?;
        if let Some(scene) = self.scene {
            writer.write_property_name("scene")?;
            scene.write(writer)?;
        }
        write_items(writer, "scenes", &self.scenes)?;
        write_items(writer, "nodes", &self.nodes)?;
        write_items(writer, "cameras", &self.cameras)?;
        self.bag.serialize(writer)?;
        writer.write_object_end()?;

        debug!(
            "wrote glTF {}: {} scenes, {} nodes, {} cameras, {} unmodelled members",
            self.asset.version,
            self.scenes.len(),
            self.nodes.len(),
            self.cameras.len(),
            self.bag.len()
        );
        Ok(())
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}

/// Write a non-empty string array member.
fn write_strings<W: TokenWriter + ?Sized>(writer: &mut W, name: &str, items: &[String]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writer.write_property_name(name)?;
    writer.write_array_start()?;
    for item in items {
        writer.write_string(item)?;
    }
    writer.write_array_end()
}

/// Write a non-empty array of objects.
fn write_items<W, T>(writer: &mut W, name: &str, items: &[T]) -> Result<()>
where
    W: TokenWriter + ?Sized,
    T: Property,
{
    if items.is_empty() {
        return Ok(());
    }
    writer.write_property_name(name)?;
    writer.write_array_start()?;
    for (i, item) in items.iter().enumerate() {
        item.serialize(writer).in_index(i).in_field(name)?;
    }
    writer.write_array_end()
}
