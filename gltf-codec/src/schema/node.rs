//! Nodes of the scene hierarchy.

use crate::error::{Context, Result};
use crate::property::{ChildOfRoot, ExtensionBag, Index, Property};
use crate::reader::{read_array, read_floats, read_object, TokenReader};
use crate::root::GltfRoot;
use crate::schema::Camera;
use crate::writer::{write_floats_field, TokenWriter};

/// Column-major 4x4 identity.
pub const IDENTITY_MATRIX: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Unit quaternion `(x, y, z, w)`.
pub const IDENTITY_ROTATION: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// A node in the scene hierarchy.
///
/// A node may carry a local transform either as `matrix` or as
/// `translation`/`rotation`/`scale`. Each member is omitted on write while it
/// holds its identity value. Members this type does not model (`mesh`,
/// `skin`, `weights`) are kept in the extension bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub camera: Option<Index<Camera>>,
    pub children: Vec<Index<Node>>,
    pub matrix: [f64; 16],
    pub rotation: [f64; 4],
    pub scale: [f64; 3],
    pub translation: [f64; 3],
    pub child: ChildOfRoot,
    pub bag: ExtensionBag,
}

impl Node {
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.child.name.as_deref()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            camera: None,
            children: Vec::new(),
            matrix: IDENTITY_MATRIX,
            rotation: IDENTITY_ROTATION,
            scale: [1.0; 3],
            translation: [0.0; 3],
            child: ChildOfRoot::default(),
            bag: ExtensionBag::default(),
        }
    }
}

impl Property for Node {
    const KIND: &'static str = "node";

    fn deserialize<R: TokenReader + ?Sized>(_root: &GltfRoot, reader: &mut R) -> Result<Self> {
        let mut node = Node::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "camera" => node.camera = Some(Index::read(r)?),
                "children" => node.children = read_array(r, |r| Index::read(r))?,
                "matrix" => node.matrix = read_floats(r)?,
                "rotation" => node.rotation = read_floats(r)?,
                "scale" => node.scale = read_floats(r)?,
                "translation" => node.translation = read_floats(r)?,
                _ => {
                    if !node.child.read_field(name, r)? {
                        node.bag.read_default_property(name, r)?;
                    }
                }
            }
            Ok(())
        })?;
        Ok(node)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        if let Some(camera) = self.camera {
            writer.write_property_name("camera")?;
            camera.write(writer)?;
        }
        if !self.children.is_empty() {
            writer.write_property_name("children")?;
            writer.write_array_start()?;
            for child in &self.children {
                child.write(writer)?;
            }
            writer.write_array_end()?;
        }
        if self.matrix != IDENTITY_MATRIX {
            write_floats_field(writer, "matrix", &self.matrix)?;
        }
        if self.rotation != IDENTITY_ROTATION {
            write_floats_field(writer, "rotation", &self.rotation)?;
        }
        if self.scale != [1.0; 3] {
            write_floats_field(writer, "scale", &self.scale)?;
        }
        if self.translation != [0.0; 3] {
            write_floats_field(writer, "translation", &self.translation)?;
        }
        self.child.serialize(writer)?;
        self.bag.serialize(writer)?;
        writer.write_object_end()
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}

impl Node {
    /// Resolve every reference this node holds against `root`.
    pub(crate) fn check_references(&self, root: &GltfRoot) -> Result<()> {
        if let Some(camera) = self.camera {
            camera.get(root).in_field("camera")?;
        }
        for (i, child) in self.children.iter().enumerate() {
            child.get(root).in_index(i).in_field("children")?;
        }
        Ok(())
    }
}
