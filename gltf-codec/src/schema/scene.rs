//! Scenes: sets of root nodes to render.

use crate::error::{Context, Result};
use crate::property::{ChildOfRoot, ExtensionBag, Index, Property};
use crate::reader::{read_array, read_object, TokenReader};
use crate::root::GltfRoot;
use crate::schema::Node;
use crate::writer::TokenWriter;

/// The root nodes of one renderable scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<Index<Node>>,
    pub child: ChildOfRoot,
    pub bag: ExtensionBag,
}

impl Scene {
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.child.name.as_deref()
    }

    pub(crate) fn check_references(&self, root: &GltfRoot) -> Result<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            node.get(root).in_index(i).in_field("nodes")?;
        }
        Ok(())
    }
}

impl Property for Scene {
    const KIND: &'static str = "scene";

    fn deserialize<R: TokenReader + ?Sized>(_root: &GltfRoot, reader: &mut R) -> Result<Self> {
        let mut scene = Scene::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "nodes" => scene.nodes = read_array(r, |r| Index::read(r))?,
                _ => {
                    if !scene.child.read_field(name, r)? {
                        scene.bag.read_default_property(name, r)?;
                    }
                }
            }
            Ok(())
        })?;
        Ok(scene)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        if !self.nodes.is_empty() {
            writer.write_property_name("nodes")?;
            writer.write_array_start()?;
            for node in &self.nodes {
                node.write(writer)?;
            }
            writer.write_array_end()?;
        }
        self.child.serialize(writer)?;
        self.bag.serialize(writer)?;
        writer.write_object_end()
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}
