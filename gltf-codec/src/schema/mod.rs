//! Typed glTF objects.
//!
//! Each type owns the members it models and an
//! [`ExtensionBag`](crate::ExtensionBag) for everything else.

mod asset;
mod camera;
mod node;
mod scene;

pub use asset::Asset;
pub use camera::{Camera, CameraType, Orthographic, Perspective};
pub use node::{Node, IDENTITY_MATRIX, IDENTITY_ROTATION};
pub use scene::Scene;
