//! Cameras and their two projection variants.
//!
//! A camera names its projection with `type` and carries the matching
//! `perspective` or `orthographic` object. The codec does not tie the two
//! together: both sub-objects are read when present and written back
//! independently of `type`. A camera holding both is accepted with a warning
//! unless [`ReadOptions::strict_camera_variants`](crate::ReadOptions) is set.

use std::fmt;

use log::warn;

use crate::error::{Error, ErrorKind, Result};
use crate::property::{ChildOfRoot, ExtensionBag, Property};
use crate::reader::{read_f64, read_finite_f64, read_object, read_string, TokenReader};
use crate::root::GltfRoot;
use crate::token::Token;
use crate::writer::{write_f64_field, write_str_field, TokenWriter};

// ============================================================================
// CameraType
// ============================================================================

/// Projection a camera uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraType {
    Perspective,
    Orthographic,
}

impl CameraType {
    pub fn as_str(self) -> &'static str {
        match self {
            CameraType::Perspective => "perspective",
            CameraType::Orthographic => "orthographic",
        }
    }

    pub fn parse(s: &str) -> Option<CameraType> {
        match s {
            "perspective" => Some(CameraType::Perspective),
            "orthographic" => Some(CameraType::Orthographic),
            _ => None,
        }
    }

    fn read<R: TokenReader + ?Sized>(reader: &mut R) -> Result<Self> {
        let s = read_string(reader)?;
        CameraType::parse(&s).ok_or_else(|| Error::conversion("camera type", Token::String(s)))
    }
}

impl fmt::Display for CameraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Camera
// ============================================================================

/// A camera's projection. Referenced by nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub orthographic: Option<Orthographic>,
    pub perspective: Option<Perspective>,
    /// `type` member as read. When unset, [`Camera::projection`] supplies
    /// the value written.
    pub camera_type: Option<CameraType>,
    pub child: ChildOfRoot,
    pub bag: ExtensionBag,
}

impl Camera {
    pub fn perspective(perspective: Perspective) -> Self {
        Self {
            perspective: Some(perspective),
            camera_type: Some(CameraType::Perspective),
            ..Self::default()
        }
    }

    pub fn orthographic(orthographic: Orthographic) -> Self {
        Self {
            orthographic: Some(orthographic),
            camera_type: Some(CameraType::Orthographic),
            ..Self::default()
        }
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.child.name.as_deref()
    }

    /// Projection written as `type`: the explicit type if set, otherwise
    /// the variant present, preferring perspective.
    pub fn projection(&self) -> CameraType {
        match self.camera_type {
            Some(camera_type) => camera_type,
            None if self.orthographic.is_some() && self.perspective.is_none() => {
                CameraType::Orthographic
            }
            None => CameraType::Perspective,
        }
    }
}

impl Property for Camera {
    const KIND: &'static str = "camera";

    fn deserialize<R: TokenReader + ?Sized>(root: &GltfRoot, reader: &mut R) -> Result<Self> {
        let mut camera = Camera::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "orthographic" => camera.orthographic = Some(Orthographic::deserialize(root, r)?),
                "perspective" => camera.perspective = Some(Perspective::deserialize(root, r)?),
                "type" => camera.camera_type = Some(CameraType::read(r)?),
                _ => {
                    if !camera.child.read_field(name, r)? {
                        camera.bag.read_default_property(name, r)?;
                    }
                }
            }
            Ok(())
        })?;

        if camera.orthographic.is_some() && camera.perspective.is_some() {
            if reader.options().strict_camera_variants {
                return Err(ErrorKind::ConflictingCameraVariants.into());
            }
            warn!(
                "camera {:?} defines both orthographic and perspective projections",
                camera.name().unwrap_or_default()
            );
        }
        Ok(camera)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        if let Some(orthographic) = &self.orthographic {
            writer.write_property_name("orthographic")?;
            orthographic
                .serialize(writer)
                .map_err(|e| e.in_field("orthographic"))?;
        }
        if let Some(perspective) = &self.perspective {
            writer.write_property_name("perspective")?;
            perspective
                .serialize(writer)
                .map_err(|e| e.in_field("perspective"))?;
        }
        write_str_field(writer, "type", self.projection().as_str())?;
        self.child.serialize(writer)?;
        self.bag.serialize(writer)?;
        writer.write_object_end()
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}

// ============================================================================
// Orthographic
// ============================================================================

/// Orthographic projection. All four members are mandatory and always
/// written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Orthographic {
    /// Horizontal magnification of the view.
    pub xmag: f64,
    /// Vertical magnification of the view.
    pub ymag: f64,
    /// Distance to the far clipping plane.
    pub zfar: f64,
    /// Distance to the near clipping plane.
    pub znear: f64,
    pub bag: ExtensionBag,
}

impl Property for Orthographic {
    const KIND: &'static str = "orthographic";

    fn deserialize<R: TokenReader + ?Sized>(_root: &GltfRoot, reader: &mut R) -> Result<Self> {
        let mut ortho = Orthographic::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "xmag" => ortho.xmag = read_finite_f64(r)?,
                "ymag" => ortho.ymag = read_finite_f64(r)?,
                "zfar" => ortho.zfar = read_finite_f64(r)?,
                "znear" => ortho.znear = read_finite_f64(r)?,
                _ => ortho.bag.read_default_property(name, r)?,
            }
            Ok(())
        })?;
        Ok(ortho)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        write_f64_field(writer, "xmag", self.xmag)?;
        write_f64_field(writer, "ymag", self.ymag)?;
        write_f64_field(writer, "zfar", self.zfar)?;
        write_f64_field(writer, "znear", self.znear)?;
        self.bag.serialize(writer)?;
        writer.write_object_end()
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}

// ============================================================================
// Perspective
// ============================================================================

/// Perspective projection.
///
/// `zfar` of +∞ means an infinite projection and is the value used when the
/// member is absent; it is never written. An `aspect_ratio` of 0 means "use
/// the viewport's" and is likewise omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Perspective {
    pub aspect_ratio: f64,
    /// Vertical field of view in radians.
    pub yfov: f64,
    pub zfar: f64,
    pub znear: f64,
    pub bag: ExtensionBag,
}

impl Perspective {
    pub fn new(yfov: f64, znear: f64) -> Self {
        Self {
            yfov,
            znear,
            ..Self::default()
        }
    }

    /// Check if the far plane is at infinity.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.zfar == f64::INFINITY
    }
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            aspect_ratio: 0.0,
            yfov: 0.0,
            zfar: f64::INFINITY,
            znear: 0.0,
            bag: ExtensionBag::default(),
        }
    }
}

impl Property for Perspective {
    const KIND: &'static str = "perspective";

    fn deserialize<R: TokenReader + ?Sized>(_root: &GltfRoot, reader: &mut R) -> Result<Self> {
        let mut persp = Perspective::default();
        read_object(reader, Self::KIND, |name, r| {
            match name {
                "aspectRatio" => persp.aspect_ratio = read_finite_f64(r)?,
                "yfov" => persp.yfov = read_finite_f64(r)?,
                "zfar" => {
                    // +inf is the infinite projection; -inf has no meaning.
                    persp.zfar = read_f64(r)?;
                    if persp.zfar == f64::NEG_INFINITY {
                        return Err(Error::conversion("finite number", persp.zfar));
                    }
                }
                "znear" => persp.znear = read_finite_f64(r)?,
                _ => persp.bag.read_default_property(name, r)?,
            }
            Ok(())
        })?;
        Ok(persp)
    }

    fn serialize<W: TokenWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_object_start()?;
        if self.aspect_ratio != 0.0 {
            write_f64_field(writer, "aspectRatio", self.aspect_ratio)?;
        }
        write_f64_field(writer, "yfov", self.yfov)?;
        if !self.is_infinite() {
            write_f64_field(writer, "zfar", self.zfar)?;
        }
        write_f64_field(writer, "znear", self.znear)?;
        self.bag.serialize(writer)?;
        writer.write_object_end()
    }

    fn extension_bag(&self) -> &ExtensionBag {
        &self.bag
    }
}
