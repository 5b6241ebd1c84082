use glam::Vec3;
use serde::Deserialize;

/// Mesh-space axis used to measure a screen's width or height.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshAxis {
    X,
    Y,
    Z,
}

impl MeshAxis {
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            MeshAxis::X => Vec3::X,
            MeshAxis::Y => Vec3::Y,
            MeshAxis::Z => Vec3::Z,
        }
    }

    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            MeshAxis::X => v.x,
            MeshAxis::Y => v.y,
            MeshAxis::Z => v.z,
        }
    }
}

/// Axis-aligned bounding box of a screen mesh, in mesh space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    #[inline]
    pub fn extents(self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn size(self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}
