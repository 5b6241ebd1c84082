//! Off-axis projection.
//!
//! Given an eye position and a screen's corners, builds the asymmetric
//! perspective transform under which geometry drawn onto that screen looks
//! undistorted from that eye (generalized perspective projection).
//!
//! Conventions:
//! - eye space looks down -Z, +X right, +Y up
//! - clip depth range is selectable (`DepthRange`)
//! - world handedness only affects which way the screen normal points

mod frustum;
mod off_axis;

use glam::Vec3;
use serde::Deserialize;

pub use frustum::{off_center_frustum, FrustumBounds};
pub use off_axis::{DegeneratePolicy, OffAxisProjection, OffAxisSolver, SolverConfig};

/// Handedness of the world coordinate system.
///
/// The screen normal is `right x up` evaluated in this handedness, so it
/// always points toward the side the screen is meant to be viewed from.
/// Corner conventions of plane meshes (bounds max = A, width measured back
/// along the mesh X axis) are left-handed, hence the default.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Right,
    #[default]
    Left,
}

impl Handedness {
    #[inline]
    pub fn cross(self, a: Vec3, b: Vec3) -> Vec3 {
        match self {
            Handedness::Right => a.cross(b),
            Handedness::Left => b.cross(a),
        }
    }
}

/// Clip-space depth convention of the target graphics API.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthRange {
    /// OpenGL-style `[-1, 1]`.
    #[default]
    NegOneToOne,
    /// wgpu / Vulkan / D3D style `[0, 1]`.
    ZeroToOne,
}
