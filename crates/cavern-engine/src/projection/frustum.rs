use glam::{Mat4, Vec4};

use super::DepthRange;

/// Extents of an asymmetric view volume, measured on the near plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrustumBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl FrustumBounds {
    /// True when the view axis passes through the center of the window.
    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        (self.left + self.right).abs() <= tolerance && (self.bottom + self.top).abs() <= tolerance
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn to_matrix(&self, depth: DepthRange) -> Mat4 {
        off_center_frustum(self, depth)
    }
}

/// Off-center perspective matrix mapping the view volume to the clip cube.
///
/// Same layout as the classic `glFrustum`; with [`DepthRange::ZeroToOne`] the
/// near plane maps to 0 instead of -1.
pub fn off_center_frustum(b: &FrustumBounds, depth: DepthRange) -> Mat4 {
    let FrustumBounds {
        left: l,
        right: r,
        bottom: bt,
        top: t,
        near: n,
        far: f,
    } = *b;

    let (z_scale, z_offset) = match depth {
        DepthRange::NegOneToOne => (-(f + n) / (f - n), -2.0 * f * n / (f - n)),
        DepthRange::ZeroToOne => (f / (n - f), f * n / (n - f)),
    };

    Mat4::from_cols(
        Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * n / (t - bt), 0.0, 0.0),
        Vec4::new((r + l) / (r - l), (t + bt) / (t - bt), z_scale, -1.0),
        Vec4::new(0.0, 0.0, z_offset, 0.0),
    )
}
