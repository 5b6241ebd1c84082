use std::fmt;

use glam::{Affine3A, Vec3};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::projection::Handedness;

use super::{Bounds, MeshAxis};

/// Smallest mesh-space width/height accepted for a screen.
const MIN_SCREEN_EXTENT: f32 = 1e-6;

/// Largest |right·up| tolerated before a screen counts as skewed.
const ORTHOGONALITY_TOLERANCE: f32 = 1e-3;

/// Identity of a physical screen.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenId {
    Left,
    Right,
    Bottom,
}

impl ScreenId {
    /// Capture order within one eye.
    pub const ALL: [ScreenId; 3] = [ScreenId::Left, ScreenId::Right, ScreenId::Bottom];
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenId::Left => "left",
            ScreenId::Right => "right",
            ScreenId::Bottom => "bottom",
        };
        f.write_str(name)
    }
}

/// Physical description of a screen: mesh bounds plus world transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenDef {
    pub id: ScreenId,
    pub bounds: Bounds,
    pub transform: Affine3A,
    /// Mesh axis along which the width is measured.
    pub right_axis: MeshAxis,
    /// Mesh axis along which the height is measured.
    pub up_axis: MeshAxis,
}

impl ScreenDef {
    /// Plane mesh lying in its local XZ plane (width along X, height along Z).
    pub fn new(id: ScreenId, bounds: Bounds, transform: Affine3A) -> Self {
        Self {
            id,
            bounds,
            transform,
            right_axis: MeshAxis::X,
            up_axis: MeshAxis::Z,
        }
    }

    pub fn with_axes(mut self, right_axis: MeshAxis, up_axis: MeshAxis) -> Self {
        self.right_axis = right_axis;
        self.up_axis = up_axis;
        self
    }
}

/// World-space corners of a screen.
///
/// - `a`: transformed bounds max
/// - `b`: `a` moved by `-width` along the mesh right axis
/// - `c`: `a` moved by `-height` along the mesh up axis
/// - `d`: transformed bounds min
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenCorners {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    pub d: Vec3,
}

impl ScreenCorners {
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.a + self.b + self.c + self.d) * 0.25
    }
}

/// Local frame of a screen derived from its corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenBasis {
    pub right: Vec3,
    pub up: Vec3,
    /// Points toward the intended viewing side.
    pub normal: Vec3,
}

impl ScreenBasis {
    /// `right = B - A`, `up = C - A`, `normal = right x up` in the given handedness.
    ///
    /// Degenerate corners yield zero vectors rather than NaNs.
    pub fn from_corners(corners: &ScreenCorners, handedness: Handedness) -> Self {
        let right = (corners.b - corners.a).normalize_or_zero();
        let up = (corners.c - corners.a).normalize_or_zero();
        let normal = handedness.cross(right, up).normalize_or_zero();
        Self { right, up, normal }
    }

    pub fn is_orthonormal(&self, tolerance: f32) -> bool {
        let unit = |v: Vec3| (v.length() - 1.0).abs() <= tolerance;
        unit(self.right)
            && unit(self.up)
            && unit(self.normal)
            && self.right.dot(self.up).abs() <= tolerance
            && self.right.dot(self.normal).abs() <= tolerance
            && self.up.dot(self.normal).abs() <= tolerance
    }
}

/// A resolved, immutable screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    id: ScreenId,
    width: f32,
    height: f32,
    corners: ScreenCorners,
    basis: ScreenBasis,
}

impl Screen {
    /// Computes world-space corners and basis for `def`.
    ///
    /// Fails with [`ConfigError::DegenerateScreen`] when the mesh has no width or
    /// height (before or after the transform), and with
    /// [`ConfigError::SkewedScreen`] when the transform shears the plane.
    pub fn resolve(def: &ScreenDef, handedness: Handedness) -> Result<Self, ConfigError> {
        let extents = def.bounds.extents();
        let width = def.right_axis.component(extents) * 2.0;
        let height = def.up_axis.component(extents) * 2.0;

        let degenerate = ConfigError::DegenerateScreen {
            screen: def.id,
            width,
            height,
        };

        if !def.bounds.is_finite()
            || !(width > MIN_SCREEN_EXTENT)
            || !(height > MIN_SCREEN_EXTENT)
            || def.right_axis == def.up_axis
        {
            return Err(degenerate);
        }

        let max = def.bounds.max;
        let corners = ScreenCorners {
            a: def.transform.transform_point3(max),
            b: def.transform.transform_point3(max - def.right_axis.unit() * width),
            c: def.transform.transform_point3(max - def.up_axis.unit() * height),
            d: def.transform.transform_point3(def.bounds.min),
        };

        let world_w = corners.b.distance(corners.a);
        let world_h = corners.c.distance(corners.a);
        if !(world_w > MIN_SCREEN_EXTENT) || !(world_h > MIN_SCREEN_EXTENT) {
            return Err(degenerate);
        }

        let basis = ScreenBasis::from_corners(&corners, handedness);
        let dot = basis.right.dot(basis.up);
        if dot.abs() > ORTHOGONALITY_TOLERANCE {
            return Err(ConfigError::SkewedScreen { screen: def.id, dot });
        }

        log::debug!(
            "resolved screen {}: a={:?} b={:?} c={:?} d={:?} normal={:?}",
            def.id,
            corners.a,
            corners.b,
            corners.c,
            corners.d,
            basis.normal
        );

        Ok(Self {
            id: def.id,
            width,
            height,
            corners,
            basis,
        })
    }

    #[inline]
    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Mesh-space width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Mesh-space height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn corners(&self) -> &ScreenCorners {
        &self.corners
    }

    #[inline]
    pub fn basis(&self) -> &ScreenBasis {
        &self.basis
    }
}

/// The complete set of screens of a rig, ordered by [`ScreenId`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSet {
    screens: Vec<Screen>,
}

impl ScreenSet {
    /// Resolves every definition once. Each [`ScreenId`] must appear exactly once.
    pub fn resolve(defs: &[ScreenDef], handedness: Handedness) -> Result<Self, ConfigError> {
        let mut screens: Vec<Screen> = Vec::with_capacity(defs.len());

        for def in defs {
            if screens.iter().any(|s| s.id == def.id) {
                return Err(ConfigError::DuplicateScreen(def.id));
            }
            screens.push(Screen::resolve(def, handedness)?);
        }

        for id in ScreenId::ALL {
            if !screens.iter().any(|s| s.id == id) {
                return Err(ConfigError::MissingScreen(id));
            }
        }

        screens.sort_by_key(|s| s.id);
        Ok(Self { screens })
    }

    pub fn get(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
