use glam::{Mat4, Vec4};
use serde::Deserialize;

use crate::error::ProjectionError;
use crate::geometry::{ScreenBasis, ScreenCorners};
use crate::viewpoint::EyeViewpoint;

use super::{DepthRange, FrustumBounds, Handedness};

/// What to do when the eye sits on the screen plane.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Clamp the eye-plane distance to `min_distance` (keeping its sign) and warn.
    #[default]
    Clamp,
    /// Reject with [`ProjectionError::EyeOnPlane`]; the caller skips the binding.
    Skip,
}

/// Solver parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolverConfig {
    pub handedness: Handedness,
    pub depth_range: DepthRange,
    pub degenerate: DegeneratePolicy,
    /// Distances below this count as "eye on plane".
    pub min_distance: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            handedness: Handedness::default(),
            depth_range: DepthRange::default(),
            degenerate: DegeneratePolicy::default(),
            min_distance: 1e-4,
        }
    }
}

/// Result of one solve. Valid only for the eye/screen pair that produced it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OffAxisProjection {
    /// Off-center perspective `P`.
    pub projection: Mat4,
    /// Screen-aligned view transform `M * T`.
    pub view: Mat4,
    pub bounds: FrustumBounds,
    /// Signed eye-to-plane distance along the screen normal.
    pub distance: f32,
    /// Set when `distance` was clamped away from zero.
    pub clamped: bool,
}

impl OffAxisProjection {
    /// Combined `P * M * T`.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Generalized perspective projection solver.
///
/// Pure: the same inputs always produce the same matrix. It owns no eye or
/// screen state.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OffAxisSolver {
    config: SolverConfig,
}

impl OffAxisSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves for `eye` looking through the screen with the given corners.
    ///
    /// Only `a` (bottom-left analog), `b` (bottom-right analog) and `c`
    /// (top-left analog) are used. An eye behind the screen produces a negative
    /// distance and a mirrored frustum; that is not rejected here.
    pub fn solve(
        &self,
        eye: &EyeViewpoint,
        corners: &ScreenCorners,
    ) -> Result<OffAxisProjection, ProjectionError> {
        let pe = eye.position;
        let (n, f) = (eye.near, eye.far);

        if !(n > 0.0) || !(f > n) || !f.is_finite() {
            return Err(ProjectionError::InvalidClipRange { near: n, far: f });
        }
        if !pe.is_finite() {
            return Err(ProjectionError::NonFiniteEye);
        }

        let va = corners.a - pe;
        let vb = corners.b - pe;
        let vc = corners.c - pe;

        let ScreenBasis { right, up, normal } =
            ScreenBasis::from_corners(corners, self.config.handedness);

        let mut d = -normal.dot(va);
        let mut clamped = false;

        if !(d.abs() >= self.config.min_distance) {
            match self.config.degenerate {
                DegeneratePolicy::Skip => {
                    return Err(ProjectionError::EyeOnPlane { distance: d });
                }
                DegeneratePolicy::Clamp => {
                    log::warn!(
                        "eye {:?} is {} from the screen plane; clamping to {}",
                        pe,
                        d,
                        self.config.min_distance
                    );
                    let sign = if d < 0.0 { -1.0 } else { 1.0 };
                    d = self.config.min_distance * sign;
                    clamped = true;
                }
            }
        }

        let scale = n / d;
        let bounds = FrustumBounds {
            left: right.dot(va) * scale,
            right: right.dot(vb) * scale,
            bottom: up.dot(va) * scale,
            top: up.dot(vc) * scale,
            near: n,
            far: f,
        };

        let projection = bounds.to_matrix(self.config.depth_range);

        // Rows are the screen basis: world -> screen-aligned eye space.
        let rotation = Mat4::from_cols(
            Vec4::new(right.x, up.x, normal.x, 0.0),
            Vec4::new(right.y, up.y, normal.y, 0.0),
            Vec4::new(right.z, up.z, normal.z, 0.0),
            Vec4::W,
        );
        let translation = Mat4::from_translation(-pe);

        Ok(OffAxisProjection {
            projection,
            view: rotation * translation,
            bounds,
            distance: d,
            clamped,
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    const EPS: f32 = 1e-4;

    fn to_ndc(matrix: &Mat4, p: Vec3) -> Vec3 {
        matrix.project_point3(p)
    }

    fn eye(x: f32, y: f32, z: f32) -> EyeViewpoint {
        EyeViewpoint::new(Vec3::new(x, y, z), 0.1, 100.0)
    }

    /// 2x2 plane in the Y-Z plane; left-handed normal along +X.
    fn yz_plane() -> ScreenCorners {
        ScreenCorners {
            a: Vec3::new(0.0, 1.0, 1.0),
            b: Vec3::new(0.0, 1.0, -1.0),
            c: Vec3::new(0.0, -1.0, 1.0),
            d: Vec3::new(0.0, -1.0, -1.0),
        }
    }

    /// 2x2 plane in the X-Y plane; right-handed normal along +Z.
    fn xy_plane() -> ScreenCorners {
        ScreenCorners {
            a: Vec3::new(-1.0, -1.0, 0.0),
            b: Vec3::new(1.0, -1.0, 0.0),
            c: Vec3::new(-1.0, 1.0, 0.0),
            d: Vec3::new(1.0, 1.0, 0.0),
        }
    }

    fn left_solver() -> OffAxisSolver {
        OffAxisSolver::new(SolverConfig {
            handedness: Handedness::Left,
            ..SolverConfig::default()
        })
    }

    fn right_solver() -> OffAxisSolver {
        OffAxisSolver::new(SolverConfig {
            handedness: Handedness::Right,
            ..SolverConfig::default()
        })
    }

    // ── scenario ──────────────────────────────────────────────────────────

    #[test]
    fn centered_eye_in_front_of_yz_plane() {
        let corners = yz_plane();
        let basis = ScreenBasis::from_corners(&corners, Handedness::Left);
        assert!(basis.right.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        assert!(basis.normal.abs_diff_eq(Vec3::X, EPS));

        let p = left_solver().solve(&eye(2.0, 0.0, 0.0), &corners).unwrap();
        assert!((p.distance - 2.0).abs() < EPS);
        assert!((p.bounds.left + 0.05).abs() < EPS);
        assert!((p.bounds.right - 0.05).abs() < EPS);
        assert!((p.bounds.bottom + 0.05).abs() < EPS);
        assert!((p.bounds.top - 0.05).abs() < EPS);
        assert!(!p.clamped);
    }

    // ── symmetry and scaling ──────────────────────────────────────────────

    #[test]
    fn on_axis_eye_yields_symmetric_frustum_at_any_distance() {
        for d0 in [0.25, 1.0, 3.0, 40.0] {
            let p = right_solver().solve(&eye(0.0, 0.0, d0), &xy_plane()).unwrap();
            assert!(p.bounds.is_symmetric(EPS), "d0={d0} bounds={:?}", p.bounds);
            assert!((p.distance - d0).abs() < EPS);
        }
    }

    #[test]
    fn doubling_distance_halves_bounds() {
        let d0 = 1.5;
        let near = right_solver().solve(&eye(0.0, 0.0, d0), &xy_plane()).unwrap().bounds;
        let far = right_solver().solve(&eye(0.0, 0.0, 2.0 * d0), &xy_plane()).unwrap().bounds;
        assert!((far.left - near.left * 0.5).abs() < EPS);
        assert!((far.right - near.right * 0.5).abs() < EPS);
        assert!((far.bottom - near.bottom * 0.5).abs() < EPS);
        assert!((far.top - near.top * 0.5).abs() < EPS);
    }

    #[test]
    fn lateral_offset_skews_frustum() {
        let p = right_solver().solve(&eye(0.5, 0.0, 1.0), &xy_plane()).unwrap();
        assert!(!p.bounds.is_symmetric(EPS));
        // Screen extends further to the eye's left than to its right.
        assert!(p.bounds.left.abs() > p.bounds.right.abs());
    }

    // ── screen fills the view ─────────────────────────────────────────────

    fn assert_corners_fill_clip(solver: OffAxisSolver, corners: &ScreenCorners, pe: EyeViewpoint) {
        let m = solver.solve(&pe, corners).unwrap().matrix();
        let expect = [
            (corners.a, -1.0, -1.0),
            (corners.b, 1.0, -1.0),
            (corners.c, -1.0, 1.0),
            (corners.d, 1.0, 1.0),
        ];
        for (p, x, y) in expect {
            let clip = m * p.extend(1.0);
            assert!(clip.w > 0.0, "corner {p:?} behind eye");
            let ndc = to_ndc(&m, p);
            assert!((ndc.x - x).abs() < EPS, "corner {p:?} -> {ndc:?}");
            assert!((ndc.y - y).abs() < EPS, "corner {p:?} -> {ndc:?}");
            assert!(ndc.z > -1.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn corners_map_to_clip_boundary_on_axis() {
        assert_corners_fill_clip(right_solver(), &xy_plane(), eye(0.0, 0.0, 2.0));
        assert_corners_fill_clip(left_solver(), &yz_plane(), eye(2.0, 0.0, 0.0));
    }

    #[test]
    fn corners_map_to_clip_boundary_off_axis() {
        assert_corners_fill_clip(right_solver(), &xy_plane(), eye(0.7, -0.4, 1.3));
        assert_corners_fill_clip(right_solver(), &xy_plane(), eye(-3.0, 2.5, 0.5));
        assert_corners_fill_clip(left_solver(), &yz_plane(), eye(1.5, 0.3, -0.8));
    }

    #[test]
    fn screen_center_lands_at_clip_center() {
        let corners = xy_plane();
        let m = right_solver().solve(&eye(0.9, 0.2, 2.0), &corners).unwrap().matrix();
        let ndc = to_ndc(&m, corners.center());
        assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS);
    }

    #[test]
    fn zero_to_one_maps_near_plane_to_zero() {
        let solver = OffAxisSolver::new(SolverConfig {
            handedness: Handedness::Right,
            depth_range: DepthRange::ZeroToOne,
            ..SolverConfig::default()
        });
        let pe = eye(0.0, 0.0, 2.0);
        let m = solver.solve(&pe, &xy_plane()).unwrap().matrix();
        // A point `near` units in front of the eye, toward the screen.
        let ndc = to_ndc(&m, Vec3::new(0.0, 0.0, 2.0 - pe.near));
        assert!(ndc.z.abs() < EPS);
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn eye_on_plane_is_clamped_by_default() {
        let p = right_solver().solve(&eye(0.2, 0.1, 0.0), &xy_plane()).unwrap();
        assert!(p.clamped);
        assert!((p.distance - 1e-4).abs() < 1e-7);
        assert!(p.matrix().is_finite());
    }

    #[test]
    fn eye_on_plane_is_rejected_with_skip_policy() {
        let solver = OffAxisSolver::new(SolverConfig {
            handedness: Handedness::Right,
            degenerate: DegeneratePolicy::Skip,
            ..SolverConfig::default()
        });
        let err = solver.solve(&eye(0.0, 0.0, 1e-6), &xy_plane()).unwrap_err();
        assert!(matches!(err, ProjectionError::EyeOnPlane { .. }));
    }

    #[test]
    fn eye_behind_screen_gives_negative_distance() {
        let p = right_solver().solve(&eye(0.0, 0.0, -2.0), &xy_plane()).unwrap();
        assert!(p.distance < 0.0);
        assert!(p.matrix().is_finite());
    }

    #[test]
    fn invalid_clip_range_is_rejected() {
        let bad = EyeViewpoint::new(Vec3::new(0.0, 0.0, 2.0), 1.0, 0.5);
        assert_eq!(
            right_solver().solve(&bad, &xy_plane()).unwrap_err(),
            ProjectionError::InvalidClipRange { near: 1.0, far: 0.5 }
        );
        let bad = EyeViewpoint::new(Vec3::new(0.0, 0.0, 2.0), 0.0, 10.0);
        assert!(right_solver().solve(&bad, &xy_plane()).is_err());
    }

    #[test]
    fn non_finite_eye_is_rejected() {
        let bad = EyeViewpoint::new(Vec3::new(f32::NAN, 0.0, 2.0), 0.1, 10.0);
        assert_eq!(
            right_solver().solve(&bad, &xy_plane()).unwrap_err(),
            ProjectionError::NonFiniteEye
        );
    }
}
