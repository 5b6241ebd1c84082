use std::path::Path;

use glam::{Affine3A, EulerRot, Quat, Vec3};
use serde::Deserialize;

use crate::capture::{CaptureBindings, CaptureConfig};
use crate::debug::DebugOrigin;
use crate::error::ConfigError;
use crate::geometry::{Bounds, MeshAxis, ScreenDef, ScreenId, ScreenSet};
use crate::input::Button;
use crate::projection::{DegeneratePolicy, DepthRange, Handedness, SolverConfig};
use crate::viewpoint::{SelectorConfig, StereoConfig};

/// One screen entry of a rig file.
///
/// The mesh is described by its bounds; the world transform is
/// scale, then XYZ Euler rotation (degrees), then translation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenConfig {
    pub id: ScreenId,
    #[serde(default = "unit_plane_min")]
    pub min: [f32; 3],
    #[serde(default = "unit_plane_max")]
    pub max: [f32; 3],
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub rotation_euler_deg: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default = "axis_x")]
    pub right_axis: MeshAxis,
    #[serde(default = "axis_z")]
    pub up_axis: MeshAxis,
}

fn unit_plane_min() -> [f32; 3] {
    [-1.0, 0.0, -1.0]
}

fn unit_plane_max() -> [f32; 3] {
    [1.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

fn axis_x() -> MeshAxis {
    MeshAxis::X
}

fn axis_z() -> MeshAxis {
    MeshAxis::Z
}

impl ScreenConfig {
    /// Unit plane with the given placement.
    pub fn plane(id: ScreenId, translation: [f32; 3], rotation_euler_deg: [f32; 3]) -> Self {
        Self {
            id,
            min: unit_plane_min(),
            max: unit_plane_max(),
            translation,
            rotation_euler_deg,
            scale: unit_scale(),
            right_axis: MeshAxis::X,
            up_axis: MeshAxis::Z,
        }
    }

    pub fn transform(&self) -> Affine3A {
        let [rx, ry, rz] = self.rotation_euler_deg.map(f32::to_radians);
        Affine3A::from_scale_rotation_translation(
            Vec3::from_array(self.scale),
            Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            Vec3::from_array(self.translation),
        )
    }

    pub fn to_def(&self) -> ScreenDef {
        ScreenDef::new(
            self.id,
            Bounds::new(Vec3::from_array(self.min), Vec3::from_array(self.max)),
            self.transform(),
        )
        .with_axes(self.right_axis, self.up_axis)
    }
}

/// Capture image size, shared by every binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    /// Press toggles between following and frozen anchors.
    pub toggle_button: Button,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            toggle_button: Button::Two,
        }
    }
}

/// Complete description of a cave rig.
///
/// Every field is optional in TOML; missing ones take the built-in corner
/// rig defaults (two walls meeting a floor).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RigConfig {
    /// Capture passes per second.
    pub capture_rate: f32,
    /// One output set per viewpoint source instead of a shared one.
    pub per_viewer_outputs: bool,
    pub handedness: Handedness,
    pub depth_range: DepthRange,
    pub degenerate: DegeneratePolicy,
    pub min_distance: f32,
    pub debug_origin: DebugOrigin,
    pub output: OutputConfig,
    pub stereo: StereoConfig,
    pub selector: SelectorConfig,
    pub anchors: AnchorConfig,
    pub screens: Vec<ScreenConfig>,
}

impl Default for RigConfig {
    fn default() -> Self {
        let solver = SolverConfig::default();
        Self {
            capture_rate: CaptureConfig::default().rate,
            per_viewer_outputs: false,
            handedness: solver.handedness,
            depth_range: solver.depth_range,
            degenerate: solver.degenerate,
            min_distance: solver.min_distance,
            debug_origin: DebugOrigin::default(),
            output: OutputConfig::default(),
            stereo: StereoConfig::default(),
            selector: SelectorConfig::default(),
            anchors: AnchorConfig::default(),
            screens: vec![
                ScreenConfig::plane(ScreenId::Left, [-1.0, 1.0, 0.0], [0.0, 0.0, -90.0]),
                ScreenConfig::plane(ScreenId::Right, [1.0, 1.0, 0.0], [0.0, 0.0, 90.0]),
                ScreenConfig::plane(ScreenId::Bottom, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            ],
        }
    }
}

impl RigConfig {
    /// Parses and validates a rig description.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let rig: RigConfig = toml::from_str(src).map_err(|e| ConfigError::Parse(e.to_string()))?;
        rig.validate()?;
        Ok(rig)
    }

    /// Reads, parses and validates a rig file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let rig = Self::from_toml_str(&src)?;
        log::info!("loaded rig {} ({} screens)", path.display(), rig.screens.len());
        Ok(rig)
    }

    /// Checks every setup-time constraint, screen geometry included.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture()?;

        let StereoConfig { near, far, .. } = self.stereo;
        if !(near.is_finite() && far.is_finite() && near > 0.0 && near < far) {
            return Err(ConfigError::InvalidClipRange { near, far });
        }

        let threshold = self.selector.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(ConfigError::InvalidMinDistance(self.min_distance));
        }

        let OutputConfig { width, height } = self.output;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResolution { width, height });
        }

        self.screens().map(|_| ())
    }

    pub fn screen_defs(&self) -> Vec<ScreenDef> {
        self.screens.iter().map(ScreenConfig::to_def).collect()
    }

    /// Resolves the three screens.
    pub fn screens(&self) -> Result<ScreenSet, ConfigError> {
        ScreenSet::resolve(&self.screen_defs(), self.handedness)
    }

    pub fn capture(&self) -> Result<CaptureConfig, ConfigError> {
        CaptureConfig::new(self.capture_rate)
    }

    pub fn solver(&self) -> SolverConfig {
        SolverConfig {
            handedness: self.handedness,
            depth_range: self.depth_range,
            degenerate: self.degenerate,
            min_distance: self.min_distance,
        }
    }

    pub fn selector(&self) -> SelectorConfig {
        self.selector
    }

    pub fn stereo(&self) -> StereoConfig {
        self.stereo
    }

    pub fn bindings(&self, screens: &ScreenSet) -> CaptureBindings {
        CaptureBindings::new(
            screens,
            (self.output.width, self.output.height),
            self.per_viewer_outputs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::AnalogAxis;

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn default_rig_is_valid() {
        RigConfig::default().validate().unwrap();
    }

    #[test]
    fn default_rig_screens_face_into_the_room() {
        let screens = RigConfig::default().screens().unwrap();
        let normal = |id| screens.get(id).unwrap().basis().normal;
        assert!(normal(ScreenId::Left).abs_diff_eq(Vec3::X, 1e-5));
        assert!(normal(ScreenId::Right).abs_diff_eq(-Vec3::X, 1e-5));
        assert!(normal(ScreenId::Bottom).abs_diff_eq(Vec3::Y, 1e-5));

        let left = screens.get(ScreenId::Left).unwrap().corners();
        for p in [left.a, left.b, left.c, left.d] {
            assert!((p.x + 1.0).abs() < 1e-5);
            assert!((-1e-5..=2.0 + 1e-5).contains(&p.y));
        }
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(RigConfig::from_toml_str("").unwrap(), RigConfig::default());
    }

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parses_a_full_rig() {
        let src = r#"
            capture_rate = 30.0
            per_viewer_outputs = true
            handedness = "right"
            depth_range = "zero_to_one"
            degenerate = "skip"
            min_distance = 0.001
            debug_origin = "active_source"

            [output]
            width = 256
            height = 128

            [stereo]
            ipd = 0.07
            near = 0.1
            far = 20.0

            [selector]
            source_axis = "primary_hand_trigger"
            threshold = 0.25
            debug_button = "three"

            [anchors]
            toggle_button = "four"

            [[screens]]
            id = "left"
            translation = [-1.5, 1.0, 0.0]
            rotation_euler_deg = [0.0, 0.0, 90.0]

            [[screens]]
            id = "right"
            translation = [1.5, 1.0, 0.0]
            rotation_euler_deg = [0.0, 0.0, -90.0]

            [[screens]]
            id = "bottom"
            min = [-2.0, 0.0, -1.0]
            max = [2.0, 0.0, 1.0]
        "#;
        let rig = RigConfig::from_toml_str(src).unwrap();

        assert_eq!(rig.capture().unwrap().rate, 30.0);
        assert!(rig.per_viewer_outputs);
        assert_eq!(rig.solver().handedness, Handedness::Right);
        assert_eq!(rig.solver().depth_range, DepthRange::ZeroToOne);
        assert_eq!(rig.solver().degenerate, DegeneratePolicy::Skip);
        assert_eq!(rig.debug_origin, DebugOrigin::ActiveSource);
        assert_eq!(rig.stereo().ipd, 0.07);
        assert_eq!(rig.selector().source_axis, AnalogAxis::PrimaryHandTrigger);
        assert_eq!(rig.selector().debug_button, Button::Three);
        assert_eq!(rig.anchors.toggle_button, Button::Four);

        let screens = rig.screens().unwrap();
        assert_eq!(screens.get(ScreenId::Bottom).unwrap().width(), 4.0);
        assert_eq!(rig.bindings(&screens).all().count(), 12);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RigConfig::from_toml_str("capture_hz = 10.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn zero_capture_rate_is_a_config_error() {
        let err = RigConfig::from_toml_str("capture_rate = 0.0").unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveCaptureRate(0.0));
    }

    #[test]
    fn bad_clip_range_threshold_and_resolution_are_rejected() {
        let mut rig = RigConfig::default();
        rig.stereo.far = rig.stereo.near;
        assert!(matches!(rig.validate(), Err(ConfigError::InvalidClipRange { .. })));

        let mut rig = RigConfig::default();
        rig.selector.threshold = 1.5;
        assert_eq!(rig.validate(), Err(ConfigError::InvalidThreshold(1.5)));

        let mut rig = RigConfig::default();
        rig.output.height = 0;
        assert!(matches!(rig.validate(), Err(ConfigError::InvalidResolution { .. })));

        let mut rig = RigConfig::default();
        rig.min_distance = 0.0;
        assert_eq!(rig.validate(), Err(ConfigError::InvalidMinDistance(0.0)));
    }

    #[test]
    fn degenerate_and_missing_screens_are_rejected() {
        let mut rig = RigConfig::default();
        rig.screens[2].max = [1.0, 0.0, -1.0];
        assert!(matches!(
            rig.validate(),
            Err(ConfigError::DegenerateScreen { screen: ScreenId::Bottom, .. })
        ));

        let mut rig = RigConfig::default();
        rig.screens.pop();
        assert_eq!(rig.validate(), Err(ConfigError::MissingScreen(ScreenId::Bottom)));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = RigConfig::load("/nonexistent/cavern/rig.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert!(path.ends_with("rig.toml")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
