use std::fmt;

use glam::{Quat, Vec3};
use serde::Deserialize;

/// Digital controller button.
///
/// Named after the face buttons of common tracked controllers. Buttons the
/// runtime cannot name map to `Other(code)` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    One,
    Two,
    Three,
    Four,
    PrimaryThumbstick,
    SecondaryThumbstick,
    Start,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Continuous controller axis reporting values in `[0, 1]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalogAxis {
    PrimaryIndexTrigger,
    SecondaryIndexTrigger,
    PrimaryHandTrigger,
    SecondaryHandTrigger,
    Other(u16),
}

/// Independent 6-DOF tracking stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PoseStream {
    Head,
    Hand,
}

/// Tracked position + orientation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    #[inline]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Local +X expressed in world space.
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Platform-agnostic input events emitted by an input source.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Button { button: Button, state: ButtonState },

    Axis { axis: AnalogAxis, value: f32 },

    Pose { stream: PoseStream, pose: Pose },

    /// The tracking source lost (false) or regained (true) its devices.
    Tracking(bool),
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
