use std::fmt;

use glam::Vec3;
use serde::Deserialize;

use crate::input::Pose;

/// One eye of a stereo pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Capture order.
    pub const ALL: [Eye; 2] = [Eye::Left, Eye::Right];
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eye::Left => f.write_str("left-eye"),
            Eye::Right => f.write_str("right-eye"),
        }
    }
}

/// Position and clip distances of one eye.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EyeViewpoint {
    pub position: Vec3,
    pub near: f32,
    pub far: f32,
}

impl EyeViewpoint {
    #[inline]
    pub const fn new(position: Vec3, near: f32, far: f32) -> Self {
        Self {
            position,
            near,
            far,
        }
    }
}

/// Stereo parameters shared by every viewpoint source.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StereoConfig {
    /// Inter-pupillary distance in world units.
    pub ipd: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self {
            ipd: 0.064,
            near: 0.05,
            far: 100.0,
        }
    }
}

/// Left/right eye viewpoints supplied by one source.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EyePair {
    pub left: EyeViewpoint,
    pub right: EyeViewpoint,
}

impl EyePair {
    /// Splits a tracked pose into two eyes offset by half the IPD along the
    /// pose's local right axis.
    pub fn from_pose(pose: &Pose, stereo: &StereoConfig) -> Self {
        let half = pose.right() * (stereo.ipd * 0.5);
        Self {
            left: EyeViewpoint::new(pose.position - half, stereo.near, stereo.far),
            right: EyeViewpoint::new(pose.position + half, stereo.near, stereo.far),
        }
    }

    #[inline]
    pub fn get(&self, eye: Eye) -> &EyeViewpoint {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, eye: Eye) -> &mut EyeViewpoint {
        match eye {
            Eye::Left => &mut self.left,
            Eye::Right => &mut self.right,
        }
    }
}

/// Anything that can report the current viewpoint of an eye.
///
/// Queried once per binding, at the moment the binding is rendered.
pub trait EyeSource {
    fn eye(&self, eye: Eye) -> EyeViewpoint;
}

impl EyeSource for EyePair {
    fn eye(&self, eye: Eye) -> EyeViewpoint {
        *self.get(eye)
    }
}
