//! Debug frustum overlay.
//!
//! Rays from each eye to each corner of each screen, one descriptor per
//! (eye, screen, corner) triple. Drawing them is left to a [`DebugOverlay`].

use glam::Vec3;
use serde::Deserialize;

use crate::geometry::{ScreenCorners, ScreenId, ScreenSet};
use crate::viewpoint::{ActiveViewpoint, Eye};

/// Screen corner as seen by the viewer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Corner {
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::LeftTop,
        Corner::LeftBottom,
        Corner::RightTop,
        Corner::RightBottom,
    ];

    /// World position of this corner.
    pub fn pick(self, corners: &ScreenCorners) -> Vec3 {
        match self {
            Corner::LeftTop => corners.c,
            Corner::LeftBottom => corners.a,
            Corner::RightTop => corners.d,
            Corner::RightBottom => corners.b,
        }
    }
}

/// Which eye pair the rays start from.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugOrigin {
    /// Always the hand pair, whatever source is active.
    #[default]
    HandAlways,
    /// The pair of the active source.
    ActiveSource,
}

/// One debug ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSegment {
    pub eye: Eye,
    pub screen: ScreenId,
    pub corner: Corner,
    pub start: Vec3,
    pub end: Vec3,
    pub visible: bool,
}

impl LineSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Builds the 24 rays (2 eyes x 3 screens x 4 corners).
///
/// Visibility follows the selector's debug flag.
pub fn frustum_segments(
    screens: &ScreenSet,
    active: &ActiveViewpoint,
    origin: DebugOrigin,
) -> Vec<LineSegment> {
    let pair = match origin {
        DebugOrigin::HandAlways => &active.hand,
        DebugOrigin::ActiveSource => &active.eyes,
    };
    let visible = active.selection.debug_visible;

    let mut segments = Vec::with_capacity(Eye::ALL.len() * screens.len() * Corner::ALL.len());
    for eye in Eye::ALL {
        let start = pair.get(eye).position;
        for screen in screens.iter() {
            for corner in Corner::ALL {
                segments.push(LineSegment {
                    eye,
                    screen: screen.id(),
                    corner,
                    start,
                    end: corner.pick(screen.corners()),
                    visible,
                });
            }
        }
    }
    segments
}

/// Consumer of debug rays (a line renderer, a log sink, a test probe).
pub trait DebugOverlay {
    fn draw_segments(&mut self, segments: &[LineSegment]);
}

impl DebugOverlay for Vec<LineSegment> {
    fn draw_segments(&mut self, segments: &[LineSegment]) {
        self.clear();
        self.extend(segments.iter().filter(|s| s.visible).copied());
    }
}
