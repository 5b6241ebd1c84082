//! Error types shared across the engine.
//!
//! Setup-time problems surface as [`ConfigError`] and abort initialization.
//! Per-pass problems ([`ProjectionError`], [`RenderError`]) are contained to the
//! binding that produced them.

use std::path::PathBuf;

use thiserror::Error;

use crate::capture::TargetId;
use crate::geometry::ScreenId;

/// Fatal configuration problem detected at setup. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("capture rate must be positive, got {0}")]
    NonPositiveCaptureRate(f32),

    #[error("clip range must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipRange { near: f32, far: f32 },

    #[error("screen {screen} has degenerate geometry (width={width}, height={height})")]
    DegenerateScreen {
        screen: ScreenId,
        width: f32,
        height: f32,
    },

    #[error("screen {screen} resolves to a skewed basis (right·up={dot})")]
    SkewedScreen { screen: ScreenId, dot: f32 },

    #[error("screen {0} is defined more than once")]
    DuplicateScreen(ScreenId),

    #[error("screen {0} is missing from the rig")]
    MissingScreen(ScreenId),

    #[error("source threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("minimum eye-plane distance must be positive, got {0}")]
    InvalidMinDistance(f32),

    #[error("capture resolution must be non-zero, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("invalid rig description: {0}")]
    Parse(String),

    #[error("failed to read rig file {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Per-call failure of the off-axis solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The eye lies on (or numerically too close to) the screen plane.
    #[error("eye is on the screen plane (distance {distance})")]
    EyeOnPlane { distance: f32 },

    #[error("clip range must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipRange { near: f32, far: f32 },

    #[error("eye position is not finite")]
    NonFiniteEye,
}

/// Failure reported by a [`Renderer`](crate::capture::Renderer) for one binding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("no render destination allocated for {0}")]
    UnknownTarget(TargetId),

    #[error("gpu error: {0}")]
    Gpu(String),

    #[error("readback failed: {0}")]
    Readback(String),
}

/// Rejected scheduler transition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    #[error("capture cannot start: {0}")]
    Config(#[from] ConfigError),
}
