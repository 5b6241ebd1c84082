//! GPU rendering subsystem.
//!
//! [`OffscreenRenderer`] implements the capture `Renderer` contract on top of
//! a [`HeadlessGpu`](crate::device::HeadlessGpu): one offscreen colour
//! target per capture binding, synchronous readback.
//!
//! Convention:
//! - geometry is in world units
//! - the vertex shader applies the per-binding off-axis `P * M * T` uniform
//! - clip depth is `[0, 1]`

mod offscreen;
mod scene;

pub use offscreen::OffscreenRenderer;
pub use scene::{reference_scene, SceneVertex};
