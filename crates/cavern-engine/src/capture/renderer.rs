use glam::Mat4;

use crate::error::RenderError;
use crate::viewpoint::EyeViewpoint;

use super::{RenderTarget, TargetId};

/// Pixels read back from one binding.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub target: TargetId,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, top row first.
    pub pixels: Vec<u8>,
}

impl CapturedFrame {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

/// GPU-side collaborator of the capture scheduler.
///
/// Implementations draw the scene from `eye` with `projection` overriding the
/// camera projection for that one call, and return the pixels before the next
/// call on the same target.
pub trait Renderer {
    /// Destination the host pipeline currently renders into.
    fn active_destination(&self) -> Option<TargetId>;

    fn set_active_destination(&mut self, destination: Option<TargetId>);

    fn render(
        &mut self,
        target: &RenderTarget,
        eye: &EyeViewpoint,
        projection: &Mat4,
    ) -> Result<CapturedFrame, RenderError>;
}
