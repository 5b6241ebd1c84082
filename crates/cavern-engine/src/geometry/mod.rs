//! Screen geometry.
//!
//! Screens are static planar surfaces in world space. Each one is resolved once
//! at setup from its mesh-space bounds and world transform into four corners
//! and a local right/up/normal basis; nothing here changes afterwards.

mod bounds;
mod screen;

pub use bounds::{Bounds, MeshAxis};
pub use screen::{Screen, ScreenBasis, ScreenCorners, ScreenDef, ScreenId, ScreenSet};
