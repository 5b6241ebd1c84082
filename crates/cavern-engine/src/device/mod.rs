//! GPU device management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue used by the offscreen
//! renderer. No surface or swapchain is involved.

mod gpu;

pub use gpu::{GpuInit, HeadlessGpu};
