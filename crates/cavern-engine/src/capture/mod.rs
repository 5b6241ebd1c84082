//! Periodic capture.
//!
//! Every (screen, eye) pair of an output set is a [`RenderTarget`]. The
//! [`CaptureScheduler`] walks those bindings once per pass, solves each
//! off-axis projection against the eye current at that moment, and hands it
//! to a [`Renderer`] for drawing and readback.

mod config;
mod renderer;
mod scheduler;
mod target;

pub use config::CaptureConfig;
pub use renderer::{CapturedFrame, Renderer};
pub use scheduler::{
    BindingFailure, CaptureContext, CaptureHandle, CaptureScheduler, CaptureState, PassReport,
    SkippedBinding,
};
pub use target::{CaptureBindings, OutputSet, OutputSetId, RenderTarget, TargetId};
