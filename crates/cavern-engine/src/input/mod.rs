//! Input subsystem.
//!
//! Public API is platform-agnostic: digital buttons, analog axes in `[0, 1]`
//! and two independent pose streams (head, hand). Whatever drives the input
//! source is responsible for translating device events into `InputEvent`s.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{AnalogAxis, Button, ButtonState, InputEvent, Pose, PoseStream};
