//! Scripted stand-in for a tracking runtime.
//!
//! Produces the same input every run: a head bobbing around the middle of the
//! rig, a hand sweeping in front of the left wall, and a fixed timeline of
//! trigger and button activity.

use glam::{Quat, Vec3};

use cavern_engine::input::{AnalogAxis, Button, ButtonState, InputEvent, Pose, PoseStream};

/// Host-side actions on the capture task.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostCommand {
    StopCapture,
    StartCapture,
}

/// Frame-indexed input timeline.
#[derive(Debug, Clone)]
pub struct DemoScript {
    frame_rate: f32,
    /// Trigger held (hand source) over this frame range.
    hand_frames: std::ops::Range<u64>,
    /// Debug button held over this frame range.
    debug_frames: std::ops::Range<u64>,
    /// Frames on which the anchor toggle is tapped.
    anchor_taps: [u64; 2],
    stop_at: u64,
    start_at: u64,
}

impl DemoScript {
    pub fn new(frame_rate: f32) -> Self {
        Self {
            frame_rate,
            hand_frames: 120..300,
            debug_frames: 150..210,
            anchor_taps: [180, 240],
            stop_at: 330,
            start_at: 400,
        }
    }

    /// Input events delivered at the start of `frame`.
    pub fn events(&self, frame: u64) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if frame == 0 {
            events.push(InputEvent::Tracking(true));
        }

        let t = frame as f32 / self.frame_rate;
        events.push(InputEvent::Pose {
            stream: PoseStream::Head,
            pose: head_pose(t),
        });
        events.push(InputEvent::Pose {
            stream: PoseStream::Hand,
            pose: hand_pose(t),
        });

        let trigger = if self.hand_frames.contains(&frame) { 1.0 } else { 0.0 };
        events.push(InputEvent::Axis {
            axis: AnalogAxis::SecondaryIndexTrigger,
            value: trigger,
        });

        if frame == self.debug_frames.start {
            events.push(press(Button::One, ButtonState::Pressed));
        } else if frame == self.debug_frames.end {
            events.push(press(Button::One, ButtonState::Released));
        }

        if self.anchor_taps.contains(&frame) {
            events.push(press(Button::Two, ButtonState::Pressed));
            events.push(press(Button::Two, ButtonState::Released));
        }

        events
    }

    pub fn command(&self, frame: u64) -> Option<HostCommand> {
        if frame == self.stop_at {
            Some(HostCommand::StopCapture)
        } else if frame == self.start_at {
            Some(HostCommand::StartCapture)
        } else {
            None
        }
    }
}

fn press(button: Button, state: ButtonState) -> InputEvent {
    InputEvent::Button { button, state }
}

fn head_pose(t: f32) -> Pose {
    let position = Vec3::new(0.2 * (0.7 * t).sin(), 1.6, 0.15 * (0.5 * t).cos());
    Pose::new(position, Quat::from_rotation_y(0.3 * (0.4 * t).sin()))
}

fn hand_pose(t: f32) -> Pose {
    let position = Vec3::new(-0.4 + 0.1 * t.sin(), 1.1, 0.3 + 0.2 * (0.8 * t).sin());
    Pose::new(position, Quat::from_rotation_y(0.5))
}
