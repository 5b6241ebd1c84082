use std::collections::{HashMap, HashSet};

use super::frame::InputFrame;
use super::types::{AnalogAxis, Button, ButtonState, InputEvent, Pose, PoseStream};

/// Current input state of one input source.
///
/// Holds held buttons, last analog values and last known poses.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub tracking: bool,

    pub buttons_down: HashSet<Button>,

    /// Last reported value per axis, clamped to `[0, 1]`.
    pub axes: HashMap<AnalogAxis, f32>,

    pub poses: HashMap<PoseStream, Pose>,
}

impl InputState {
    /// Applies an event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Button { button, state } => match state {
                ButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                ButtonState::Released => {
                    if self.buttons_down.remove(&button) {
                        frame.buttons_released.insert(button);
                    }
                }
            },

            InputEvent::Axis { axis, value } => {
                if value.is_finite() {
                    self.axes.insert(axis, value.clamp(0.0, 1.0));
                } else {
                    log::debug!("ignoring non-finite value for {:?}", axis);
                }
            }

            InputEvent::Pose { stream, pose } => {
                if pose.is_finite() {
                    self.poses.insert(stream, pose);
                } else {
                    log::debug!("ignoring non-finite {:?} pose", stream);
                }
            }

            InputEvent::Tracking(t) => {
                self.tracking = t;
                if !t {
                    // Avoid stuck buttons/triggers while devices are gone.
                    frame.buttons_released.extend(self.buttons_down.drain());
                    self.axes.clear();
                }
            }
        }

        frame.push_event(ev);
    }

    pub fn button_down(&self, button: Button) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Last value of `axis`, 0 when never reported.
    pub fn axis(&self, axis: AnalogAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    pub fn pose(&self, stream: PoseStream) -> Option<Pose> {
        self.poses.get(&stream).copied()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn press(b: Button) -> InputEvent {
        InputEvent::Button { button: b, state: ButtonState::Pressed }
    }

    fn release(b: Button) -> InputEvent {
        InputEvent::Button { button: b, state: ButtonState::Released }
    }

    #[test]
    fn press_is_edge_detected_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(Button::One));
        state.apply_event(&mut frame, press(Button::One));
        assert!(state.button_down(Button::One));
        assert!(frame.pressed(Button::One));
        assert_eq!(frame.events.len(), 2);

        frame.clear();
        state.apply_event(&mut frame, press(Button::One));
        assert!(!frame.pressed(Button::One), "repeat press is not a new edge");
    }

    #[test]
    fn release_of_unheld_button_is_not_an_edge() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, release(Button::Two));
        assert!(!frame.released(Button::Two));

        state.apply_event(&mut frame, press(Button::Two));
        state.apply_event(&mut frame, release(Button::Two));
        assert!(frame.released(Button::Two));
        assert!(!state.button_down(Button::Two));
    }

    #[test]
    fn axis_values_are_clamped_and_default_to_zero() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        assert_eq!(state.axis(AnalogAxis::SecondaryIndexTrigger), 0.0);

        state.apply_event(
            &mut frame,
            InputEvent::Axis { axis: AnalogAxis::SecondaryIndexTrigger, value: 1.7 },
        );
        assert_eq!(state.axis(AnalogAxis::SecondaryIndexTrigger), 1.0);

        state.apply_event(
            &mut frame,
            InputEvent::Axis { axis: AnalogAxis::SecondaryIndexTrigger, value: f32::NAN },
        );
        assert_eq!(state.axis(AnalogAxis::SecondaryIndexTrigger), 1.0);
    }

    #[test]
    fn poses_are_tracked_per_stream() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let head = Pose::from_position(Vec3::new(0.0, 1.6, 0.0));
        state.apply_event(&mut frame, InputEvent::Pose { stream: PoseStream::Head, pose: head });
        assert_eq!(state.pose(PoseStream::Head), Some(head));
        assert_eq!(state.pose(PoseStream::Hand), None);
    }

    #[test]
    fn losing_tracking_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, press(Button::One));
        state.apply_event(
            &mut frame,
            InputEvent::Axis { axis: AnalogAxis::PrimaryIndexTrigger, value: 0.9 },
        );
        state.apply_event(&mut frame, InputEvent::Tracking(false));
        assert!(!state.button_down(Button::One));
        assert_eq!(state.axis(AnalogAxis::PrimaryIndexTrigger), 0.0);
    }

    #[test]
    fn losing_tracking_reports_release_edges() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, press(Button::One));
        state.apply_event(&mut frame, press(Button::Two));

        frame.clear();
        state.apply_event(&mut frame, InputEvent::Tracking(false));
        assert!(frame.released(Button::One));
        assert!(frame.released(Button::Two));
        assert!(!frame.released(Button::Three));

        // Nothing left to release a second time.
        frame.clear();
        state.apply_event(&mut frame, InputEvent::Tracking(false));
        assert!(frame.buttons_released.is_empty());
    }
}
