use crate::input::{Button, InputFrame};

use super::EyePair;

/// Relays a live eye pair to a set of auxiliary anchors, with a freeze toggle.
///
/// A press edge of `toggle` flips between following and frozen. While frozen
/// the anchors keep the last relayed positions.
#[derive(Debug, Clone)]
pub struct AnchorRelay {
    toggle: Button,
    frozen: bool,
    anchors: Option<EyePair>,
}

impl AnchorRelay {
    pub fn new(toggle: Button) -> Self {
        Self {
            toggle,
            frozen: false,
            anchors: None,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Applies this frame's toggle edge and returns the anchor positions.
    pub fn update(&mut self, frame: &InputFrame, live: EyePair) -> EyePair {
        if frame.pressed(self.toggle) {
            self.frozen = !self.frozen;
            log::debug!("anchors {}", if self.frozen { "frozen" } else { "following" });
        }

        match (self.frozen, self.anchors) {
            (true, Some(held)) => held,
            _ => {
                self.anchors = Some(live);
                live
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::{ButtonState, InputEvent, InputState, Pose};
    use crate::viewpoint::StereoConfig;

    fn pair(x: f32) -> EyePair {
        EyePair::from_pose(&Pose::from_position(Vec3::new(x, 0.0, 0.0)), &StereoConfig::default())
    }

    fn press_frame(state: &mut InputState, button: Button) -> InputFrame {
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::Button { button, state: ButtonState::Pressed });
        state.apply_event(&mut frame, InputEvent::Button { button, state: ButtonState::Released });
        frame
    }

    #[test]
    fn follows_until_toggled_then_holds() {
        let mut state = InputState::default();
        let mut relay = AnchorRelay::new(Button::Two);
        let idle = InputFrame::default();

        assert_eq!(relay.update(&idle, pair(1.0)), pair(1.0));
        assert_eq!(relay.update(&idle, pair(2.0)), pair(2.0));

        let toggle = press_frame(&mut state, Button::Two);
        assert_eq!(relay.update(&toggle, pair(3.0)), pair(2.0));
        assert!(relay.is_frozen());
        assert_eq!(relay.update(&idle, pair(4.0)), pair(2.0));

        let toggle = press_frame(&mut state, Button::Two);
        assert_eq!(relay.update(&toggle, pair(5.0)), pair(5.0));
        assert!(!relay.is_frozen());
    }

    #[test]
    fn freezing_before_any_update_captures_first_live_pair() {
        let mut state = InputState::default();
        let mut relay = AnchorRelay::new(Button::Two);
        let toggle = press_frame(&mut state, Button::Two);
        assert_eq!(relay.update(&toggle, pair(7.0)), pair(7.0));
        assert_eq!(relay.update(&InputFrame::default(), pair(8.0)), pair(7.0));
    }
}
