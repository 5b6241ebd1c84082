use std::fmt;

use serde::Deserialize;

use crate::input::{AnalogAxis, Button, InputState};

use super::{Eye, EyePair, EyeSource, EyeViewpoint};

/// Which tracked camera pair supplies the eye positions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ViewpointSource {
    Head,
    Hand,
}

impl fmt::Display for ViewpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewpointSource::Head => f.write_str("head"),
            ViewpointSource::Hand => f.write_str("hand"),
        }
    }
}

/// Input bindings for source selection.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Analog channel that switches to the hand source.
    pub source_axis: AnalogAxis,
    /// Values at or above this select the hand source.
    pub threshold: f32,
    /// Held (while the hand source is active) to show the debug overlay.
    pub debug_button: Button,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            source_axis: AnalogAxis::SecondaryIndexTrigger,
            threshold: 0.5,
            debug_button: Button::One,
        }
    }
}

/// Outcome of one selection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Selection {
    pub source: ViewpointSource,
    pub debug_visible: bool,
}

/// Eye positions in effect for the current tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ActiveViewpoint {
    pub selection: Selection,
    /// Pair of the selected source.
    pub eyes: EyePair,
    /// Hand pair regardless of selection (debug overlay origin).
    pub hand: EyePair,
}

impl EyeSource for ActiveViewpoint {
    fn eye(&self, eye: Eye) -> EyeViewpoint {
        *self.eyes.get(eye)
    }
}

/// Chooses head or hand eyes from an analog threshold, every tick.
///
/// The switch is exclusive and immediate: no blending, no hysteresis.
#[derive(Debug, Clone)]
pub struct ViewpointSelector {
    config: SelectorConfig,
    last: Option<ViewpointSource>,
}

impl ViewpointSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Reads the selection channels from `input`.
    pub fn select(&mut self, input: &InputState) -> Selection {
        let selection = if input.axis(self.config.source_axis) >= self.config.threshold {
            Selection {
                source: ViewpointSource::Hand,
                debug_visible: input.button_down(self.config.debug_button),
            }
        } else {
            Selection {
                source: ViewpointSource::Head,
                debug_visible: false,
            }
        };

        if self.last != Some(selection.source) {
            log::debug!("viewpoint source -> {}", selection.source);
            self.last = Some(selection.source);
        }

        selection
    }

    /// Selects a source and resolves the eye pair that goes with it.
    pub fn update(&mut self, input: &InputState, head: EyePair, hand: EyePair) -> ActiveViewpoint {
        let selection = self.select(input);
        let eyes = match selection.source {
            ViewpointSource::Head => head,
            ViewpointSource::Hand => hand,
        };
        ActiveViewpoint {
            selection,
            eyes,
            hand,
        }
    }
}

impl Default for ViewpointSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::input::{ButtonState, InputEvent, InputFrame, Pose};
    use crate::viewpoint::StereoConfig;

    fn input(trigger: f32, button_one: bool) -> InputState {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Axis { axis: AnalogAxis::SecondaryIndexTrigger, value: trigger },
        );
        if button_one {
            state.apply_event(
                &mut frame,
                InputEvent::Button { button: Button::One, state: ButtonState::Pressed },
            );
        }
        state
    }

    fn pair(x: f32) -> EyePair {
        EyePair::from_pose(&Pose::from_position(Vec3::new(x, 1.0, 0.0)), &StereoConfig::default())
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut sel = ViewpointSelector::default();
        assert_eq!(sel.select(&input(0.5, false)).source, ViewpointSource::Hand);
        assert_eq!(sel.select(&input(0.499, false)).source, ViewpointSource::Head);
    }

    #[test]
    fn debug_requires_hand_source_and_button() {
        let mut sel = ViewpointSelector::default();
        assert!(sel.select(&input(0.9, true)).debug_visible);
        assert!(!sel.select(&input(0.9, false)).debug_visible);
        assert!(!sel.select(&input(0.1, true)).debug_visible);
    }

    #[test]
    fn update_switches_pairs_exclusively() {
        let mut sel = ViewpointSelector::default();
        let (head, hand) = (pair(0.0), pair(5.0));

        let active = sel.update(&input(0.0, false), head, hand);
        assert_eq!(active.eyes, head);
        assert_eq!(active.eye(Eye::Left), head.left);

        let active = sel.update(&input(1.0, false), head, hand);
        assert_eq!(active.eyes, hand);
        assert_eq!(active.hand, hand);

        // Immediate switch back on the next read.
        let active = sel.update(&input(0.2, false), head, hand);
        assert_eq!(active.selection.source, ViewpointSource::Head);
    }

    #[test]
    fn custom_channels_are_honored() {
        let mut sel = ViewpointSelector::new(SelectorConfig {
            source_axis: AnalogAxis::PrimaryHandTrigger,
            threshold: 0.8,
            debug_button: Button::Three,
        });
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Axis { axis: AnalogAxis::PrimaryHandTrigger, value: 0.85 },
        );
        state.apply_event(
            &mut frame,
            InputEvent::Button { button: Button::Three, state: ButtonState::Pressed },
        );
        let s = sel.select(&state);
        assert_eq!(s.source, ViewpointSource::Hand);
        assert!(s.debug_visible);
    }
}
