use std::collections::HashSet;

use super::types::{Button, InputEvent};

/// Per-frame input deltas.
///
/// `InputState` answers "is it held"; `InputFrame` answers "did it change this
/// frame" (edge detection) and keeps the raw events in arrival order.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,

    /// Buttons that went down this frame.
    pub buttons_pressed: HashSet<Button>,

    /// Buttons that went up this frame.
    pub buttons_released: HashSet<Button>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn released(&self, button: Button) -> bool {
        self.buttons_released.contains(&button)
    }
}
