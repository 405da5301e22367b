use std::collections::HashSet;

use super::gamepad::PadButton;
use super::types::{InputEvent, Key, MouseButton, TextEvent};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed since
/// the last frame. The runtime clears it after every presented frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    pub pad_pressed: HashSet<PadButton>,
    pub pad_released: HashSet<PadButton>,

    /// Accumulated wheel movement in lines (pixel deltas are divided by the line height).
    pub wheel: (f32, f32),

    /// Text committed this frame.
    pub text: Vec<TextEvent>,
}

impl InputFrame {
    /// Pixels per wheel line when converting high-precision deltas.
    pub const WHEEL_LINE_PX: f32 = 40.0;

    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pad_pressed.clear();
        self.pad_released.clear();
        self.wheel = (0.0, 0.0);
        self.text.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
