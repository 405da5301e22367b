use std::collections::HashSet;

use super::frame::InputFrame;
use super::gamepad::GamepadState;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for the window.
///
/// Holds "is down" information, the pointer position and the tracked gamepad.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,

    /// Player-0 gamepad.
    pub gamepad: GamepadState,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Keys released while unfocused never arrive; drop them now.
                    for key in self.keys_down.drain() {
                        frame.keys_released.insert(key);
                    }
                    for button in self.buttons_down.drain() {
                        frame.buttons_released.insert(button);
                    }
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                let (dx, dy) = match *delta {
                    MouseWheelDelta::Line { x, y } => (x, y),
                    MouseWheelDelta::Pixel { x, y } => {
                        (x / InputFrame::WHEEL_LINE_PX, y / InputFrame::WHEEL_LINE_PX)
                    }
                };
                frame.wheel.0 += dx;
                frame.wheel.1 += dy;
            }

            InputEvent::Text(t) => {
                frame.text.push(t.clone());
            }

            InputEvent::Gamepad(g) => {
                self.gamepad
                    .apply(*g, &mut frame.pad_pressed, &mut frame.pad_released);
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{GamepadEvent, PadButton, TextEvent};

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }

    fn click(button: MouseButton, state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x: 5.0,
            y: 7.0,
            modifiers: Modifiers::default(),
        })
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    #[test]
    fn key_press_is_a_transition_only_once() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, key(Key::Space, KeyState::Pressed));
        assert!(f.keys_pressed.contains(&Key::Space));
        assert!(s.key_down(Key::Space));

        f.clear();
        // OS key repeat.
        s.apply_event(&mut f, key(Key::Space, KeyState::Pressed));
        assert!(f.keys_pressed.is_empty());
        assert!(s.key_down(Key::Space));

        s.apply_event(&mut f, key(Key::Space, KeyState::Released));
        assert!(f.keys_released.contains(&Key::Space));
        assert!(!s.key_down(Key::Space));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::A, KeyState::Released));
        assert!(f.keys_released.is_empty());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::W, KeyState::Pressed));
        s.apply_event(&mut f, click(MouseButton::Left, MouseButtonState::Pressed));
        f.clear();

        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(s.buttons_down.is_empty());
        assert!(f.keys_released.contains(&Key::W));
        assert!(f.buttons_released.contains(&MouseButton::Left));
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[test]
    fn button_updates_pointer_and_transitions() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, click(MouseButton::Back, MouseButtonState::Pressed));
        assert_eq!(s.pointer_pos, Some((5.0, 7.0)));
        assert!(f.buttons_pressed.contains(&MouseButton::Back));
        assert!(s.button_down(MouseButton::Back));
    }

    #[test]
    fn pointer_leaves_window() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        assert_eq!(s.pointer_pos, Some((1.0, 2.0)));
        s.apply_event(&mut f, InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn wheel_accumulates_in_lines() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        let m = Modifiers::default();
        s.apply_event(
            &mut f,
            InputEvent::MouseWheel {
                delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
                modifiers: m,
            },
        );
        s.apply_event(
            &mut f,
            InputEvent::MouseWheel {
                delta: MouseWheelDelta::Pixel { x: 0.0, y: 80.0 },
                modifiers: m,
            },
        );
        assert_eq!(f.wheel, (0.0, 3.0));
        f.clear();
        assert_eq!(f.wheel, (0.0, 0.0));
    }

    // ── streams ───────────────────────────────────────────────────────────

    #[test]
    fn events_and_text_are_recorded_in_order() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::Text(TextEvent { text: "a".into() }));
        s.apply_event(&mut f, InputEvent::Focused(true));
        assert_eq!(f.events.len(), 2);
        assert_eq!(f.text.len(), 1);
        assert!(s.focused);
        f.clear();
        assert!(f.is_empty());
    }

    #[test]
    fn gamepad_events_feed_gamepad_state() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::Gamepad(GamepadEvent::Connected));
        s.apply_event(
            &mut f,
            InputEvent::Gamepad(GamepadEvent::Button { button: PadButton::B, pressed: true }),
        );
        assert!(s.gamepad.connected);
        assert!(f.pad_pressed.contains(&PadButton::B));
    }
}
