use super::{InputFrame, InputState, Key, MouseButton, PadButton};

/// Side effects requested through [`Input`] during a frame.
///
/// The runtime applies them to the window and the gamepad backend once the frame
/// callback returns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputRequests {
    pub cursor_visible: Option<bool>,
    pub vibration: Option<(f32, f32)>,
}

impl InputRequests {
    /// Takes the pending requests, leaving none behind.
    pub fn take(&mut self) -> InputRequests {
        std::mem::take(self)
    }
}

/// Read view of keyboard, mouse and gamepad input for the current frame.
///
/// "Pressed"/"released" are transitions since the previous frame; "down" is held
/// state.
pub struct Input<'a> {
    state: &'a InputState,
    frame: &'a InputFrame,
    requests: &'a mut InputRequests,
}

impl<'a> Input<'a> {
    pub fn new(
        state: &'a InputState,
        frame: &'a InputFrame,
        requests: &'a mut InputRequests,
    ) -> Self {
        Self {
            state,
            frame,
            requests,
        }
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    #[inline]
    pub fn pressed_key(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn released_key(&self, key: Key) -> bool {
        self.frame.keys_released.contains(&key)
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn pressed_mouse(&self, button: MouseButton) -> bool {
        self.frame.buttons_pressed.contains(&button)
    }

    #[inline]
    pub fn released_mouse(&self, button: MouseButton) -> bool {
        self.frame.buttons_released.contains(&button)
    }

    #[inline]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.state.button_down(button)
    }

    /// Shows or hides the OS cursor over the window.
    pub fn set_visible_cursor(&mut self, visible: bool) {
        self.requests.cursor_visible = Some(visible);
    }

    /// Pointer position in logical pixels, `(0, 0)` while outside the window.
    pub fn cursor_position(&self) -> (f32, f32) {
        self.state.pointer_pos.unwrap_or((0.0, 0.0))
    }

    #[inline]
    pub fn cursor_x(&self) -> i32 {
        self.cursor_position().0 as i32
    }

    #[inline]
    pub fn cursor_y(&self) -> i32 {
        self.cursor_position().1 as i32
    }

    /// Wheel movement this frame, in lines.
    #[inline]
    pub fn wheel(&self) -> (f32, f32) {
        self.frame.wheel
    }

    // ── gamepad ───────────────────────────────────────────────────────────

    #[inline]
    pub fn gamepad_connected(&self) -> bool {
        self.state.gamepad.connected
    }

    #[inline]
    pub fn pressed_button(&self, button: PadButton) -> bool {
        self.frame.pad_pressed.contains(&button)
    }

    #[inline]
    pub fn released_button(&self, button: PadButton) -> bool {
        self.frame.pad_released.contains(&button)
    }

    #[inline]
    pub fn button_down(&self, button: PadButton) -> bool {
        self.state.gamepad.button_down(button)
    }

    /// Sets rumble strength for the low-frequency (left) and high-frequency (right)
    /// motors, each in `[0, 1]`. `(0, 0)` stops vibration.
    pub fn set_vibration(&mut self, left: f32, right: f32) {
        self.requests.vibration = Some((left.clamp(0.0, 1.0), right.clamp(0.0, 1.0)));
    }

    #[inline]
    pub fn left_stick_x(&self) -> f32 {
        self.state.gamepad.left_stick.0
    }

    #[inline]
    pub fn left_stick_y(&self) -> f32 {
        self.state.gamepad.left_stick.1
    }

    #[inline]
    pub fn right_stick_x(&self) -> f32 {
        self.state.gamepad.right_stick.0
    }

    #[inline]
    pub fn right_stick_y(&self) -> f32 {
        self.state.gamepad.right_stick.1
    }

    // ── raw ───────────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> &'a InputState {
        self.state
    }

    #[inline]
    pub fn frame(&self) -> &'a InputFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{GamepadEvent, InputEvent, KeyState, Modifiers, PointerMoveEvent, StickAxis};

    fn feed(events: Vec<InputEvent>) -> (InputState, InputFrame) {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for ev in events {
            state.apply_event(&mut frame, ev);
        }
        (state, frame)
    }

    #[test]
    fn key_queries() {
        let (state, frame) = feed(vec![InputEvent::Key {
            key: Key::Enter,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }]);
        let mut req = InputRequests::default();
        let input = Input::new(&state, &frame, &mut req);
        assert!(input.pressed_key(Key::Enter));
        assert!(input.key_down(Key::Enter));
        assert!(!input.released_key(Key::Enter));
    }

    #[test]
    fn cursor_is_truncated_to_integers() {
        let (state, frame) = feed(vec![InputEvent::PointerMoved(PointerMoveEvent {
            x: 10.7,
            y: 3.2,
        })]);
        let mut req = InputRequests::default();
        let input = Input::new(&state, &frame, &mut req);
        assert_eq!((input.cursor_x(), input.cursor_y()), (10, 3));
    }

    #[test]
    fn sticks_read_from_gamepad_state() {
        let (state, frame) = feed(vec![
            InputEvent::Gamepad(GamepadEvent::Connected),
            InputEvent::Gamepad(GamepadEvent::Axis { axis: StickAxis::LeftY, value: 0.25 }),
        ]);
        let mut req = InputRequests::default();
        let input = Input::new(&state, &frame, &mut req);
        assert!(input.gamepad_connected());
        assert_eq!(input.left_stick_y(), 0.25);
        assert_eq!(input.right_stick_x(), 0.0);
    }

    #[test]
    fn side_effects_are_queued() {
        let (state, frame) = feed(vec![]);
        let mut req = InputRequests::default();
        {
            let mut input = Input::new(&state, &frame, &mut req);
            input.set_visible_cursor(false);
            input.set_vibration(2.0, 0.5);
        }
        let taken = req.take();
        assert_eq!(taken.cursor_visible, Some(false));
        assert_eq!(taken.vibration, Some((1.0, 0.5)));
        assert_eq!(req, InputRequests::default());
    }
}
