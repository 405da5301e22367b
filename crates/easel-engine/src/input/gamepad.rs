use std::collections::HashSet;

/// Gamepad button, named after the standard Xbox layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    View,
    Menu,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl PadButton {
    pub const ALL: [PadButton; 14] = [
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
        PadButton::LeftStick,
        PadButton::RightStick,
        PadButton::LeftShoulder,
        PadButton::RightShoulder,
        PadButton::View,
        PadButton::Menu,
        PadButton::DPadUp,
        PadButton::DPadDown,
        PadButton::DPadLeft,
        PadButton::DPadRight,
    ];
}

/// Analog stick axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StickAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

/// Change reported by the gamepad backend for the tracked pad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GamepadEvent {
    Connected,
    Disconnected,
    Button { button: PadButton, pressed: bool },
    /// Raw value in `[-1, 1]`; +Y is up.
    Axis { axis: StickAxis, value: f32 },
}

/// Held state of the tracked gamepad (player 0).
///
/// Everything resets to neutral while no pad is connected.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GamepadState {
    pub connected: bool,
    pub buttons_down: HashSet<PadButton>,
    pub left_stick: (f32, f32),
    pub right_stick: (f32, f32),
}

impl GamepadState {
    /// Applies `ev`; newly pressed/released buttons are added to the given sets.
    pub(crate) fn apply(
        &mut self,
        ev: GamepadEvent,
        pressed: &mut HashSet<PadButton>,
        released: &mut HashSet<PadButton>,
    ) {
        match ev {
            GamepadEvent::Connected => {
                self.connected = true;
            }
            GamepadEvent::Disconnected => {
                *self = Self::default();
            }
            GamepadEvent::Button { button, pressed: down } => {
                if !self.connected {
                    return;
                }
                if down {
                    if self.buttons_down.insert(button) {
                        pressed.insert(button);
                    }
                } else if self.buttons_down.remove(&button) {
                    released.insert(button);
                }
            }
            GamepadEvent::Axis { axis, value } => {
                if !self.connected {
                    return;
                }
                let value = if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 };
                match axis {
                    StickAxis::LeftX => self.left_stick.0 = value,
                    StickAxis::LeftY => self.left_stick.1 = value,
                    StickAxis::RightX => self.right_stick.0 = value,
                    StickAxis::RightY => self.right_stick.1 = value,
                }
            }
        }
    }

    #[inline]
    pub fn button_down(&self, button: PadButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(
        state: &mut GamepadState,
        ev: GamepadEvent,
    ) -> (HashSet<PadButton>, HashSet<PadButton>) {
        let (mut p, mut r) = (HashSet::new(), HashSet::new());
        state.apply(ev, &mut p, &mut r);
        (p, r)
    }

    fn press(button: PadButton) -> GamepadEvent {
        GamepadEvent::Button { button, pressed: true }
    }

    fn release(button: PadButton) -> GamepadEvent {
        GamepadEvent::Button { button, pressed: false }
    }

    // ── buttons ───────────────────────────────────────────────────────────

    #[test]
    fn press_and_release_are_reported_once() {
        let mut s = GamepadState::default();
        apply(&mut s, GamepadEvent::Connected);

        let (p, _) = apply(&mut s, press(PadButton::A));
        assert!(p.contains(&PadButton::A));
        assert!(s.button_down(PadButton::A));

        // A repeated press while held is not a new transition.
        let (p, _) = apply(&mut s, press(PadButton::A));
        assert!(p.is_empty());

        let (_, r) = apply(&mut s, release(PadButton::A));
        assert!(r.contains(&PadButton::A));
        assert!(!s.button_down(PadButton::A));
    }

    #[test]
    fn input_ignored_while_disconnected() {
        let mut s = GamepadState::default();
        let (p, _) = apply(&mut s, press(PadButton::Menu));
        assert!(p.is_empty());
        apply(&mut s, GamepadEvent::Axis { axis: StickAxis::LeftX, value: 0.5 });
        assert_eq!(s.left_stick, (0.0, 0.0));
    }

    // ── connection ────────────────────────────────────────────────────────

    #[test]
    fn disconnect_resets_tracker() {
        let mut s = GamepadState::default();
        apply(&mut s, GamepadEvent::Connected);
        apply(&mut s, press(PadButton::DPadUp));
        apply(&mut s, GamepadEvent::Axis { axis: StickAxis::RightY, value: -0.7 });

        apply(&mut s, GamepadEvent::Disconnected);
        assert_eq!(s, GamepadState::default());
    }

    // ── sticks ────────────────────────────────────────────────────────────

    #[test]
    fn sticks_are_raw_and_clamped() {
        let mut s = GamepadState::default();
        apply(&mut s, GamepadEvent::Connected);
        apply(&mut s, GamepadEvent::Axis { axis: StickAxis::LeftX, value: 0.01 });
        apply(&mut s, GamepadEvent::Axis { axis: StickAxis::LeftY, value: 1.5 });
        apply(&mut s, GamepadEvent::Axis { axis: StickAxis::RightX, value: f32::NAN });
        assert_eq!(s.left_stick, (0.01, 1.0));
        assert_eq!(s.right_stick, (0.0, 0.0));
    }

    #[test]
    fn all_lists_every_button_once() {
        let unique: HashSet<_> = PadButton::ALL.iter().collect();
        assert_eq!(unique.len(), PadButton::ALL.len());
    }
}
