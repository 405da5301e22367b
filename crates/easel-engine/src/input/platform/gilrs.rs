use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Repeat, Replay, Ticks};
use gilrs::{Axis as GilrsAxis, Button, EventType, GamepadId, Gilrs, GilrsBuilder};

use crate::input::{GamepadEvent, InputEvent, PadButton, StickAxis};

/// gilrs-backed source of player-0 gamepad events.
///
/// The first connected pad becomes the tracked one; when it disconnects the next
/// connected pad (if any) takes over. Missing gamepad support is not an error: the
/// backend stays inert and logs once.
pub struct GamepadBackend {
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
    rumble: Option<Effect>,
}

impl GamepadBackend {
    pub fn new() -> Self {
        // Default filters would apply a dead zone; sticks are reported raw.
        let gilrs = match GilrsBuilder::new().with_default_filters(false).build() {
            Ok(g) => Some(g),
            Err(err) => {
                log::warn!("gamepad support unavailable: {err}");
                None
            }
        };

        Self {
            gilrs,
            active: None,
            rumble: None,
        }
    }

    /// Drains pending backend events and returns them as input events.
    ///
    /// On the first call a pad that was already connected is reported as a
    /// `Connected` event.
    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut out = Vec::new();
        let Some(gilrs) = self.gilrs.as_mut() else {
            return out;
        };

        if self.active.is_none() {
            if let Some((id, pad)) = gilrs.gamepads().find(|(_, pad)| pad.is_connected()) {
                log::info!("gamepad connected: {}", pad.name());
                self.active = Some(id);
                out.push(InputEvent::Gamepad(GamepadEvent::Connected));
            }
        }

        while let Some(gilrs::Event { id, event, .. }) = gilrs.next_event() {
            match event {
                EventType::Connected => {
                    if self.active.is_none() {
                        log::info!("gamepad connected: {}", gilrs.gamepad(id).name());
                        self.active = Some(id);
                        out.push(InputEvent::Gamepad(GamepadEvent::Connected));
                    }
                }
                EventType::Disconnected if self.active == Some(id) => {
                    log::info!("gamepad disconnected");
                    self.active = None;
                    self.rumble = None;
                    out.push(InputEvent::Gamepad(GamepadEvent::Disconnected));
                }
                _ if self.active != Some(id) => {}
                EventType::ButtonPressed(button, _) => {
                    if let Some(button) = map_button(button) {
                        out.push(InputEvent::Gamepad(GamepadEvent::Button {
                            button,
                            pressed: true,
                        }));
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(button) = map_button(button) {
                        out.push(InputEvent::Gamepad(GamepadEvent::Button {
                            button,
                            pressed: false,
                        }));
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    if let Some(axis) = map_axis(axis) {
                        out.push(InputEvent::Gamepad(GamepadEvent::Axis { axis, value }));
                    }
                }
                _ => {}
            }
        }

        out
    }

    /// Drives the rumble motors of the tracked pad. `(0, 0)` stops vibration.
    pub fn set_vibration(&mut self, left: f32, right: f32) {
        self.rumble = None;

        if left <= 0.0 && right <= 0.0 {
            return;
        }
        let (Some(gilrs), Some(id)) = (self.gilrs.as_mut(), self.active) else {
            return;
        };
        if !gilrs.gamepad(id).is_ff_supported() {
            log::debug!("tracked gamepad has no force feedback");
            return;
        }

        let scheduling = Replay {
            play_for: Ticks::from_ms(100),
            ..Default::default()
        };
        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong {
                    magnitude: magnitude(left),
                },
                scheduling,
                ..Default::default()
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak {
                    magnitude: magnitude(right),
                },
                scheduling,
                ..Default::default()
            })
            .repeat(Repeat::Infinitely)
            .gamepads(&[id])
            .finish(gilrs);

        match effect.and_then(|e| e.play().map(|()| e)) {
            Ok(e) => self.rumble = Some(e),
            Err(err) => log::warn!("failed to start vibration: {err}"),
        }
    }
}

impl Default for GamepadBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn magnitude(strength: f32) -> u16 {
    (strength.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16
}

pub(crate) fn map_button(button: Button) -> Option<PadButton> {
    Some(match button {
        Button::South => PadButton::A,
        Button::East => PadButton::B,
        Button::West => PadButton::X,
        Button::North => PadButton::Y,
        Button::LeftThumb => PadButton::LeftStick,
        Button::RightThumb => PadButton::RightStick,
        Button::LeftTrigger => PadButton::LeftShoulder,
        Button::RightTrigger => PadButton::RightShoulder,
        Button::Select => PadButton::View,
        Button::Start => PadButton::Menu,
        Button::DPadUp => PadButton::DPadUp,
        Button::DPadDown => PadButton::DPadDown,
        Button::DPadLeft => PadButton::DPadLeft,
        Button::DPadRight => PadButton::DPadRight,
        _ => return None,
    })
}

pub(crate) fn map_axis(axis: GilrsAxis) -> Option<StickAxis> {
    Some(match axis {
        GilrsAxis::LeftStickX => StickAxis::LeftX,
        GilrsAxis::LeftStickY => StickAxis::LeftY,
        GilrsAxis::RightStickX => StickAxis::RightX,
        GilrsAxis::RightStickY => StickAxis::RightY,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_buttons_use_xbox_names() {
        assert_eq!(map_button(Button::South), Some(PadButton::A));
        assert_eq!(map_button(Button::East), Some(PadButton::B));
        assert_eq!(map_button(Button::West), Some(PadButton::X));
        assert_eq!(map_button(Button::North), Some(PadButton::Y));
    }

    #[test]
    fn shoulders_and_menu_buttons() {
        assert_eq!(map_button(Button::LeftTrigger), Some(PadButton::LeftShoulder));
        assert_eq!(map_button(Button::Select), Some(PadButton::View));
        assert_eq!(map_button(Button::Start), Some(PadButton::Menu));
        // Analog triggers are not buttons here.
        assert_eq!(map_button(Button::LeftTrigger2), None);
    }

    #[test]
    fn every_pad_button_has_a_source() {
        let sources = [
            Button::South,
            Button::East,
            Button::West,
            Button::North,
            Button::LeftThumb,
            Button::RightThumb,
            Button::LeftTrigger,
            Button::RightTrigger,
            Button::Select,
            Button::Start,
            Button::DPadUp,
            Button::DPadDown,
            Button::DPadLeft,
            Button::DPadRight,
        ];
        let mapped: Vec<_> = sources.iter().filter_map(|b| map_button(*b)).collect();
        for b in PadButton::ALL {
            assert!(mapped.contains(&b), "{b:?} unmapped");
        }
    }

    #[test]
    fn only_stick_axes_are_tracked() {
        assert_eq!(map_axis(GilrsAxis::RightStickY), Some(StickAxis::RightY));
        assert_eq!(map_axis(GilrsAxis::LeftZ), None);
    }

    #[test]
    fn magnitude_scales_to_u16() {
        assert_eq!(magnitude(0.0), 0);
        assert_eq!(magnitude(1.0), u16::MAX);
        assert_eq!(magnitude(7.0), u16::MAX);
    }
}
