//! Input subsystem: keyboard, mouse and gamepad.
//!
//! The public API is platform-agnostic and does not expose winit or gilrs types.
//! `platform` translates backend events into `InputEvent`s.

mod frame;
mod gamepad;
pub mod platform;
mod query;
mod state;
mod types;

pub use frame::InputFrame;
pub use gamepad::{GamepadEvent, GamepadState, PadButton, StickAxis};
pub use query::{Input, InputRequests};
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
};
