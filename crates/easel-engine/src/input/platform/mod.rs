//! Backend translation: winit window events and gilrs gamepad events.

pub mod gilrs;
pub mod winit;
