use winit::event::WindowEvent;

use crate::render::DrawPass;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by users of the runtime.
pub trait App {
    /// Called for every raw window event, after input translation.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per paced frame.
    ///
    /// The back buffer is already cleared and the flat pipeline is selected. The
    /// frame is submitted and presented after this returns.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>, pass: &mut DrawPass<'_>) -> AppControl;
}
