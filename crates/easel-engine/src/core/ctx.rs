use winit::window::Window;

use crate::coords::Viewport;
use crate::input::Input;
use crate::render::RenderCtx;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Window handle plus the few window queries applications need.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    #[inline]
    pub fn new(window: &'a Window) -> Self {
        Self { window }
    }

    /// Returns the logical window size in logical pixels.
    pub fn logical_size(&self) -> Viewport {
        let phys = self.window.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        Viewport::new(logi.width as f32, logi.height as f32)
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

/// Context handed to the application builder before the first frame.
///
/// Shapes, textures and fonts are created against `render`.
pub struct SetupCtx<'a> {
    pub window: WindowCtx<'a>,
    pub render: RenderCtx<'a>,
}

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub window: WindowCtx<'a>,
    pub render: RenderCtx<'a>,
    pub input: Input<'a>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_> {
    /// Ends the loop after the current frame has been presented.
    pub fn exit(&mut self) {
        self.runtime.exit();
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.time.dt
    }
}
