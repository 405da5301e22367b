/// Drawable area in logical pixels.
///
/// Resources are laid out against this size; the camera projection is rebuilt from
/// it whenever the window is resized.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns a copy with both dimensions clamped to at least one pixel.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(self.width.max(1.0), self.height.max(1.0))
    }
}
