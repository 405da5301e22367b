use crate::coords::Viewport;

use super::BindLayouts;

/// Resource-creation context (device/queue + surface format + viewport + shared layouts).
///
/// Shapes, textures and fonts are built against this.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
    pub layouts: &'a BindLayouts,
    pub(crate) sampler: &'a wgpu::Sampler,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        layouts: &'a BindLayouts,
        sampler: &'a wgpu::Sampler,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
            layouts,
            sampler,
        }
    }

    /// Linear-filtering, repeat-addressing sampler shared by all textures.
    #[inline]
    pub fn sampler(&self) -> &'a wgpu::Sampler {
        self.sampler
    }
}
