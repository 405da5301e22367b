use super::Renderer;

/// Which pipeline a [`DrawPass`] currently has bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineKind {
    /// Triangle list, vertex color.
    Flat,
    /// Triangle list, texel x vertex color, alpha blended.
    Textured,
    /// Line list, vertex color.
    Line,
    /// A pipeline owned by something else (glyph rendering).
    External,
}

/// Something that can record itself into a [`DrawPass`].
pub trait Drawable {
    fn draw(&self, pass: &mut DrawPass<'_>);
}

/// The frame's render pass, opened by [`Renderer::begin_draw`].
///
/// Draw calls are recorded in call order; there is no sorting or batching.
pub struct DrawPass<'a> {
    rpass: wgpu::RenderPass<'a>,
    renderer: &'a Renderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    current: Option<PipelineKind>,
    frame_index: u64,
    draw_calls: u32,
}

impl<'a> DrawPass<'a> {
    pub(crate) fn new(
        rpass: wgpu::RenderPass<'a>,
        renderer: &'a Renderer,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        frame_index: u64,
    ) -> Self {
        Self {
            rpass,
            renderer,
            device,
            queue,
            current: None,
            frame_index,
            draw_calls: 0,
        }
    }

    /// Selects the flat-color triangle pipeline.
    pub fn set_flat_pipeline(&mut self) {
        self.use_pipeline(PipelineKind::Flat);
    }

    /// Selects the textured triangle pipeline.
    pub fn set_texture_pipeline(&mut self) {
        self.use_pipeline(PipelineKind::Textured);
    }

    /// Selects the line-list pipeline.
    pub fn set_line_pipeline(&mut self) {
        self.use_pipeline(PipelineKind::Line);
    }

    fn use_pipeline(&mut self, kind: PipelineKind) {
        if self.current == Some(kind) {
            return;
        }
        let renderer = self.renderer;
        let pipeline = match kind {
            PipelineKind::Flat => renderer.flat_pipeline(),
            PipelineKind::Textured => renderer.textured_pipeline(),
            PipelineKind::Line => renderer.line_pipeline(),
            PipelineKind::External => return,
        };
        self.rpass.set_pipeline(pipeline);
        self.rpass.set_bind_group(0, renderer.camera().bind_group(), &[]);
        self.current = Some(kind);
    }

    /// Binds a pipeline that is not one of the renderer's own. Its group 0 must be
    /// the camera layout.
    pub(crate) fn set_external_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        self.rpass.set_pipeline(pipeline);
        self.rpass
            .set_bind_group(0, self.renderer.camera().bind_group(), &[]);
        self.current = Some(PipelineKind::External);
    }

    /// Pipeline currently bound, if any.
    #[inline]
    pub fn pipeline(&self) -> Option<PipelineKind> {
        self.current
    }

    /// Records `drawable`.
    pub fn draw<D: Drawable + ?Sized>(&mut self, drawable: &D) {
        drawable.draw(self);
    }

    #[inline]
    pub fn device(&self) -> &'a wgpu::Device {
        self.device
    }

    #[inline]
    pub fn queue(&self) -> &'a wgpu::Queue {
        self.queue
    }

    #[inline]
    pub fn renderer(&self) -> &'a Renderer {
        self.renderer
    }

    /// Index of the frame being recorded.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Draw calls recorded so far in this pass.
    #[inline]
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }

    /// Raw render pass for recording commands directly.
    pub(crate) fn raw(&mut self) -> &mut wgpu::RenderPass<'a> {
        &mut self.rpass
    }

    pub(crate) fn count_draw(&mut self) {
        self.draw_calls += 1;
    }
}
