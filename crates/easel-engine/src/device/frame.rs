/// One acquired back buffer plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
/// Hand it back to `Gpu::submit` to execute and present.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
