//! Pipelines, bindings and the per-frame draw pass.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down)
//! - the camera uniform (group 0) maps it to clip space
//! - each shape owns its world-transform uniform (group 1)
//! - textured draws bind a texture + sampler (group 2)

mod camera;
mod ctx;
mod layouts;
mod pass;
mod renderer;

pub use camera::{pixel_projection, Camera};
pub use ctx::RenderCtx;
pub use layouts::BindLayouts;
pub use pass::{DrawPass, Drawable, PipelineKind};
pub use renderer::Renderer;

pub(crate) use camera::MatrixUniform;
