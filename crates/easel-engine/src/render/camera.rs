use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;

/// A single 4x4 matrix as laid out in a WGSL `mat4x4<f32>` uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct MatrixUniform {
    pub matrix: [[f32; 4]; 4],
}

impl MatrixUniform {
    pub(crate) fn from_mat4(m: Mat4) -> Self {
        Self {
            matrix: m.to_cols_array_2d(),
        }
    }

    pub(crate) fn min_binding_size() -> Option<wgpu::BufferSize> {
        wgpu::BufferSize::new(std::mem::size_of::<Self>() as u64)
    }
}

/// Orthographic projection from logical pixels to clip space.
///
/// `(0, 0)` is the top-left corner of the viewport and maps to `(-1, 1)`;
/// `(width, height)` maps to `(1, -1)`. Z passes through.
pub fn pixel_projection(viewport: Viewport) -> Mat4 {
    let vp = viewport.clamped();
    Mat4::from_cols(
        Vec4::new(2.0 / vp.width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -2.0 / vp.height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(-1.0, 1.0, 0.0, 1.0),
    )
}

/// Projection uniform bound at group 0 for every pipeline.
pub struct Camera {
    viewport: Viewport,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Camera {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        viewport: Viewport,
    ) -> Self {
        let uniform = MatrixUniform::from_mat4(pixel_projection(viewport));
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("easel camera ubo"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel camera bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            viewport,
            buffer,
            bind_group,
        }
    }

    /// Rewrites the projection for a new viewport.
    pub fn set_viewport(&mut self, queue: &wgpu::Queue, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        let uniform = MatrixUniform::from_mat4(pixel_projection(viewport));
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn project(vp: Viewport, x: f32, y: f32) -> Vec3 {
        pixel_projection(vp).transform_point3(Vec3::new(x, y, 0.0))
    }

    #[test]
    fn top_left_maps_to_upper_left_clip_corner() {
        let p = project(Viewport::new(800.0, 600.0), 0.0, 0.0);
        assert!((p.x + 1.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bottom_right_maps_to_lower_right_clip_corner() {
        let p = project(Viewport::new(800.0, 600.0), 800.0, 600.0);
        assert!((p.x - 1.0).abs() < 1e-6);
        assert!((p.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn centre_maps_to_origin() {
        let p = project(Viewport::new(1280.0, 720.0), 640.0, 360.0);
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn uniform_is_column_major() {
        let u = MatrixUniform::from_mat4(pixel_projection(Viewport::new(200.0, 100.0)));
        assert_eq!(u.matrix[0][0], 0.01);
        assert_eq!(u.matrix[1][1], -0.02);
        assert_eq!(u.matrix[3], [-1.0, 1.0, 0.0, 1.0]);
    }
}
