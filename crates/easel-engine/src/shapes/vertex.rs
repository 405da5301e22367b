use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

/// Shape vertex: position, vertex color and texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // color
        2 => Float32x2  // uv
    ];

    /// White vertex at `(x, y)` with zero UV.
    #[inline]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y, 0.0],
            color: [1.0, 1.0, 1.0],
            uv: [0.0, 0.0],
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color.to_rgb_array();
        self
    }

    #[inline]
    pub const fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.uv = [u, v];
        self
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}
