use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{DrawPass, Drawable, RenderCtx};

use super::shape::WorldBinding;
use super::Vertex;

/// Endpoints of a segment from `(x1, y1)` to `(x2, y2)`, relative to its start.
pub fn line_vertices(x1: f32, y1: f32, x2: f32, y2: f32, color: Color) -> [Vertex; 2] {
    [
        Vertex::at(0.0, 0.0).with_uv(0.0, 0.0).with_color(color),
        Vertex::at(x2 - x1, y2 - y1).with_uv(1.0, 0.0).with_color(color),
    ]
}

/// Single line segment drawn with the line-list pipeline.
pub struct Line {
    vbo: wgpu::Buffer,
    world: WorldBinding,
    position: Vec3,
}

impl Line {
    pub const DEFAULT_COLOR: Color = Color::RED;

    pub fn new(ctx: &RenderCtx<'_>, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) -> Self {
        let vertices = line_vertices(x1, y1, x2, y2, color);
        let vbo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("easel line vbo"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let position = Vec3::new(x1, y1, 0.0);
        let world = WorldBinding::new(ctx, "easel line world", Mat4::from_translation(position));

        Self {
            vbo,
            world,
            position,
        }
    }

    /// Red segment.
    pub fn with_default_color(ctx: &RenderCtx<'_>, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(ctx, x1, y1, x2, y2, Self::DEFAULT_COLOR)
    }

    /// Start point of the segment.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the segment so it starts at `position`.
    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

impl Drawable for Line {
    fn draw(&self, pass: &mut DrawPass<'_>) {
        pass.set_line_pipeline();
        self.world.bind(pass, Mat4::from_translation(self.position));

        let rpass = pass.raw();
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.draw(0..2, 0..1);
        pass.count_draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_relative_to_start() {
        let [a, b] = line_vertices(10.0, 20.0, 40.0, 60.0, Color::WHITE);
        assert_eq!(a.position, [0.0, 0.0, 0.0]);
        assert_eq!(b.position, [30.0, 40.0, 0.0]);
        assert_eq!(b.uv, [1.0, 0.0]);
    }

    #[test]
    fn default_color_is_red() {
        let [a, b] = line_vertices(0.0, 0.0, 1.0, 1.0, Line::DEFAULT_COLOR);
        assert_eq!(a.color, [1.0, 0.0, 0.0]);
        assert_eq!(b.color, a.color);
    }
}
