use std::cell::Cell;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{DrawPass, Drawable, MatrixUniform, RenderCtx};

use super::transform::{self, Transform};
use super::{box_mesh, circle_mesh, triangle_mesh, Mesh, Vertex};

/// Per-shape world-transform uniform and its group 1 bind group.
pub(crate) struct WorldBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl WorldBinding {
    pub(crate) fn new(ctx: &RenderCtx<'_>, label: &str, initial: Mat4) -> Self {
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(&MatrixUniform::from_mat4(initial)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &ctx.layouts.world,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }

    /// Uploads `world` and binds it at group 1.
    pub(crate) fn bind(&self, pass: &mut DrawPass<'_>, world: Mat4) {
        pass.queue().write_buffer(
            &self.buffer,
            0,
            bytemuck::bytes_of(&MatrixUniform::from_mat4(world)),
        );
        pass.raw().set_bind_group(1, &self.bind_group, &[]);
    }
}

/// Indexed triangle-list geometry with its own world transform.
///
/// Drawn with whatever pipeline the pass has selected through
/// [`Shape::record`]; the [`Drawable`] impl selects the flat pipeline first.
///
/// The world uniform is rewritten on every draw, so drawing the same shape twice in
/// one frame renders both copies with the last transform.
pub struct Shape {
    vertices: Vec<Vertex>,
    index_count: u32,

    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    world: WorldBinding,

    transform: Transform,
    uv_dirty: Cell<bool>,
}

impl Shape {
    /// Uploads `mesh` and creates the shape's world uniform.
    pub fn new(ctx: &RenderCtx<'_>, mesh: Mesh) -> Self {
        if !mesh.indices_in_bounds() {
            log::warn!(
                "shape has indices past its {} vertices; draw output is undefined",
                mesh.vertices.len()
            );
        }

        let vbo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("easel shape vbo"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        let ibo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("easel shape ibo"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let world = WorldBinding::new(ctx, "easel shape world", Mat4::IDENTITY);

        Self {
            index_count: mesh.indices.len() as u32,
            vertices: mesh.vertices,
            vbo,
            ibo,
            world,
            transform: Transform::IDENTITY,
            uv_dirty: Cell::new(false),
        }
    }

    /// Axis-aligned quad; see [`box_mesh`] for the placement rule.
    pub fn new_box(ctx: &RenderCtx<'_>, sx: f32, sy: f32, ex: f32, ey: f32, color: Color) -> Self {
        let mut shape = Self::new(ctx, box_mesh(sx, sy, ex, ey, color));
        shape.transform = Transform::at(sx, sy);
        shape
    }

    /// Equilateral triangle centred on `(x, y)`.
    pub fn new_triangle(ctx: &RenderCtx<'_>, x: f32, y: f32, length: f32, color: Color) -> Self {
        let mut shape = Self::new(ctx, triangle_mesh(length, color));
        shape.transform = Transform::at(x, y);
        shape
    }

    /// Circle of radius `r` centred on `(x, y)`.
    pub fn new_circle(ctx: &RenderCtx<'_>, x: f32, y: f32, r: f32, color: Color) -> Self {
        let mut shape = Self::new(ctx, circle_mesh(r, color));
        shape.transform = Transform::at(x, y);
        shape
    }

    /// Records the shape with the pass's current pipeline.
    pub fn record(&self, pass: &mut DrawPass<'_>) {
        if self.index_count == 0 {
            return;
        }

        if self.uv_dirty.replace(false) {
            pass.queue()
                .write_buffer(&self.vbo, 0, bytemuck::cast_slice(&self.vertices));
        }

        self.world.bind(pass, self.transform.world());

        let rpass = pass.raw();
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
        pass.count_draw();
    }

    pub fn set_transform(&mut self, position: Mat4, rotation: Mat4, scale: Mat4) {
        self.transform = Transform {
            position,
            rotation,
            scale,
        };
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
    }

    /// Euler angles in radians, applied about X, then Y, then Z.
    #[inline]
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.set_rotation(rotation);
    }

    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.set_scale(scale);
    }

    /// Translation of the position matrix.
    pub fn position(&self) -> Vec3 {
        transform::position_of(self.transform.position)
    }

    /// Euler angles of the rotation matrix.
    pub fn rotation(&self) -> Vec3 {
        transform::rotation_of(self.transform.rotation)
    }

    /// Axis scale of the scale matrix.
    pub fn scale(&self) -> Vec3 {
        transform::scale_of(self.transform.scale)
    }

    /// Replaces per-vertex UVs. Extra entries are ignored; missing ones keep their
    /// current value. The vertex buffer is re-uploaded before the next draw.
    pub fn set_uv(&mut self, uv: &[[f32; 2]]) {
        if uv.len() != self.vertices.len() {
            log::debug!(
                "set_uv: {} coordinates for {} vertices",
                uv.len(),
                self.vertices.len()
            );
        }
        for (v, &uv) in self.vertices.iter_mut().zip(uv) {
            v.uv = uv;
        }
        self.uv_dirty.set(true);
    }

    /// Current per-vertex UVs.
    pub fn uv(&self) -> Vec<[f32; 2]> {
        self.vertices.iter().map(|v| v.uv).collect()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Drawable for Shape {
    fn draw(&self, pass: &mut DrawPass<'_>) {
        pass.set_flat_pipeline();
        self.record(pass);
    }
}
