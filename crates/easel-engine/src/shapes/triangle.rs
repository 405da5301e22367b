use crate::paint::Color;

use super::{Mesh, Vertex};

/// Equilateral triangle with side `length`, apex up, centred on the origin.
pub fn triangle_mesh(length: f32, color: Color) -> Mesh {
    let h = 3f32.sqrt() / 2.0 * length;
    let half = length / 2.0;

    let vertices = vec![
        Vertex::at(0.0, -h / 2.0).with_uv(0.5, 0.0).with_color(color),
        Vertex::at(half, h / 2.0).with_uv(1.0, 1.0).with_color(color),
        Vertex::at(-half, h / 2.0).with_uv(0.0, 1.0).with_color(color),
    ];

    Mesh::new(vertices, vec![0, 1, 2])
}
