use crate::paint::Color;

use super::{Mesh, Vertex};

/// Quad centred on the origin with half extents `((ex - sx) / 2, (ey - sy) / 2)`.
///
/// The shape built from it is translated to `(sx, sy)`, so `(sx, sy)` ends up at the
/// centre of the quad.
pub fn box_mesh(sx: f32, sy: f32, ex: f32, ey: f32, color: Color) -> Mesh {
    let hx = (ex - sx) / 2.0;
    let hy = (ey - sy) / 2.0;

    let vertices = vec![
        Vertex::at(-hx, hy).with_uv(0.0, 1.0).with_color(color),
        Vertex::at(hx, hy).with_uv(1.0, 1.0).with_color(color),
        Vertex::at(-hx, -hy).with_uv(0.0, 0.0).with_color(color),
        Vertex::at(hx, -hy).with_uv(1.0, 0.0).with_color(color),
    ];

    Mesh::new(vertices, vec![0, 1, 2, 1, 3, 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_extents_from_corners() {
        let m = box_mesh(10.0, 20.0, 110.0, 70.0, Color::WHITE);
        assert_eq!(m.vertices[0].position, [-50.0, 25.0, 0.0]);
        assert_eq!(m.vertices[3].position, [50.0, -25.0, 0.0]);
    }

    #[test]
    fn uv_corners_and_winding() {
        let m = box_mesh(0.0, 0.0, 2.0, 2.0, Color::WHITE);
        assert_eq!(m.uvs(), vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(m.indices, vec![0, 1, 2, 1, 3, 2]);
        assert!(m.indices_in_bounds());
    }

    #[test]
    fn vertices_carry_color() {
        let m = box_mesh(0.0, 0.0, 4.0, 4.0, Color::rgb(0.2, 0.4, 0.6));
        assert!(m.vertices.iter().all(|v| v.color == [0.2, 0.4, 0.6]));
    }
}
