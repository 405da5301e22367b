use crate::paint::Color;

use super::{Mesh, Vertex};

/// Rim vertices, one per degree.
pub const CIRCLE_SEGMENTS: usize = 360;

/// Triangle fan approximating a circle of radius `r` centred on the origin.
///
/// Vertex 0 is the centre, vertices `1..=360` sit on the rim at 1°..360°, and a
/// trailing copy of vertex 1 closes the strip. The last triangle is `0, 360, 1`.
pub fn circle_mesh(r: f32, color: Color) -> Mesh {
    let mut vertices = Vec::with_capacity(CIRCLE_SEGMENTS + 2);
    vertices.push(Vertex::at(0.0, 0.0).with_uv(0.5, 0.5).with_color(color));

    for deg in 1..=CIRCLE_SEGMENTS {
        let (sin, cos) = (deg as f32).to_radians().sin_cos();
        vertices.push(
            Vertex::at(cos * r, sin * r)
                .with_uv((cos + 1.0) / 2.0, (sin + 1.0) / 2.0)
                .with_color(color),
        );
    }
    vertices.push(vertices[1]);

    let mut indices = Vec::with_capacity(CIRCLE_SEGMENTS * 3);
    for i in 1..CIRCLE_SEGMENTS as u16 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }
    indices.extend_from_slice(&[0, CIRCLE_SEGMENTS as u16, 1]);

    Mesh::new(vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let m = circle_mesh(10.0, Color::WHITE);
        assert_eq!(m.vertices.len(), 362);
        assert_eq!(m.indices.len(), 1080);
        assert!(m.indices_in_bounds());
    }

    #[test]
    fn fan_closes_on_first_rim_vertex() {
        let m = circle_mesh(10.0, Color::WHITE);
        assert_eq!(&m.indices[..3], &[0, 1, 2]);
        assert_eq!(&m.indices[1077..], &[0, 360, 1]);
        assert_eq!(m.vertices[361], m.vertices[1]);
    }

    #[test]
    fn rim_lies_on_radius() {
        let m = circle_mesh(25.0, Color::WHITE);
        for v in &m.vertices[1..] {
            let d = glam::Vec2::new(v.position[0], v.position[1]).length();
            assert!((d - 25.0).abs() < 1e-3);
        }
    }

    #[test]
    fn uv_maps_unit_disc_to_unit_square() {
        let m = circle_mesh(1.0, Color::WHITE);
        assert_eq!(m.vertices[0].uv, [0.5, 0.5]);
        // 360° lands back on +X: u = 1, v = 0.5
        let uv = m.vertices[360].uv;
        assert!((uv[0] - 1.0).abs() < 1e-5 && (uv[1] - 0.5).abs() < 1e-5);
        // 90° is +Y (down in screen space): v = 1
        let uv = m.vertices[90].uv;
        assert!((uv[0] - 0.5).abs() < 1e-5 && (uv[1] - 1.0).abs() < 1e-5);
    }
}
