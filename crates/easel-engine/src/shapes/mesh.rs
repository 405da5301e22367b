use super::Vertex;

/// CPU-side triangle-list geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    #[inline]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        Self { vertices, indices }
    }

    /// Whether every index refers to an existing vertex.
    pub fn indices_in_bounds(&self) -> bool {
        self.indices
            .iter()
            .all(|&i| (i as usize) < self.vertices.len())
    }

    #[inline]
    pub fn uvs(&self) -> Vec<[f32; 2]> {
        self.vertices.iter().map(|v| v.uv).collect()
    }
}
