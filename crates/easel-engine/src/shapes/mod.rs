//! Immediate-mode shapes: triangle, box, circle and line.
//!
//! Mesh generators are pure and produce geometry centred on the origin; the shape's
//! transform places it on screen.

mod box_shape;
mod circle;
mod line;
mod mesh;
mod shape;
pub mod transform;
mod triangle;
mod vertex;

pub use box_shape::box_mesh;
pub use circle::{circle_mesh, CIRCLE_SEGMENTS};
pub use line::{line_vertices, Line};
pub use mesh::Mesh;
pub use shape::Shape;
pub use transform::Transform;
pub use triangle::triangle_mesh;
pub use vertex::Vertex;
