//! Coordinate types shared by shapes, textures and text.
//!
//! Canonical CPU space:
//! - logical pixels (DPI-aware)
//! - origin top-left
//! - +X right, +Y down
//!
//! The camera uniform maps this space to clip space; see `render::Camera`.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
