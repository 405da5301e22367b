//! Image textures and sprite-sheet slicing.

mod error;
mod sprite;
mod texture;

pub use error::TextureError;
pub use sprite::{SpriteGrid, SpriteSheet};
pub use texture::Texture;
