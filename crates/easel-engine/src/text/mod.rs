//! Bitmap text: fontdue rasterization into a shelf-packed glyph atlas.

mod atlas;
mod error;
mod text;

pub use atlas::{ShelfPacker, ATLAS_SIZE};
pub use error::FontLoadError;
pub use text::Text;
