//! Color model used by vertices, text and the clear color.

mod color;

pub use color::Color;
