//! easel engine crate.
//!
//! A thin 2D framework over wgpu: a paced window loop, a renderer with flat, textured
//! and line pipelines, shapes, sprite-sheet textures, text, input and sound.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;

pub mod shapes;
pub mod texture;
pub mod text;
pub mod audio;

pub use crate::core::{App, AppControl, FrameCtx, SetupCtx};
pub use crate::render::{DrawPass, Drawable, RenderCtx};
pub use crate::window::{Runtime, RuntimeConfig};
