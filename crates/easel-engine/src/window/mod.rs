//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer and paces
//! frames through the `FrameLimiter`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
