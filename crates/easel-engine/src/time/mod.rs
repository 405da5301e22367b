//! Time subsystem.
//!
//! Frame pacing without coupling to the runtime:
//! - one `FrameLimiter` per window loop
//! - the runtime polls it and only renders when the gate is open
//! - each rendered frame receives a `FrameTime` snapshot

mod frame_limiter;

pub use frame_limiter::{FrameLimiter, FrameTime, DEFAULT_FRAME_RATE};
