//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and applications.
//! Runtime internals stay private; applications see a construction context once and
//! a per-frame context plus the frame's draw pass afterwards.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
