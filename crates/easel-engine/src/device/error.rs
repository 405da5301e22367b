/// What the runtime does after `Gpu::begin_frame` failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Swap chain rebuilt (lost/outdated); the next frame can render.
    Reconfigured,
    /// Acquire timed out or failed transiently; drop this frame only.
    SkipFrame,
    /// Out of memory; the runtime shuts down.
    Fatal,
}
