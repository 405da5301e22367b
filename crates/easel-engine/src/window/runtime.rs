use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{App, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::input::platform::gilrs::GamepadBackend;
use crate::input::platform::winit::{apply_cursor_request, translate_window_event};
use crate::input::{Input, InputFrame, InputRequests, InputState};
use crate::paint::Color;
use crate::render::Renderer;
use crate::time::{DEFAULT_FRAME_RATE, FrameLimiter};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Logical pixels.
    pub width: u32,
    pub height: u32,
    /// Target frames per second for the limiter.
    pub frame_rate: f64,
    pub clear_color: Color,
    pub resizable: bool,
    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 1280,
            height: 720,
            frame_rate: DEFAULT_FRAME_RATE,
            clear_color: Color::BLACK,
            resizable: true,
            gpu: GpuInit::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current frame has been presented.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    /// Changes the color the back buffer is cleared to from the next frame on.
    pub fn set_clear_color(&mut self, color: Color) {
        self.commands.push(Command::SetClearColor(color));
    }

    fn exit_requested(&self) -> bool {
        self.commands.iter().any(|c| matches!(c, Command::Exit))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Exit,
    SetTitle(String),
    SetClearColor(Color),
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, builds the application with `build` and runs the loop until
    /// the window closes or the application asks to exit.
    ///
    /// Errors from window/GPU creation or from `build` are returned once the loop
    /// has shut down.
    pub fn run<A, F>(config: RuntimeConfig, build: F) -> Result<()>
    where
        A: App + 'static,
        F: FnOnce(&mut SetupCtx<'_>) -> Result<A>,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, build);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything that exists while the window is open.
///
/// Fields drop in order: the app's GPU resources go before the device.
struct Session<A> {
    app: A,
    renderer: Renderer,
    entry: WindowEntry,
    input_state: InputState,
    input_frame: InputFrame,
    requests: InputRequests,
    limiter: FrameLimiter,
    gamepad: GamepadBackend,
    shown: bool,
}

enum FrameOutcome {
    Presented(AppControl),
    Skipped,
    Fatal,
}

impl FrameOutcome {
    /// Whether the frame closed the limiter gate and used up this frame's input transitions.
    fn consumes_frame(&self) -> bool {
        matches!(self, FrameOutcome::Presented(_))
    }
}

struct AppState<A, F> {
    config: RuntimeConfig,
    build: Option<F>,
    session: Option<Session<A>>,
    error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A, F> AppState<A, F>
where
    A: App + 'static,
    F: FnOnce(&mut SetupCtx<'_>) -> Result<A>,
{
    fn new(config: RuntimeConfig, build: F) -> Self {
        Self {
            config,
            build: Some(build),
            session: None,
            error: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.request_exit(event_loop);
    }

    fn open_session(&self, event_loop: &ActiveEventLoop, build: F) -> Result<Session<A>> {
        let config = &self.config;

        // Shown after the first frame is presented so no blank window flashes up.
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
            .with_resizable(config.resizable)
            .with_visible(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        log::info!("window created: {}x{} \"{}\"", config.width, config.height, config.title);

        let gpu_init = config.gpu.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let viewport = entry.with_window(logical_viewport);
        let renderer = entry.with_gpu(|gpu| Renderer::new(gpu, viewport, config.clear_color));

        let app = entry.with(|fields| {
            let mut setup = SetupCtx {
                window: WindowCtx::new(fields.window),
                render: renderer.render_ctx(fields.gpu),
            };
            build(&mut setup)
        })?;

        // Uploads made while building go out before the first frame is recorded.
        entry.with_gpu(|gpu| gpu.flush());

        Ok(Session {
            app,
            renderer,
            entry,
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            requests: InputRequests::default(),
            limiter: FrameLimiter::new(config.frame_rate),
            gamepad: GamepadBackend::new(),
            shown: false,
        })
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let exit = ctx.exit_requested();
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::Exit => {}
                Command::SetTitle(title) => session.entry.with_window(|w| w.set_title(&title)),
                Command::SetClearColor(color) => session.renderer.set_clear_color(color),
            }
        }

        if exit {
            self.request_exit(event_loop);
        }
    }

    /// Runs one paced frame if the limiter gate is open.
    fn run_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if !session.limiter.begin(Instant::now()) {
            return;
        }

        for ev in session.gamepad.poll() {
            session.input_state.apply_event(&mut session.input_frame, ev);
        }

        let time = session.limiter.frame_time();
        let mut runtime_ctx = RuntimeCtx::default();

        let Session {
            entry,
            renderer,
            input_state,
            input_frame,
            requests,
            app,
            ..
        } = &mut *session;

        let outcome = entry.with_mut(|fields| {
            let mut frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    return match fields.gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                        _ => FrameOutcome::Skipped,
                    };
                }
            };

            let gpu: &Gpu<'_> = fields.gpu;
            let control = {
                let mut pass = renderer.begin_draw(gpu, &mut frame, time.frame_index);
                let mut ctx = FrameCtx {
                    window: WindowCtx::new(fields.window),
                    render: renderer.render_ctx(gpu),
                    input: Input::new(input_state, input_frame, requests),
                    time,
                    runtime: &mut runtime_ctx,
                };
                app.on_frame(&mut ctx, &mut pass)
            };

            fields.window.pre_present_notify();
            renderer.end_draw(gpu, frame);
            FrameOutcome::Presented(control)
        });

        if !outcome.consumes_frame() {
            // The gate stays open and pending transitions carry into the retry.
            if matches!(outcome, FrameOutcome::Fatal) {
                let err = anyhow::anyhow!("surface lost irrecoverably (out of memory)");
                self.fail(event_loop, err);
            }
            return;
        }

        session.limiter.finish_frame();

        let requests = session.requests.take();
        session.entry.with_window(|w| apply_cursor_request(w, &requests));
        if let Some((left, right)) = requests.vibration {
            session.gamepad.set_vibration(left, right);
        }

        // Per-frame transitions are consumed by exactly one frame.
        session.input_frame.clear();

        if let FrameOutcome::Presented(control) = outcome {
            if !session.shown {
                session.entry.with_window(|w| w.set_visible(true));
                session.shown = true;
            }
            if control == AppControl::Exit {
                runtime_ctx.exit();
            }
        }
        self.apply_commands(event_loop, runtime_ctx);
    }

    fn resize_session(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let size = session.entry.with_window(|w| w.inner_size());
        session.entry.with_gpu_mut(|gpu| gpu.resize(size));

        let viewport = session.entry.with_window(logical_viewport);
        if viewport.is_valid() {
            let Session { entry, renderer, .. } = session;
            entry.with_gpu(|gpu| renderer.resize(gpu.queue(), viewport));
        }
    }
}

impl<A, F> ApplicationHandler for AppState<A, F>
where
    A: App + 'static,
    F: FnOnce(&mut SetupCtx<'_>) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        let Some(build) = self.build.take() else {
            return;
        };

        match self.open_session(event_loop, build) {
            Ok(session) => self.session = Some(session),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(session) = self.session.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        session.limiter.settle(Instant::now());

        if !session.limiter.is_due() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(session.limiter.next_deadline()));
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        if session.shown {
            session.entry.with_window(|w| w.request_redraw());
        } else {
            // Hidden windows may never receive RedrawRequested.
            self.run_frame(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let Session {
            entry,
            input_state,
            input_frame,
            app,
            ..
        } = session;

        if let Some(ev) = entry.with_window(|w| translate_window_event(w, input_state, &event)) {
            input_state.apply_event(input_frame, ev);
        }

        if app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.session = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_session();
            }

            WindowEvent::RedrawRequested => self.run_frame(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.session = None;
    }
}

fn logical_viewport(window: &Window) -> Viewport {
    let logi: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    Viewport::new(logi.width as f32, logi.height as f32)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::{InputEvent, Key, KeyState, Modifiers};

    #[test]
    fn config_defaults() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.title, "easel");
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(cfg.clear_color, Color::BLACK);
        assert!(cfg.resizable);
    }

    #[test]
    fn config_builders_override_fields() {
        let cfg = RuntimeConfig::default()
            .with_title("demo")
            .with_size(800, 600)
            .with_frame_rate(30.0)
            .with_clear_color(Color::BLUE)
            .with_resizable(false);
        assert_eq!(cfg.title, "demo");
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.frame_rate, 30.0);
        assert_eq!(cfg.clear_color, Color::BLUE);
        assert!(!cfg.resizable);
    }

    #[test]
    fn only_presented_frames_are_consumed() {
        assert!(FrameOutcome::Presented(AppControl::Continue).consumes_frame());
        assert!(FrameOutcome::Presented(AppControl::Exit).consumes_frame());
        assert!(!FrameOutcome::Skipped.consumes_frame());
        assert!(!FrameOutcome::Fatal.consumes_frame());
    }

    #[test]
    fn skipped_frame_keeps_transitions_for_the_retry() {
        let t0 = Instant::now();
        let mut limiter = FrameLimiter::starting_at(60.0, t0);
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let space = InputEvent::Key {
            key: Key::Space,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        };
        state.apply_event(&mut frame, space);

        // A skipped frame leaves both the gate and the input frame untouched.
        assert!(limiter.begin(t0));
        let outcome = FrameOutcome::Skipped;
        if outcome.consumes_frame() {
            limiter.finish_frame();
            frame.clear();
        }

        assert!(limiter.begin(t0 + Duration::from_millis(1)));
        assert_eq!(limiter.frame_index(), 0);
        assert!(frame.keys_pressed.contains(&Key::Space));
    }

    #[test]
    fn runtime_ctx_buffers_commands_in_order() {
        let mut ctx = RuntimeCtx::default();
        ctx.set_title("a");
        ctx.set_clear_color(Color::RED);
        assert!(!ctx.exit_requested());
        ctx.exit();
        assert!(ctx.exit_requested());
        assert_eq!(
            ctx.commands,
            vec![
                Command::SetTitle("a".to_string()),
                Command::SetClearColor(Color::RED),
                Command::Exit,
            ]
        );
    }
}
