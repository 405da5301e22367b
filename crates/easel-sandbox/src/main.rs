//! Sandbox exercising every engine subsystem.
//!
//! Usage: `easel-sandbox [font.ttf] [sound.wav]`
//!
//! - arrows / left stick: move the triangle
//! - space: next sprite cell
//! - C: toggle cursor visibility
//! - left click: play the sound (a generated beep without a WAV file)
//! - gamepad A: rumble while held
//! - escape: quit

use std::f32::consts::TAU;

use anyhow::Result;
use glam::Vec3;
use image::{Rgba, RgbaImage};

use easel_engine::audio::{Sound, SoundData};
use easel_engine::coords::Vec2;
use easel_engine::input::{Key, MouseButton, PadButton};
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::paint::Color;
use easel_engine::shapes::{Line, Shape};
use easel_engine::text::Text;
use easel_engine::texture::Texture;
use easel_engine::{App, AppControl, DrawPass, FrameCtx, Runtime, RuntimeConfig, SetupCtx};

const SPEED: f32 = 240.0; // px/s
const SPRITE_COLUMNS: u32 = 4;
const SPRITE_ROWS: u32 = 2;
const SPRITE_CELL: u32 = 32;

struct Sandbox {
    triangle: Shape,
    quad: Shape,
    circle: Shape,
    lines: Vec<Line>,
    sprite: Texture,
    text: Option<Text>,
    sound: Sound,

    elapsed: f32,
    cell: u32,
    cursor_visible: bool,
}

impl Sandbox {
    fn new(setup: &mut SetupCtx<'_>, font: Option<&str>, wav: Option<&str>) -> Result<Self> {
        let ctx = &setup.render;

        let triangle = Shape::new_triangle(ctx, 200.0, 200.0, 120.0, Color::GREEN);
        let quad = Shape::new_box(ctx, 640.0, 360.0, 760.0, 440.0, Color::BLUE);
        let circle = Shape::new_circle(ctx, 1000.0, 200.0, 80.0, Color::from_u8(255, 200, 0, 255));

        let lines = (0..8)
            .map(|i| {
                let x = 100.0 + i as f32 * 40.0;
                if i % 2 == 0 {
                    Line::with_default_color(ctx, x, 560.0, x + 30.0, 680.0)
                } else {
                    Line::new(ctx, x, 560.0, x + 30.0, 680.0, Color::WHITE)
                }
            })
            .collect();

        let sprite = Texture::from_image(
            ctx,
            &sprite_sheet(),
            1000.0,
            560.0,
            SPRITE_COLUMNS,
            SPRITE_ROWS,
        )?;

        let text = match font {
            Some(path) => Some(Text::from_file(ctx, path, 24.0)?),
            None => {
                log::info!("no font given; text disabled");
                None
            }
        };

        let mut sound = Sound::new();
        match wav {
            Some(path) => {
                sound.load_wave(path, "click")?;
            }
            None => {
                sound.load_data(beep(440.0, 0.15), "click")?;
            }
        }

        Ok(Self {
            triangle,
            quad,
            circle,
            lines,
            sprite,
            text,
            sound,
            elapsed: 0.0,
            cell: 0,
            cursor_visible: true,
        })
    }
}

impl App for Sandbox {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>, pass: &mut DrawPass<'_>) -> AppControl {
        let input = &mut ctx.input;
        if input.pressed_key(Key::Escape) {
            return AppControl::Exit;
        }

        let dt = ctx.time.dt;
        self.elapsed += dt;

        // ── movement ──────────────────────────────────────────────────────
        let mut dir = Vec3::ZERO;
        if input.key_down(Key::ArrowLeft) {
            dir.x -= 1.0;
        }
        if input.key_down(Key::ArrowRight) {
            dir.x += 1.0;
        }
        if input.key_down(Key::ArrowUp) {
            dir.y -= 1.0;
        }
        if input.key_down(Key::ArrowDown) {
            dir.y += 1.0;
        }
        // Sticks are +Y up; screen space is +Y down.
        dir.x += input.left_stick_x();
        dir.y -= input.left_stick_y();

        let pos = self.triangle.position() + dir * SPEED * dt;
        self.triangle.set_position(pos);

        self.quad.set_rotation(Vec3::new(0.0, 0.0, (self.elapsed * 0.5) % TAU));
        let pulse = 1.0 + 0.2 * (self.elapsed * 3.0).sin();
        self.circle.set_scale(Vec3::new(pulse, pulse, 1.0));

        // ── sprite / cursor / sound / rumble ──────────────────────────────
        if input.pressed_key(Key::Space) {
            self.cell = (self.cell + 1) % (SPRITE_COLUMNS * SPRITE_ROWS);
            self.sprite
                .set_image_array(self.cell % SPRITE_COLUMNS, self.cell / SPRITE_COLUMNS);
        }

        if input.pressed_key(Key::C) {
            self.cursor_visible = !self.cursor_visible;
            input.set_visible_cursor(self.cursor_visible);
        }

        if input.pressed_mouse(MouseButton::Left) {
            if let Some(click) = self.sound.get_audio("click") {
                click.stop();
                click.play();
            }
        }

        if input.pressed_button(PadButton::A) {
            input.set_vibration(1.0, 0.5);
        } else if input.released_button(PadButton::A) {
            input.set_vibration(0.0, 0.0);
        }

        if !self.sound.update() {
            log::warn!("audio device lost");
        }

        // ── draw ──────────────────────────────────────────────────────────
        pass.draw(&self.quad);
        pass.draw(&self.circle);
        pass.draw(&self.triangle);
        for line in &self.lines {
            pass.draw(line);
        }
        pass.draw(&self.sprite);

        if let Some(text) = self.text.as_mut() {
            let status = format!(
                "{:.0} fps  cursor ({}, {})  pad {}",
                ctx.time.fps,
                input.cursor_x(),
                input.cursor_y(),
                if input.gamepad_connected() { "on" } else { "off" },
            );
            text.draw(pass, &status, Vec2::new(16.0, 16.0), Color::WHITE);
        }

        AppControl::Continue
    }
}

/// One row of solid cells per sprite-sheet row, each cell a different hue with a
/// one-pixel dark border.
fn sprite_sheet() -> RgbaImage {
    let (w, h) = (SPRITE_COLUMNS * SPRITE_CELL, SPRITE_ROWS * SPRITE_CELL);
    RgbaImage::from_fn(w, h, |x, y| {
        let (cx, cy) = (x % SPRITE_CELL, y % SPRITE_CELL);
        if cx == 0 || cy == 0 || cx == SPRITE_CELL - 1 || cy == SPRITE_CELL - 1 {
            return Rgba([20, 20, 20, 255]);
        }
        let index = (y / SPRITE_CELL) * SPRITE_COLUMNS + x / SPRITE_CELL;
        let hue = index as f32 / (SPRITE_COLUMNS * SPRITE_ROWS) as f32;
        let r = (hue * TAU).cos() * 0.5 + 0.5;
        let g = ((hue + 1.0 / 3.0) * TAU).cos() * 0.5 + 0.5;
        let b = ((hue + 2.0 / 3.0) * TAU).cos() * 0.5 + 0.5;
        Rgba([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, 255])
    })
}

fn beep(freq: f32, secs: f32) -> SoundData {
    let sample_rate = 44_100;
    let frames = (sample_rate as f32 * secs) as usize;
    let samples = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let envelope = 1.0 - i as f32 / frames as f32;
            (t * freq * TAU).sin() * 0.3 * envelope
        })
        .collect();

    SoundData {
        samples,
        channels: 1,
        sample_rate,
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let font = args.first().cloned();
    let wav = args.get(1).cloned();

    let config = RuntimeConfig::default()
        .with_title("easel sandbox")
        .with_clear_color(Color::rgb(0.1, 0.1, 0.15));

    Runtime::run(config, |setup| Sandbox::new(setup, font.as_deref(), wav.as_deref()))
}
