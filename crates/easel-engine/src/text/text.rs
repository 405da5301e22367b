use std::collections::HashMap;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use wgpu::util::DeviceExt;

use crate::coords::Vec2;
use crate::paint::Color;
use crate::render::{DrawPass, RenderCtx};

use super::atlas::{ShelfPacker, ATLAS_SIZE};
use super::FontLoadError;

// ── cached glyph ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone)]
struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

// ── text ──────────────────────────────────────────────────────────────────

/// Bitmap text drawn from one font at one pixel size.
///
/// Glyphs are rasterized with fontdue on first use and cached in a 1024 × 1024
/// R8Unorm atlas for the lifetime of the `Text`. The cache key is fontdue's
/// `GlyphRasterConfig` (glyph index + pixel size), so changing the size with
/// [`set_size`](Text::set_size) adds new entries rather than invalidating old ones.
///
/// Several [`draw`](Text::draw) calls per frame are supported: each appends its
/// glyph instances after the previous call's.
pub struct Text {
    font: fontdue::Font,
    size_px: f32,
    layout: Layout<()>,

    // atlas
    packer: ShelfPacker,
    glyphs: HashMap<GlyphRasterConfig, CachedGlyph>,
    atlas: wgpu::Texture,
    atlas_full: bool,

    // pipeline + bindings
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,

    // geometry
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    instance_vbo: wgpu::Buffer,
    instance_capacity: usize,
    instance_cursor: usize,
    frame_index: Option<u64>,
}

impl Text {
    /// Parses a TrueType/OpenType font from memory.
    pub fn new(
        ctx: &RenderCtx<'_>,
        font_bytes: &[u8],
        size_px: f32,
    ) -> Result<Self, FontLoadError> {
        if !(size_px.is_finite() && size_px > 0.0) {
            return Err(FontLoadError::InvalidSize(size_px));
        }
        let font = fontdue::Font::from_bytes(font_bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError::Parse(e.to_string()))?;

        let atlas = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("easel glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let atlas_view = atlas.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("easel glyph sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        // The atlas uses the same texture + sampler layout as image textures.
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel glyph atlas bind group"),
            layout: &ctx.layouts.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline = create_pipeline(ctx);

        let quad_vbo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("easel text quad vbo"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let quad_ibo = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("easel text quad ibo"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        let instance_capacity = 256;
        let instance_vbo = create_instance_buffer(ctx.device, instance_capacity);

        log::debug!("font loaded at {size_px}px");

        Ok(Self {
            font,
            size_px,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            packer: ShelfPacker::default(),
            glyphs: HashMap::new(),
            atlas,
            atlas_full: false,
            pipeline,
            bind_group,
            quad_vbo,
            quad_ibo,
            instance_vbo,
            instance_capacity,
            instance_cursor: 0,
            frame_index: None,
        })
    }

    /// Reads and parses a font file.
    pub fn from_file(
        ctx: &RenderCtx<'_>,
        path: impl AsRef<Path>,
        size_px: f32,
    ) -> Result<Self, FontLoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(ctx, &bytes, size_px)
    }

    /// Draws `text` with its top-left corner at `pos`.
    pub fn draw(&mut self, pass: &mut DrawPass<'_>, text: &str, pos: Vec2, color: Color) {
        self.layout.reset(&LayoutSettings {
            x: pos.x,
            y: pos.y,
            ..LayoutSettings::default()
        });
        self.layout
            .append(&[&self.font], &TextStyle::new(text, self.size_px, 0));

        // Snapshot positions so the borrow on `self.layout` ends before the atlas
        // (which needs `&mut self`) is touched.
        let placed: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        let color = color.to_array();
        let mut instances = Vec::with_capacity(placed.len());
        for (key, x, y, w, h) in placed {
            let Some(cached) = self.glyph(pass.queue(), key) else {
                continue;
            };
            instances.push(GlyphInstance {
                dst_min: [x, y],
                dst_max: [x + w as f32, y + h as f32],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }

        if instances.is_empty() {
            return;
        }

        if self.frame_index != Some(pass.frame_index()) {
            self.frame_index = Some(pass.frame_index());
            self.instance_cursor = 0;
        }
        self.ensure_instance_capacity(pass.device(), self.instance_cursor + instances.len());

        let stride = std::mem::size_of::<GlyphInstance>();
        pass.queue().write_buffer(
            &self.instance_vbo,
            (self.instance_cursor * stride) as u64,
            bytemuck::cast_slice(&instances),
        );

        let first = self.instance_cursor as u32;
        let last = first + instances.len() as u32;
        self.instance_cursor += instances.len();

        pass.set_external_pipeline(&self.pipeline);
        let rpass = pass.raw();
        rpass.set_bind_group(1, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, first..last);
        pass.count_draw();
    }

    /// Size of `text` laid out on one line at the current pixel size.
    ///
    /// Width is the pen position after the last glyph, not its bitmap edge.
    #[must_use]
    pub fn measure(&self, text: &str) -> Vec2 {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.size_px, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return Vec2::new(0.0, layout.height());
        }

        let w = glyphs
            .iter()
            .map(|g| {
                let m = self.font.metrics_indexed(g.key.glyph_index, self.size_px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        Vec2::new(w, layout.height())
    }

    /// Changes the pixel size used by later draws.
    pub fn set_size(&mut self, size_px: f32) {
        if size_px.is_finite() && size_px > 0.0 {
            self.size_px = size_px;
        } else {
            log::warn!("ignoring invalid text size {size_px}");
        }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size_px
    }

    /// Returns the atlas entry for `key`, rasterizing and uploading it on first use.
    fn glyph(&mut self, queue: &wgpu::Queue, key: GlyphRasterConfig) -> Option<CachedGlyph> {
        if let Some(cached) = self.glyphs.get(&key) {
            return Some(*cached);
        }

        let (metrics, bitmap) = self.font.rasterize_config(key);
        if metrics.width == 0 || metrics.height == 0 {
            return None;
        }
        let (w, h) = (metrics.width as u32, metrics.height as u32);

        let Some((gx, gy)) = self.packer.place(w, h) else {
            if !self.atlas_full {
                log::warn!("glyph atlas is full; new glyphs will not be drawn");
                self.atlas_full = true;
            }
            return None;
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
        );

        let size = self.packer.size() as f32;
        let cached = CachedGlyph {
            uv_min: [gx as f32 / size, gy as f32 / size],
            uv_max: [(gx + w) as f32 / size, (gy + h) as f32 / size],
        };
        self.glyphs.insert(key, cached);
        Some(cached)
    }

    fn ensure_instance_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.instance_capacity {
            return;
        }

        // Earlier draws this frame keep referencing the old buffer, so the new one
        // starts empty and the cursor restarts at zero.
        let needed = required - self.instance_cursor;
        let new_cap = needed.next_power_of_two().max(self.instance_capacity * 2);
        self.instance_vbo = create_instance_buffer(device, new_cap);
        self.instance_capacity = new_cap;
        self.instance_cursor = 0;
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("easel text instance vbo"),
        size: (capacity * std::mem::size_of::<GlyphInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(ctx: &RenderCtx<'_>) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("easel text shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../render/shaders/text.wgsl").into()),
    });

    let pipeline_layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel text pipeline layout"),
            bind_group_layouts: &[&ctx.layouts.camera, &ctx.layouts.texture],
            immediate_size: 0,
        });

    ctx.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("easel text pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), GlyphInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // dst_min
        2 => Float32x2, // dst_max
        3 => Float32x2, // uv_min
        4 => Float32x2, // uv_max
        5 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
