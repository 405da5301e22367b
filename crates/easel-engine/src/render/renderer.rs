use crate::coords::Viewport;
use crate::device::{Gpu, GpuFrame};
use crate::paint::Color;
use crate::shapes::Vertex;

use super::{BindLayouts, Camera, DrawPass, RenderCtx};

/// Pipeline state shared by every draw: layouts, camera, sampler and the three
/// shape pipelines.
pub struct Renderer {
    layouts: BindLayouts,
    camera: Camera,
    sampler: wgpu::Sampler,

    flat: wgpu::RenderPipeline,
    textured: wgpu::RenderPipeline,
    line: wgpu::RenderPipeline,

    surface_format: wgpu::TextureFormat,
    clear_color: Color,
}

impl Renderer {
    pub fn new(gpu: &Gpu<'_>, viewport: Viewport, clear_color: Color) -> Self {
        let device = gpu.device();
        let surface_format = gpu.surface_format();

        let layouts = BindLayouts::new(device);
        let camera = Camera::new(device, &layouts.camera, viewport);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("easel linear repeat sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("easel shape shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shape.wgsl").into()),
        });

        let untextured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel flat pipeline layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.world],
            immediate_size: 0,
        });
        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("easel textured pipeline layout"),
            bind_group_layouts: &[&layouts.camera, &layouts.world, &layouts.texture],
            immediate_size: 0,
        });

        let flat = shape_pipeline(
            device,
            &ShapePipelineDesc {
                label: "easel flat pipeline",
                layout: &untextured_layout,
                shader: &shader,
                fs_entry: "fs_flat",
                format: surface_format,
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: wgpu::BlendState::REPLACE,
            },
        );
        let textured = shape_pipeline(
            device,
            &ShapePipelineDesc {
                label: "easel textured pipeline",
                layout: &textured_layout,
                shader: &shader,
                fs_entry: "fs_textured",
                format: surface_format,
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
            },
        );
        let line = shape_pipeline(
            device,
            &ShapePipelineDesc {
                label: "easel line pipeline",
                layout: &untextured_layout,
                shader: &shader,
                fs_entry: "fs_flat",
                format: surface_format,
                topology: wgpu::PrimitiveTopology::LineList,
                blend: wgpu::BlendState::REPLACE,
            },
        );

        log::debug!("shape pipelines created for {surface_format:?}");

        Self {
            layouts,
            camera,
            sampler,
            flat,
            textured,
            line,
            surface_format,
            clear_color,
        }
    }

    /// Updates the projection after the window changed size.
    pub fn resize(&mut self, queue: &wgpu::Queue, viewport: Viewport) {
        self.camera.set_viewport(queue, viewport);
    }

    /// Context for creating shapes, textures and fonts.
    pub fn render_ctx<'a>(&'a self, gpu: &'a Gpu<'_>) -> RenderCtx<'a> {
        RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            self.surface_format,
            self.camera.viewport(),
            &self.layouts,
            &self.sampler,
        )
    }

    /// Opens the frame's render pass: clears the back buffer, binds the camera and
    /// selects the flat pipeline.
    pub fn begin_draw<'a>(
        &'a self,
        gpu: &'a Gpu<'_>,
        frame: &'a mut GpuFrame,
        frame_index: u64,
    ) -> DrawPass<'a> {
        let GpuFrame { view, encoder, .. } = frame;
        let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("easel frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &*view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let mut pass = DrawPass::new(rpass, self, gpu.device(), gpu.queue(), frame_index);
        pass.set_flat_pipeline();
        pass
    }

    /// Submits the recorded frame and presents it. The `DrawPass` must be dropped first.
    pub fn end_draw(&self, gpu: &Gpu<'_>, frame: GpuFrame) {
        gpu.submit(frame);
    }

    #[inline]
    pub fn layouts(&self) -> &BindLayouts {
        &self.layouts
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.camera.viewport()
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub(crate) fn flat_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.flat
    }

    pub(crate) fn textured_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.textured
    }

    pub(crate) fn line_pipeline(&self) -> &wgpu::RenderPipeline {
        &self.line
    }
}

struct ShapePipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    fs_entry: &'a str,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
}

fn shape_pipeline(device: &wgpu::Device, desc: &ShapePipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),

        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
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
