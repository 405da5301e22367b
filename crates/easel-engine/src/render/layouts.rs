use super::MatrixUniform;

/// Bind-group layouts shared by every pipeline.
///
/// | group | contents                     | stage    |
/// |-------|------------------------------|----------|
/// | 0     | camera projection            | vertex   |
/// | 1     | per-shape world transform    | vertex   |
/// | 2     | texture + sampler            | fragment |
pub struct BindLayouts {
    pub camera: wgpu::BindGroupLayout,
    pub world: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl BindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            camera: matrix_layout(device, "easel camera bgl"),
            world: matrix_layout(device, "easel world bgl"),
            texture: texture_layout(device, "easel texture bgl"),
        }
    }
}

fn matrix_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: MatrixUniform::min_binding_size(),
            },
            count: None,
        }],
    })
}

/// Texture at binding 0, filtering sampler at binding 1. Also used for the glyph atlas.
pub(crate) fn texture_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}
