use std::path::Path;

use image::RgbaImage;

use crate::paint::Color;
use crate::render::{DrawPass, Drawable, RenderCtx};
use crate::shapes::Shape;

use super::{SpriteGrid, SpriteSheet, TextureError};

/// GPU texture drawn through a shape, optionally sliced into a sprite sheet.
///
/// The shape's UVs at construction are the base for [`set_image_array`]; cell
/// `(0, 0)` is selected initially.
///
/// [`set_image_array`]: Texture::set_image_array
pub struct Texture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,

    shape: Shape,
    sheet: SpriteSheet,

    size: (u32, u32),
}

impl Texture {
    /// Loads an image file and draws it on a box the size of one sprite cell,
    /// centred on `(x, y)`.
    pub fn from_path(
        ctx: &RenderCtx<'_>,
        path: impl AsRef<Path>,
        x: f32,
        y: f32,
        split_x: u32,
        split_y: u32,
    ) -> Result<Self, TextureError> {
        let image = load_rgba(path.as_ref())?;
        Self::from_image(ctx, &image, x, y, split_x, split_y)
    }

    /// Same as [`from_path`](Self::from_path) for an already decoded image.
    pub fn from_image(
        ctx: &RenderCtx<'_>,
        image: &RgbaImage,
        x: f32,
        y: f32,
        split_x: u32,
        split_y: u32,
    ) -> Result<Self, TextureError> {
        let grid = grid_for(split_x, split_y)?;
        let [cw, ch] = grid.cell_size(image.width(), image.height());
        let shape = Shape::new_box(ctx, x, y, x + cw, y + ch, Color::WHITE);
        Self::build(ctx, image, grid, shape)
    }

    /// Draws the texture on `shape` instead of the default box.
    ///
    /// The split applies to `shape`'s own UVs; cell `(0, 0)` is selected.
    pub fn with_shape(
        ctx: &RenderCtx<'_>,
        image: &RgbaImage,
        split_x: u32,
        split_y: u32,
        shape: Shape,
    ) -> Result<Self, TextureError> {
        let grid = grid_for(split_x, split_y)?;
        Self::build(ctx, image, grid, shape)
    }

    /// Loads an image file and draws it on `shape`.
    pub fn from_path_with_shape(
        ctx: &RenderCtx<'_>,
        path: impl AsRef<Path>,
        split_x: u32,
        split_y: u32,
        shape: Shape,
    ) -> Result<Self, TextureError> {
        let image = load_rgba(path.as_ref())?;
        Self::with_shape(ctx, &image, split_x, split_y, shape)
    }

    fn build(
        ctx: &RenderCtx<'_>,
        image: &RgbaImage,
        grid: SpriteGrid,
        mut shape: Shape,
    ) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage);
        }
        let max = ctx.device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(TextureError::TooLarge { width, height, max });
        }

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("easel texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel texture bind group"),
            layout: &ctx.layouts.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(ctx.sampler()),
                },
            ],
        });

        log::debug!(
            "texture uploaded: {width}x{height}, {}x{} cells",
            grid.columns,
            grid.rows
        );

        let mut sheet = SpriteSheet::new(grid, shape.uv());
        shape.set_uv(&sheet.select(0, 0));

        Ok(Self {
            _texture: texture,
            bind_group,
            shape,
            sheet,
            size: (width, height),
        })
    }

    /// Shows sprite cell `(ix, iy)` (column, row).
    pub fn set_image_array(&mut self, ix: u32, iy: u32) {
        let uv = self.sheet.select(ix, iy);
        self.shape.set_uv(&uv);
    }

    /// Currently selected sprite cell.
    #[inline]
    pub fn image_index(&self) -> (u32, u32) {
        self.sheet.cell()
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Image size in texels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Sprite-sheet split as `(columns, rows)`.
    #[inline]
    pub fn split(&self) -> (u32, u32) {
        let grid = self.sheet.grid();
        (grid.columns, grid.rows)
    }
}

impl Drawable for Texture {
    fn draw(&self, pass: &mut DrawPass<'_>) {
        pass.set_texture_pipeline();
        pass.raw().set_bind_group(2, &self.bind_group, &[]);
        self.shape.record(pass);
    }
}

fn grid_for(split_x: u32, split_y: u32) -> Result<SpriteGrid, TextureError> {
    SpriteGrid::new(split_x, split_y).ok_or(TextureError::ZeroSplit { split_x, split_y })
}

fn load_rgba(path: &Path) -> Result<RgbaImage, TextureError> {
    let image = image::open(path).map_err(|source| TextureError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("decoded {}", path.display());
    Ok(image.to_rgba8())
}
