use std::path::PathBuf;

/// Failure to build a [`Texture`](super::Texture).
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has zero size")]
    EmptyImage,

    #[error("sprite sheet split must be at least 1x1 (got {split_x}x{split_y})")]
    ZeroSplit { split_x: u32, split_y: u32 },

    #[error("image {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}
