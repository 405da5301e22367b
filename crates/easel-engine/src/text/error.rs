use std::path::PathBuf;

/// Failure to load a font for [`Text`](super::Text).
#[derive(Debug, thiserror::Error)]
pub enum FontLoadError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font: {0}")]
    Parse(String),

    #[error("invalid font size {0}")]
    InvalidSize(f32),
}
