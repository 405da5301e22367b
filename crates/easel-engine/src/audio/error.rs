use std::path::PathBuf;

/// Failure inside the audio subsystem.
#[derive(Debug, thiserror::Error)]
pub enum SoundError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("WAV stream is malformed: {0}")]
    Wav(#[from] hound::Error),

    #[error("sound has {0} channels")]
    BadChannelCount(u16),

    #[error("sound has a sample rate of 0 Hz")]
    BadSampleRate,

    #[error("{len} samples do not split into {channels}-channel frames")]
    PartialFrame { len: usize, channels: u16 },

    #[error("no default audio output device")]
    NoDevice,

    #[error("unsupported output sample format {0}")]
    UnsupportedFormat(String),

    #[error("audio backend error: {0}")]
    Backend(String),
}
