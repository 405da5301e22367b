//! Sound playback: WAV decoding, software mixing and a cpal output stream.

mod error;
mod mixer;
mod sound;
mod wav;

pub use error::SoundError;
pub use mixer::{Mixer, PlayState, VoiceId};
pub use sound::{Sound, SoundInstance};
pub use wav::{decode_wav, load_wav, SoundData};
