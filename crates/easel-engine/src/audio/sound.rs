use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::mixer::{Mixer, PlayState, VoiceId};
use super::wav;
use super::SoundError;

/// Audio engine: an output stream fed by a [`Mixer`] plus a tag → sound table.
///
/// Each loaded sound has exactly one playback instance, looked up by tag.
pub struct Sound {
    mixer: Arc<Mutex<Mixer>>,
    output: Option<Output>,
    critical: Arc<AtomicBool>,
    critical_reported: bool,
    voices: HashMap<String, VoiceId>,
}

struct Output {
    _stream: cpal::Stream,
    channels: u16,
    sample_rate: u32,
}

impl Sound {
    /// Opens the default output device.
    ///
    /// Without a usable device the engine runs silent: sounds still load and
    /// instances still change state, nothing is heard.
    pub fn new() -> Self {
        let mixer = Arc::new(Mutex::new(Mixer::new()));
        let critical = Arc::new(AtomicBool::new(false));

        let output = match open_output(Arc::clone(&mixer), Arc::clone(&critical)) {
            Ok(output) => {
                log::info!(
                    "audio output: {} ch, {} Hz",
                    output.channels,
                    output.sample_rate
                );
                Some(output)
            }
            Err(err) => {
                log::warn!("audio disabled: {err}");
                None
            }
        };

        Self {
            mixer,
            output,
            critical,
            critical_reported: false,
            voices: HashMap::new(),
        }
    }

    /// Checks the output stream. Returns `false` once the stream has reported a
    /// critical error; playback has stopped in that case.
    pub fn update(&mut self) -> bool {
        if !self.critical.load(Ordering::Acquire) {
            return true;
        }
        if !self.critical_reported {
            log::error!("audio output failed; sound is no longer playing");
            self.critical_reported = true;
        }
        false
    }

    /// Whether no output device is open.
    #[inline]
    pub fn is_silent(&self) -> bool {
        self.output.is_none()
    }

    /// Loads a WAV file under `tag`.
    ///
    /// Returns `Ok(false)` without touching the file when `tag` is already taken.
    pub fn load_wave(&mut self, path: impl AsRef<Path>, tag: &str) -> Result<bool, SoundError> {
        if self.voices.contains_key(tag) {
            return Ok(false);
        }
        let data = wav::load_wav(path.as_ref())?;
        self.insert(tag, data);
        Ok(true)
    }

    /// Registers already decoded audio under `tag`. Same rules as [`load_wave`](Self::load_wave).
    ///
    /// Data that cannot be mixed (see [`SoundData::validate`](wav::SoundData::validate))
    /// is rejected.
    pub fn load_data(&mut self, data: wav::SoundData, tag: &str) -> Result<bool, SoundError> {
        if self.voices.contains_key(tag) {
            return Ok(false);
        }
        data.validate()?;
        self.insert(tag, data);
        Ok(true)
    }

    fn insert(&mut self, tag: &str, data: wav::SoundData) {
        let id = lock(&self.mixer).add_voice(Arc::new(data));
        self.voices.insert(tag.to_owned(), id);
    }

    /// Playback handle for `tag`, or `None` if nothing was loaded under it.
    pub fn get_audio(&self, tag: &str) -> Option<SoundInstance> {
        self.voices.get(tag).map(|&id| SoundInstance {
            mixer: Arc::clone(&self.mixer),
            id,
        })
    }
}

impl Default for Sound {
    fn default() -> Self {
        Self::new()
    }
}

/// Playback control for one loaded sound.
#[derive(Clone)]
pub struct SoundInstance {
    mixer: Arc<Mutex<Mixer>>,
    id: VoiceId,
}

impl SoundInstance {
    /// Plays once from the start (or resumes if paused).
    pub fn play(&self) {
        lock(&self.mixer).play(self.id, false);
    }

    /// Plays repeatedly from the start (or resumes if paused).
    pub fn play_looped(&self) {
        lock(&self.mixer).play(self.id, true);
    }

    pub fn stop(&self) {
        lock(&self.mixer).stop(self.id);
    }

    pub fn pause(&self) {
        lock(&self.mixer).pause(self.id);
    }

    pub fn resume(&self) {
        lock(&self.mixer).resume(self.id);
    }

    /// Linear gain in `[0, 1]`.
    pub fn set_volume(&self, volume: f32) {
        lock(&self.mixer).set_volume(self.id, volume);
    }

    pub fn volume(&self) -> f32 {
        lock(&self.mixer).volume(self.id)
    }

    pub fn state(&self) -> PlayState {
        lock(&self.mixer).state(self.id)
    }
}

// A panic while holding the lock leaves the mixer in a usable state.
fn lock(mixer: &Mutex<Mixer>) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}

fn open_output(mixer: Arc<Mutex<Mixer>>, critical: Arc<AtomicBool>) -> Result<Output, SoundError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(SoundError::NoDevice)?;
    let config = device
        .default_output_config()
        .map_err(|e| SoundError::Backend(e.to_string()))?;

    let channels = config.channels();
    let sample_rate = config.sample_rate();

    let data_callback = move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
        lock(&mixer).mix(out, channels, sample_rate);
    };
    let error_callback = move |err| {
        log::error!("audio stream error: {err}");
        critical.store(true, Ordering::Release);
    };

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device
            .build_output_stream(&config.into(), data_callback, error_callback, None)
            .map_err(|e| SoundError::Backend(e.to_string()))?,
        format => return Err(SoundError::UnsupportedFormat(format.to_string())),
    };

    stream
        .play()
        .map_err(|e| SoundError::Backend(e.to_string()))?;

    Ok(Output {
        _stream: stream,
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundData;

    // Builds an engine without opening a device.
    fn silent() -> Sound {
        Sound {
            mixer: Arc::new(Mutex::new(Mixer::new())),
            output: None,
            critical: Arc::new(AtomicBool::new(false)),
            critical_reported: false,
            voices: HashMap::new(),
        }
    }

    fn beep() -> SoundData {
        SoundData {
            samples: vec![0.5; 16],
            channels: 1,
            sample_rate: 8_000,
        }
    }

    #[test]
    fn duplicate_tag_is_not_reloaded() {
        let mut s = silent();
        assert!(s.load_data(beep(), "beep").unwrap());
        assert!(!s.load_data(beep(), "beep").unwrap());
        // The path is never opened for a taken tag.
        assert!(!s.load_wave("/no/such/file.wav", "beep").unwrap());
    }

    #[test]
    fn unmixable_data_is_rejected() {
        let mut s = silent();
        let no_channels = SoundData {
            channels: 0,
            ..beep()
        };
        assert!(matches!(
            s.load_data(no_channels, "a"),
            Err(SoundError::BadChannelCount(0))
        ));

        let no_rate = SoundData {
            sample_rate: 0,
            ..beep()
        };
        assert!(matches!(s.load_data(no_rate, "b"), Err(SoundError::BadSampleRate)));

        let ragged = SoundData {
            samples: vec![0.1; 5],
            channels: 2,
            sample_rate: 8_000,
        };
        assert!(matches!(
            s.load_data(ragged, "c"),
            Err(SoundError::PartialFrame { len: 5, channels: 2 })
        ));

        // Nothing was registered for the rejected tags.
        assert!(s.get_audio("a").is_none());
        assert!(s.get_audio("c").is_none());
    }

    #[test]
    fn unknown_tag_has_no_instance() {
        let s = silent();
        assert!(s.get_audio("missing").is_none());
    }

    #[test]
    fn instance_controls_playback() {
        let mut s = silent();
        s.load_data(beep(), "beep").unwrap();
        let inst = s.get_audio("beep").unwrap();

        assert_eq!(inst.state(), PlayState::Stopped);
        inst.play_looped();
        assert_eq!(inst.state(), PlayState::Playing);
        inst.pause();
        assert_eq!(inst.state(), PlayState::Paused);
        inst.resume();
        inst.set_volume(0.3);
        assert_eq!(inst.volume(), 0.3);
        inst.stop();
        assert_eq!(inst.state(), PlayState::Stopped);
    }

    #[test]
    fn update_reports_critical_error() {
        let mut s = silent();
        assert!(s.update());
        s.critical.store(true, Ordering::Release);
        assert!(!s.update());
        assert!(!s.update());
        assert!(s.critical_reported);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut s = silent();
        assert!(s.load_wave("/no/such/file.wav", "x").is_err());
        assert!(s.get_audio("x").is_none());
    }
}
