use std::sync::Arc;

use super::SoundData;

/// Playback state of a voice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
}

/// Handle to a voice inside a [`Mixer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VoiceId(usize);

#[derive(Debug)]
struct Voice {
    data: Arc<SoundData>,
    /// Read position in source frames.
    position: f64,
    looped: bool,
    volume: f32,
    state: PlayState,
}

/// Device-independent software mixer.
///
/// Each voice plays one sound; voices are summed into an interleaved output buffer
/// at the output's channel count and sample rate. Channel counts are adapted
/// (mono is spread, multichannel is folded to mono by averaging) and sample rates
/// are converted by linear interpolation.
#[derive(Debug, Default)]
pub struct Mixer {
    voices: Vec<Voice>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stopped voice for `data`.
    ///
    /// Data that fails [`SoundData::validate`] never produces output; its voice stops
    /// on the first mix.
    pub fn add_voice(&mut self, data: Arc<SoundData>) -> VoiceId {
        self.voices.push(Voice {
            data,
            position: 0.0,
            looped: false,
            volume: 1.0,
            state: PlayState::Stopped,
        });
        VoiceId(self.voices.len() - 1)
    }

    /// Starts from the beginning, or resumes if paused.
    pub fn play(&mut self, id: VoiceId, looped: bool) {
        if let Some(v) = self.voices.get_mut(id.0) {
            if v.state != PlayState::Paused {
                v.position = 0.0;
            }
            v.looped = looped;
            v.state = PlayState::Playing;
        }
    }

    /// Stops and rewinds.
    pub fn stop(&mut self, id: VoiceId) {
        if let Some(v) = self.voices.get_mut(id.0) {
            v.state = PlayState::Stopped;
            v.position = 0.0;
        }
    }

    pub fn pause(&mut self, id: VoiceId) {
        if let Some(v) = self.voices.get_mut(id.0) {
            if v.state == PlayState::Playing {
                v.state = PlayState::Paused;
            }
        }
    }

    pub fn resume(&mut self, id: VoiceId) {
        if let Some(v) = self.voices.get_mut(id.0) {
            if v.state == PlayState::Paused {
                v.state = PlayState::Playing;
            }
        }
    }

    /// Linear gain, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, id: VoiceId, volume: f32) {
        if let Some(v) = self.voices.get_mut(id.0) {
            v.volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 };
        }
    }

    pub fn state(&self, id: VoiceId) -> PlayState {
        self.voices
            .get(id.0)
            .map_or(PlayState::Stopped, |v| v.state)
    }

    pub fn volume(&self, id: VoiceId) -> f32 {
        self.voices.get(id.0).map_or(0.0, |v| v.volume)
    }

    /// Mixes every playing voice into `out` (interleaved, `channels` wide).
    pub fn mix(&mut self, out: &mut [f32], channels: u16, sample_rate: u32) {
        out.fill(0.0);
        if channels == 0 || sample_rate == 0 {
            return;
        }
        let channels = channels as usize;

        for voice in &mut self.voices {
            if voice.state == PlayState::Playing {
                mix_voice(voice, out, channels, sample_rate);
            }
        }

        for s in out.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
    }
}

fn mix_voice(voice: &mut Voice, out: &mut [f32], channels: usize, sample_rate: u32) {
    let data = &voice.data;
    let frames = data.frames();
    if frames == 0 || data.validate().is_err() {
        voice.state = PlayState::Stopped;
        return;
    }
    let step = data.sample_rate as f64 / sample_rate as f64;

    for frame in out.chunks_exact_mut(channels) {
        let i = voice.position as usize;
        let frac = (voice.position - i as f64) as f32;
        let next = if i + 1 < frames {
            i + 1
        } else if voice.looped {
            0
        } else {
            i
        };

        for (c, sample) in frame.iter_mut().enumerate() {
            let a = source_sample(data, i, c, channels);
            let b = source_sample(data, next, c, channels);
            *sample += (a + (b - a) * frac) * voice.volume;
        }

        voice.position += step;
        if voice.position >= frames as f64 {
            if voice.looped {
                voice.position %= frames as f64;
            } else {
                voice.position = 0.0;
                voice.state = PlayState::Stopped;
                return;
            }
        }
    }
}

/// Sample of source frame `frame` as heard on output channel `out_c`.
fn source_sample(data: &SoundData, frame: usize, out_c: usize, out_channels: usize) -> f32 {
    let src_channels = data.channels as usize;
    let base = frame * src_channels;
    let frame_samples = &data.samples[base..base + src_channels];

    if src_channels == 1 {
        frame_samples[0]
    } else if out_channels == 1 {
        frame_samples.iter().sum::<f32>() / src_channels as f32
    } else {
        frame_samples[out_c % src_channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sound(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Arc<SoundData> {
        Arc::new(SoundData {
            samples,
            channels,
            sample_rate,
        })
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn stopped_voices_are_silent() {
        let mut m = Mixer::new();
        m.add_voice(sound(vec![0.5; 8], 1, 100));
        let mut out = vec![1.0; 4];
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![0.0; 4]);
    }

    #[test]
    fn one_shot_stops_at_end() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.1, 0.2, 0.3], 1, 100));
        m.play(id, false);

        let mut out = vec![0.0; 5];
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.0, 0.0]);
        assert_eq!(m.state(id), PlayState::Stopped);
    }

    #[test]
    fn looped_voice_wraps() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.1, 0.2], 1, 100));
        m.play(id, true);

        let mut out = vec![0.0; 5];
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
        assert_eq!(m.state(id), PlayState::Playing);
    }

    #[test]
    fn pause_holds_position_and_resume_continues() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.1, 0.2, 0.3, 0.4], 1, 100));
        m.play(id, false);

        let mut out = vec![0.0; 2];
        m.mix(&mut out, 1, 100);
        m.pause(id);
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![0.0, 0.0]);

        m.resume(id);
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![0.3, 0.4]);
    }

    #[test]
    fn stop_rewinds() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.1, 0.2, 0.3], 1, 100));
        m.play(id, false);
        let mut out = vec![0.0; 2];
        m.mix(&mut out, 1, 100);
        m.stop(id);
        m.play(id, false);
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![0.1, 0.2]);
    }

    // ── mixing ────────────────────────────────────────────────────────────

    #[test]
    fn volume_scales_and_output_is_clamped() {
        let mut m = Mixer::new();
        let a = m.add_voice(sound(vec![0.8; 2], 1, 100));
        let b = m.add_voice(sound(vec![0.8; 2], 1, 100));
        m.play(a, false);
        m.play(b, false);
        m.set_volume(b, 0.5);

        let mut out = vec![0.0; 2];
        m.mix(&mut out, 1, 100);
        assert_eq!(out, vec![1.0, 1.0]);

        m.set_volume(a, 0.25);
        m.play(a, false);
        m.play(b, false);
        m.mix(&mut out, 1, 100);
        assert!((out[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn mono_spreads_to_stereo() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.25, 0.5], 1, 100));
        m.play(id, false);
        let mut out = vec![0.0; 4];
        m.mix(&mut out, 2, 100);
        assert_eq!(out, vec![0.25, 0.25, 0.5, 0.5]);
    }

    #[test]
    fn stereo_folds_to_mono() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.2, 0.4], 2, 100));
        m.play(id, false);
        let mut out = vec![0.0; 1];
        m.mix(&mut out, 1, 100);
        assert!((out[0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn unmixable_voice_stops_silently() {
        let mut m = Mixer::new();
        let no_channels = m.add_voice(sound(vec![0.5; 4], 0, 100));
        let no_rate = m.add_voice(sound(vec![0.5; 4], 1, 0));
        m.play(no_channels, false);
        m.play(no_rate, true);

        let mut out = vec![0.0; 4];
        m.mix(&mut out, 2, 100);
        assert_eq!(out, vec![0.0; 4]);

        let mut mono = vec![0.0; 2];
        m.mix(&mut mono, 1, 100);
        assert_eq!(mono, vec![0.0; 2]);

        assert_eq!(m.state(no_channels), PlayState::Stopped);
        assert_eq!(m.state(no_rate), PlayState::Stopped);
    }

    #[test]
    fn upsampling_interpolates() {
        let mut m = Mixer::new();
        let id = m.add_voice(sound(vec![0.0, 1.0], 1, 50));
        m.play(id, false);
        let mut out = vec![0.0; 3];
        m.mix(&mut out, 1, 100);
        // Positions 0.0, 0.5, 1.0; the last frame has no successor and holds.
        assert_eq!(out, vec![0.0, 0.5, 1.0]);
    }
}
