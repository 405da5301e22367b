use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::SoundError;

/// Decoded PCM audio: interleaved `f32` samples in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl SoundData {
    /// Number of sample frames (samples per channel).
    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// Checks that the data can be mixed: at least one channel, a non-zero rate and
    /// whole frames only.
    pub fn validate(&self) -> Result<(), SoundError> {
        if self.channels == 0 {
            return Err(SoundError::BadChannelCount(self.channels));
        }
        if self.sample_rate == 0 {
            return Err(SoundError::BadSampleRate);
        }
        if self.samples.len() % self.channels as usize != 0 {
            return Err(SoundError::PartialFrame {
                len: self.samples.len(),
                channels: self.channels,
            });
        }
        Ok(())
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate.max(1) as f64
    }
}

/// Decodes a WAV stream. Integer PCM is normalized by its bit depth.
pub fn decode_wav<R: Read>(reader: R) -> Result<SoundData, SoundError> {
    let mut reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(SoundError::BadChannelCount(spec.channels));
    }

    let samples: Result<Vec<f32>, _> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect(),
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / max_value))
                .collect()
        }
    };

    let data = SoundData {
        samples: samples?,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    };
    data.validate()?;
    Ok(data)
}

/// Opens and decodes a WAV file.
pub fn load_wav(path: &Path) -> Result<SoundData, SoundError> {
    let with_path = |source| SoundError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| with_path(hound::Error::IoError(e)))?;
    let data = decode_wav(BufReader::new(file)).map_err(|e| match e {
        SoundError::Wav(source) => with_path(source),
        other => other,
    })?;

    log::debug!(
        "decoded {}: {} ch, {} Hz, {:.2}s",
        path.display(),
        data.channels,
        data.sample_rate,
        data.duration_secs()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(
        spec: hound::WavSpec,
        write: impl FnOnce(&mut hound::WavWriter<&mut Cursor<Vec<u8>>>),
    ) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_16_bit_pcm() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [0i16, 16_384, -16_384, i16::MIN] {
                w.write_sample(s).unwrap();
            }
        });

        let data = decode_wav(Cursor::new(bytes)).unwrap();
        assert_eq!(data.channels, 1);
        assert_eq!(data.sample_rate, 22_050);
        assert_eq!(data.samples, vec![0.0, 0.5, -0.5, -1.0]);
    }

    #[test]
    fn decodes_float_stereo() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |w| {
            for s in [0.25f32, -0.25, 1.0, -1.0] {
                w.write_sample(s).unwrap();
            }
        });

        let data = decode_wav(Cursor::new(bytes)).unwrap();
        assert_eq!(data.frames(), 2);
        assert_eq!(data.samples, vec![0.25, -0.25, 1.0, -1.0]);
        assert!((data.duration_secs() - 2.0 / 48_000.0).abs() < 1e-12);
    }

    #[test]
    fn validate_accepts_whole_frames_only() {
        let ok = SoundData {
            samples: vec![0.0; 6],
            channels: 2,
            sample_rate: 44_100,
        };
        assert!(ok.validate().is_ok());

        let partial = SoundData {
            samples: vec![0.0; 7],
            ..ok.clone()
        };
        assert!(matches!(
            partial.validate(),
            Err(SoundError::PartialFrame { len: 7, channels: 2 })
        ));
        assert!(matches!(
            SoundData { channels: 0, ..ok.clone() }.validate(),
            Err(SoundError::BadChannelCount(0))
        ));
        assert!(matches!(
            SoundData { sample_rate: 0, ..ok }.validate(),
            Err(SoundError::BadSampleRate)
        ));
    }

    #[test]
    fn rejects_garbage() {
        let err = decode_wav(Cursor::new(b"not a wav file".to_vec())).unwrap_err();
        assert!(matches!(err, SoundError::Wav(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_wav(Path::new("/definitely/missing.wav")).unwrap_err();
        assert!(err.to_string().contains("missing.wav"));
    }
}
