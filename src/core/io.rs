use crate::signal_processing::{resample, to_mono};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Enumerates error conditions for WAV-based audio loading.
///
/// Decoding is the only I/O the detector performs itself; everything past
/// this point works on in-memory samples.
#[derive(Error, Debug)]
pub enum AudioError {
    /// WAV open or decode failure, typically an invalid path or corrupted header.
    #[error("WAV decode failed: {0}")]
    Wav(#[from] hound::Error),

    /// Unsupported WAV sample layout.
    #[error("Unsupported WAV format: {0}")]
    UnsupportedFormat(String),

    /// Offset or duration exceeds sample bounds.
    #[error("Offset or duration out of bounds")]
    InvalidRange,

    /// Filesystem failure outside `hound`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resampling failure from `signal_processing::resampling`.
    #[error("Resampling error: {0}")]
    Resample(#[from] crate::signal_processing::resampling::ResampleError),

    /// The decoded signal holds no samples.
    #[error("Audio contains no samples")]
    Empty,
}

/// Decoded audio: interleaved `f32` samples plus format.
///
/// # Fields
/// - `samples`: Interleaved `f32` sample buffer, nominally in `[-1, 1]`.
/// - `sample_rate`: Samples per second (Hz).
/// - `channels`: Number of interleaved channels.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioData {
    /// Wraps interleaved samples with their format.
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self { samples, sample_rate, channels }
    }

    /// Length in seconds.
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }

    /// Copy of the signal averaged down to one channel.
    pub fn to_mono(&self) -> AudioData {
        if self.channels <= 1 {
            return self.clone();
        }
        AudioData::new(to_mono(&self.samples, self.channels as usize), self.sample_rate, 1)
    }
}

/// Loads a WAV file into `AudioData`.
///
/// Supports integer PCM of any bit depth up to 32 and 32-bit float.
///
/// # Parameters
/// - `path`: WAV file path.
/// - `sr`: Target sample rate (Hz); `None` retains the source rate.
/// - `mono`: Down-mix to one channel; `None` defaults to `true`.
/// - `offset`: Start time (seconds); `None` defaults to 0.0.
/// - `duration`: Segment length (seconds); `None` takes the full length.
///
/// # Returns
/// - `Ok(AudioData)`: Decoded (and optionally resampled) audio.
/// - `Err(AudioError)`: I/O, format or range failure.
pub fn load<P: AsRef<Path>>(
    path: P,
    sr: Option<u32>,
    mono: Option<bool>,
    offset: Option<f32>,
    duration: Option<f32>,
) -> Result<AudioData, AudioError> {
    let wav_data = std::fs::read(&path)?;
    let mut reader = WavReader::new(Cursor::new(wav_data))?;
    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    if offset.is_some_and(|o| o < 0.0 || !o.is_finite())
        || duration.is_some_and(|d| d < 0.0 || !d.is_finite())
    {
        return Err(AudioError::InvalidRange);
    }

    // Offsets count frames, so scale by the channel count for interleaved data.
    let start = (offset.unwrap_or(0.0) * sample_rate as f32) as usize * channels;
    let len = duration.map(|d| (d * sample_rate as f32) as usize * channels);
    let total = reader.len() as usize;
    if start > 0 && start >= total {
        return Err(AudioError::InvalidRange);
    }

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .skip(start)
            .take(len.unwrap_or(usize::MAX))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .skip(start)
                .take(len.unwrap_or(usize::MAX))
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat(format!("{:?} at {} bits", format, bits)));
        }
    };

    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    let down_mix = mono.unwrap_or(true);
    let samples = if channels > 1 && down_mix { to_mono(&samples, channels) } else { samples };
    let out_channels = if down_mix { 1 } else { spec.channels };

    let final_samples = match sr {
        Some(target) if target != sample_rate => {
            if out_channels != 1 {
                return Err(AudioError::UnsupportedFormat(
                    "resampling requires mono audio".to_string(),
                ));
            }
            resample(&samples, sample_rate, target)?
        }
        _ => samples,
    };

    debug!(
        path = %path.as_ref().display(),
        source_rate = sample_rate,
        rate = sr.unwrap_or(sample_rate),
        samples = final_samples.len(),
        "loaded wav"
    );
    Ok(AudioData::new(final_samples, sr.unwrap_or(sample_rate), out_channels))
}

/// Writes `AudioData` as a 32-bit float WAV file.
pub fn export<P: AsRef<Path>>(path: P, audio_data: &AudioData) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: audio_data.channels,
        sample_rate: audio_data.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in &audio_data.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
