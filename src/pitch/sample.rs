use crate::core::AudioData;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One frame of a pitch track.
///
/// Unvoiced frames stay in the track with `voiced == false` (their frequency is
/// usually 0); dropping them would hide the silences that separate phrases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchSample {
    /// Frame time in seconds.
    pub timestamp: f32,
    /// Estimated fundamental in Hz; meaningful only when `voiced`.
    pub frequency_hz: f32,
    pub voiced: bool,
    /// Tracker confidence in `[0, 1]`.
    pub confidence: f32,
}

impl PitchSample {
    /// Voiced frame at `frequency_hz`.
    pub fn voiced(timestamp: f32, frequency_hz: f32, confidence: f32) -> Self {
        Self { timestamp, frequency_hz, voiced: true, confidence }
    }

    /// Unvoiced frame; frequency and confidence are 0.
    pub fn unvoiced(timestamp: f32) -> Self {
        Self { timestamp, frequency_hz: 0.0, voiced: false, confidence: 0.0 }
    }

    /// Voiced with a finite frequency inside `[fmin, fmax]`.
    pub fn is_usable(&self, fmin: f32, fmax: f32) -> bool {
        self.voiced
            && self.frequency_hz.is_finite()
            && self.frequency_hz >= fmin
            && self.frequency_hz <= fmax
    }
}

/// Errors raised by a pitch tracker.
#[derive(Error, Debug)]
pub enum PitchTrackError {
    /// Tracker parameters do not make sense for the signal.
    #[error("Invalid pitch tracker parameter: {0}")]
    InvalidParameter(String),

    /// Signal is shorter than one analysis frame.
    #[error("Signal too short: {len} samples, frame length {frame_length}")]
    SignalTooShort { len: usize, frame_length: usize },

    /// Tracker expects mono input.
    #[error("Pitch tracking requires mono audio, got {0} channels")]
    NotMono(u16),
}

/// Anything that turns audio into a time-ordered pitch track.
///
/// Implementations must emit one [`PitchSample`] per analysis frame, flagging
/// unvoiced frames rather than omitting them.
pub trait PitchTracker: Send + Sync {
    fn track(&self, audio: &AudioData) -> Result<Vec<PitchSample>, PitchTrackError>;
}
