use crate::core::AudioData;
use crate::pitch::sample::{PitchSample, PitchTrackError, PitchTracker};
use crate::utils::midi_to_hz;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of the YIN tracker.
///
/// Defaults follow the usual vocal setup: C2–C7 search range, 2048-sample
/// frames with a quarter-frame hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YinConfig {
    /// Lowest detectable fundamental in Hz.
    pub fmin: f32,
    /// Highest detectable fundamental in Hz.
    pub fmax: f32,
    pub frame_length: usize,
    pub hop_length: usize,
    /// Aperiodicity threshold; frames whose normalised difference never dips
    /// below it are reported unvoiced.
    pub threshold: f32,
}

impl Default for YinConfig {
    fn default() -> Self {
        Self {
            fmin: midi_to_hz(&[36.0])[0],
            fmax: midi_to_hz(&[96.0])[0],
            frame_length: 2048,
            hop_length: 512,
            threshold: 0.15,
        }
    }
}

/// YIN fundamental-frequency estimator.
///
/// Cumulative-mean-normalised difference with absolute thresholding and
/// parabolic refinement. Confidence is `1 - d'(τ)` at the chosen lag.
#[derive(Debug, Clone, Default)]
pub struct Yin {
    config: YinConfig,
}

impl Yin {
    /// # Errors
    /// * `PitchTrackError::InvalidParameter` - On an empty or inverted range, zero frame or hop
    pub fn new(config: YinConfig) -> Result<Self, PitchTrackError> {
        if !(config.fmin > 0.0 && config.fmin < config.fmax) {
            return Err(PitchTrackError::InvalidParameter(format!(
                "frequency range {}..{} Hz",
                config.fmin, config.fmax
            )));
        }
        if config.frame_length < 4 || config.hop_length == 0 {
            return Err(PitchTrackError::InvalidParameter(format!(
                "frame_length {} / hop_length {}",
                config.frame_length, config.hop_length
            )));
        }
        if !(config.threshold > 0.0 && config.threshold < 1.0) {
            return Err(PitchTrackError::InvalidParameter(format!("threshold {}", config.threshold)));
        }
        Ok(Self { config })
    }

    /// Parameters this tracker was built with.
    pub fn config(&self) -> &YinConfig {
        &self.config
    }
}

impl PitchTracker for Yin {
    fn track(&self, audio: &AudioData) -> Result<Vec<PitchSample>, PitchTrackError> {
        if audio.channels != 1 {
            return Err(PitchTrackError::NotMono(audio.channels));
        }
        let cfg = &self.config;
        let sr = audio.sample_rate as f32;
        let y = &audio.samples;
        let frame_len = cfg.frame_length;

        if cfg.fmax > sr / 2.0 {
            return Err(PitchTrackError::InvalidParameter(format!(
                "fmax {} Hz above Nyquist for {} Hz audio",
                cfg.fmax, audio.sample_rate
            )));
        }
        if y.len() < frame_len {
            return Err(PitchTrackError::SignalTooShort { len: y.len(), frame_length: frame_len });
        }

        let lag_min = ((sr / cfg.fmax).floor() as usize).max(2);
        let lag_max = ((sr / cfg.fmin).ceil() as usize).min(frame_len / 2);
        if lag_min + 1 >= lag_max {
            return Err(PitchTrackError::InvalidParameter(format!(
                "frame_length {} too short for fmin {} Hz",
                frame_len, cfg.fmin
            )));
        }

        let n_frames = (y.len() - frame_len) / cfg.hop_length + 1;
        let track: Vec<PitchSample> = (0..n_frames)
            .into_par_iter()
            .map(|i| {
                let start = i * cfg.hop_length;
                let frame = &y[start..start + frame_len];
                let timestamp = (start + frame_len / 2) as f32 / sr;
                analyse_frame(frame, timestamp, sr, lag_min, lag_max, cfg)
            })
            .collect();

        debug!(
            frames = track.len(),
            voiced = track.iter().filter(|s| s.voiced).count(),
            "yin pitch track"
        );
        Ok(track)
    }
}

fn analyse_frame(
    frame: &[f32],
    timestamp: f32,
    sr: f32,
    lag_min: usize,
    lag_max: usize,
    cfg: &YinConfig,
) -> PitchSample {
    let window = frame.len() - lag_max;

    let mut diff = vec![0.0f32; lag_max + 1];
    for (tau, d) in diff.iter_mut().enumerate().skip(1) {
        *d = (0..window)
            .map(|j| {
                let delta = frame[j] - frame[j + tau];
                delta * delta
            })
            .sum();
    }

    let mut cmnd = vec![1.0f32; lag_max + 1];
    let mut running_sum = 0.0;
    for tau in 1..=lag_max {
        running_sum += diff[tau];
        cmnd[tau] = if running_sum > 1e-9 { diff[tau] * tau as f32 / running_sum } else { 1.0 };
    }

    let mut chosen = None;
    let mut tau = lag_min;
    while tau < lag_max {
        if cmnd[tau] < cfg.threshold {
            while tau + 1 < lag_max && cmnd[tau + 1] < cmnd[tau] {
                tau += 1;
            }
            chosen = Some(tau);
            break;
        }
        tau += 1;
    }

    let Some(tau) = chosen else {
        return PitchSample::unvoiced(timestamp);
    };

    let (a, b, c) = (cmnd[tau - 1], cmnd[tau], cmnd[tau + 1]);
    let denom = a - 2.0 * b + c;
    let delta = if denom.abs() > 1e-12 { 0.5 * (a - c) / denom } else { 0.0 };
    let frequency = sr / (tau as f32 + delta.clamp(-1.0, 1.0));
    let confidence = (1.0 - b).clamp(0.0, 1.0);

    if frequency >= cfg.fmin && frequency <= cfg.fmax {
        PitchSample::voiced(timestamp, frequency, confidence)
    } else {
        PitchSample::unvoiced(timestamp)
    }
}
