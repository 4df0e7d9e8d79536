use crate::pitch::sample::PitchSample;
use crate::utils::octave_class;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while estimating the tonic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TonicError {
    /// Too few usable voiced samples to trust a tonic.
    #[error(
        "Insufficient voicing: {usable} of {total} samples usable, need at least {required_fraction} of the track"
    )]
    InsufficientVoicing {
        usable: usize,
        total: usize,
        required_fraction: f32,
    },

    /// Estimator parameters are out of range.
    #[error("Invalid tonic parameter: {0}")]
    InvalidParameter(String),
}

/// How each voiced sample contributes to the pitch-class histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TonicWeighting {
    Uniform,
    Confidence,
    Duration,
    ConfidenceAndDuration,
}

/// Range of frequencies treated as valid pitch, in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyRange {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl Default for FrequencyRange {
    fn default() -> Self {
        let yin = crate::pitch::YinConfig::default();
        Self { min_hz: yin.fmin, max_hz: yin.fmax }
    }
}

impl FrequencyRange {
    /// Finite and inside `[min_hz, max_hz]`.
    pub fn contains(&self, frequency_hz: f32) -> bool {
        frequency_hz.is_finite() && frequency_hz >= self.min_hz && frequency_hz <= self.max_hz
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TonicConfig {
    /// Minimum share of the track that must be usable voiced samples.
    pub min_voiced_fraction: f32,
    /// Histogram resolution within one octave (120 gives 10-cent bins).
    pub bins_per_octave: usize,
    /// Half-width of the circular box filter run over the histogram before
    /// peak picking. Vibrato and gamaka spread a held note over neighbouring
    /// bins; 0 disables smoothing.
    pub smoothing_cents: f32,
    pub weighting: TonicWeighting,
}

impl Default for TonicConfig {
    fn default() -> Self {
        Self {
            min_voiced_fraction: 0.5,
            bins_per_octave: 120,
            smoothing_cents: 50.0,
            weighting: TonicWeighting::ConfidenceAndDuration,
        }
    }
}

/// Result of tonic estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TonicEstimate {
    /// Estimated Sa in Hz.
    pub frequency_hz: f32,
    /// Usable voiced samples over all samples.
    pub voiced_fraction: f32,
    /// Share of the total histogram weight inside the winning window.
    pub support: f32,
}

/// Estimates the tonic (Sa) of a pitch track.
///
/// Voiced samples inside `range` are folded into one octave and accumulated in
/// a weighted pitch-class histogram, which is then smoothed circularly over
/// `±smoothing_cents` so that a note spread by vibrato, or straddling the
/// octave edge, counts as one. The heaviest window wins; it is turned back
/// into a concrete frequency from the samples inside it that lie in the most
/// heavily weighted octave (ties go to the lower octave). When several
/// windows tie, the one yielding the lowest frequency is kept.
///
/// # Arguments
/// * `samples` - Full pitch track of one recording
/// * `range` - Frequencies considered valid pitch
/// * `config` - Voicing threshold, resolution and weighting
///
/// # Errors
/// * `TonicError::InsufficientVoicing` - If no sample is usable or the usable
///   share falls below `config.min_voiced_fraction`
/// * `TonicError::InvalidParameter` - On a zero resolution, a negative or non-finite
///   smoothing width, or a threshold outside `[0, 1]`
///
/// # Examples
/// ```
/// use raga_detect::pitch::{estimate_tonic, FrequencyRange, PitchSample, TonicConfig};
/// let track: Vec<_> = (0..100).map(|i| PitchSample::voiced(i as f32 * 0.01, 220.0, 0.9)).collect();
/// let tonic = estimate_tonic(&track, &FrequencyRange::default(), &TonicConfig::default()).unwrap();
/// assert!((tonic.frequency_hz - 220.0).abs() < 0.01);
/// ```
pub fn estimate_tonic(
    samples: &[PitchSample],
    range: &FrequencyRange,
    config: &TonicConfig,
) -> Result<TonicEstimate, TonicError> {
    if config.bins_per_octave == 0 {
        return Err(TonicError::InvalidParameter("bins_per_octave must be positive".to_string()));
    }
    if !(config.smoothing_cents.is_finite() && config.smoothing_cents >= 0.0) {
        return Err(TonicError::InvalidParameter(format!(
            "smoothing_cents {} must be finite and non-negative",
            config.smoothing_cents
        )));
    }
    if !(0.0..=1.0).contains(&config.min_voiced_fraction) {
        return Err(TonicError::InvalidParameter(format!(
            "min_voiced_fraction {} outside [0, 1]",
            config.min_voiced_fraction
        )));
    }

    let total = samples.len();
    let usable: Vec<usize> = (0..total)
        .filter(|&i| samples[i].is_usable(range.min_hz, range.max_hz))
        .collect();
    let voiced_fraction = if total == 0 { 0.0 } else { usable.len() as f32 / total as f32 };

    if usable.is_empty() || voiced_fraction < config.min_voiced_fraction {
        return Err(TonicError::InsufficientVoicing {
            usable: usable.len(),
            total,
            required_fraction: config.min_voiced_fraction,
        });
    }

    let mut weights: Vec<f32> = usable
        .iter()
        .map(|&i| sample_weight(samples, i, config.weighting))
        .collect();
    if weights.iter().sum::<f32>() <= 0.0 {
        weights.iter_mut().for_each(|w| *w = 1.0);
    }
    let total_weight: f32 = weights.iter().sum();

    let bins = config.bins_per_octave;
    let mut histogram = vec![0.0f32; bins];
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); bins];
    for (k, &i) in usable.iter().enumerate() {
        let (class, _) = octave_class(samples[i].frequency_hz);
        let bin = ((class * bins as f32) as usize).min(bins - 1);
        histogram[bin] += weights[k];
        members[bin].push(k);
    }

    let radius = smoothing_radius(config.smoothing_cents, bins);
    let window = move |centre: usize| (0..=2 * radius).map(move |k| (centre + bins - radius + k) % bins);
    let smoothed: Vec<f32> = (0..bins).map(|b| window(b).map(|j| histogram[j]).sum()).collect();

    let peak = smoothed.iter().copied().fold(0.0f32, f32::max);
    let tolerance = peak * 1e-6;
    let frequency_hz = (0..bins)
        .filter(|&b| smoothed[b] > 0.0 && peak - smoothed[b] <= tolerance)
        .map(|b| {
            let in_window: Vec<usize> = window(b).flat_map(|j| members[j].iter().copied()).collect();
            let centre = (b as f32 + 0.5) / bins as f32;
            window_frequency(samples, &usable, &weights, &in_window, centre)
        })
        .fold(f32::INFINITY, f32::min);

    let estimate = TonicEstimate {
        frequency_hz,
        voiced_fraction,
        support: peak / total_weight,
    };
    debug!(
        tonic_hz = estimate.frequency_hz,
        voiced_fraction = estimate.voiced_fraction,
        support = estimate.support,
        "tonic estimated"
    );
    Ok(estimate)
}

fn sample_weight(samples: &[PitchSample], i: usize, weighting: TonicWeighting) -> f32 {
    let confidence = samples[i].confidence.clamp(0.0, 1.0);
    let confidence = if confidence.is_finite() { confidence } else { 0.0 };
    match weighting {
        TonicWeighting::Uniform => 1.0,
        TonicWeighting::Confidence => confidence,
        TonicWeighting::Duration => frame_duration(samples, i),
        TonicWeighting::ConfidenceAndDuration => confidence * frame_duration(samples, i),
    }
}

/// Gap to the next frame; the last frame reuses the previous gap.
fn frame_duration(samples: &[PitchSample], i: usize) -> f32 {
    let gap = if i + 1 < samples.len() {
        samples[i + 1].timestamp - samples[i].timestamp
    } else if i > 0 {
        samples[i].timestamp - samples[i - 1].timestamp
    } else {
        1.0
    };
    if gap.is_finite() { gap.max(0.0) } else { 0.0 }
}

/// Bins on each side of the centre covered by `cents` of smoothing.
fn smoothing_radius(cents: f32, bins: usize) -> usize {
    let radius = (cents * bins as f32 / 1200.0).round() as usize;
    radius.min((bins - 1) / 2)
}

/// Weighted log-mean frequency of a window's samples within their modal octave.
///
/// Octaves are counted from the window centre (an octave class), so a note on
/// either side of the `fract(log2 f) = 0` edge stays in one group.
fn window_frequency(
    samples: &[PitchSample],
    usable: &[usize],
    weights: &[f32],
    members: &[usize],
    centre: f32,
) -> f32 {
    let mut by_octave: BTreeMap<i32, (f32, f32)> = BTreeMap::new();
    for &k in members {
        let log = samples[usable[k]].frequency_hz.log2();
        let octave = (log - centre).round() as i32;
        let entry = by_octave.entry(octave).or_insert((0.0, 0.0));
        entry.0 += weights[k];
        entry.1 += weights[k] * log;
    }

    // Octaves iterate in ascending order, so a strict comparison keeps the lower one on ties.
    let mut best: Option<(f32, f32)> = None;
    for &(weight, log_sum) in by_octave.values() {
        if best.is_none_or(|(w, _)| weight > w) {
            best = Some((weight, log_sum));
        }
    }

    best.filter(|&(weight, _)| weight > 0.0)
        .map(|(weight, log_sum)| 2.0f32.powf(log_sum / weight))
        .unwrap_or(f32::INFINITY)
}
