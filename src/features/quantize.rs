use crate::pitch::{FrequencyRange, PitchSample};
use crate::raga::Raga;
use crate::swara::{SwaraLabel, POSITIONS};
use crate::utils::semitone_class;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by swara quantization.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantizeError {
    /// A voiced sample with a non-finite or out-of-range frequency.
    #[error("Invalid pitch at sample {index}: {frequency_hz} Hz")]
    InvalidPitch { index: usize, frequency_hz: f32 },

    /// Tonic must be a finite, positive frequency.
    #[error("Invalid tonic frequency: {0} Hz")]
    InvalidTonic(f32),
}

/// How to spell a position that has two names, and how to settle exact
/// midpoints between two positions.
#[derive(Debug, Clone, Copy, Default)]
pub enum Disambiguation<'a> {
    /// No raga hypothesis: canonical spellings, midpoints go to the lower position.
    #[default]
    Canonical,
    /// Prefer whatever the hypothesised raga uses.
    RagaContext(&'a Raga),
}

impl Disambiguation<'_> {
    fn label_for(&self, position: usize) -> SwaraLabel {
        let hinted = match self {
            Disambiguation::Canonical => None,
            Disambiguation::RagaContext(raga) => raga.label_at(position),
        };
        hinted.unwrap_or_else(|| SwaraLabel::canonical(position).unwrap_or(SwaraLabel::S))
    }

    fn break_tie(&self, lower: usize, upper: usize) -> usize {
        match self {
            Disambiguation::RagaContext(raga)
                if !raga.contains_position(lower) && raga.contains_position(upper) =>
            {
                upper
            }
            _ => lower,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizerConfig {
    /// Tracks at least this long are quantized on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self { parallel_threshold: 16_384 }
    }
}

/// One voiced sample mapped onto the swara space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantizedSwara {
    /// Index of the source sample in the pitch track.
    pub index: usize,
    pub timestamp: f32,
    pub label: SwaraLabel,
}

/// Output of [`quantize`]: swaras in track order plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuantizedTrack {
    pub swaras: Vec<QuantizedSwara>,
    /// Unvoiced samples, dropped silently.
    pub unvoiced: usize,
    /// Voiced samples rejected as invalid pitch.
    pub skipped: usize,
}

impl QuantizedTrack {
    /// Labels in track order.
    pub fn labels(&self) -> impl Iterator<Item = SwaraLabel> + '_ {
        self.swaras.iter().map(|s| s.label)
    }

    /// Number of quantized samples.
    pub fn len(&self) -> usize {
        self.swaras.len()
    }

    /// True when no voiced sample survived.
    pub fn is_empty(&self) -> bool {
        self.swaras.is_empty()
    }
}

/// Maps one frequency onto the nearest swara relative to `tonic_hz`.
///
/// The offset `12·log2(f / tonic)` is folded into `[0, 12)` and rounded to the
/// nearest of the twelve positions on the circle (see [`nearest_position`]).
///
/// # Errors
/// * `QuantizeError::InvalidPitch` - If `frequency_hz` is non-finite or outside `range`
/// * `QuantizeError::InvalidTonic` - If `tonic_hz` is not a finite positive number
///
/// # Examples
/// ```
/// use raga_detect::features::{quantize_frequency, Disambiguation};
/// use raga_detect::pitch::FrequencyRange;
/// use raga_detect::swara::SwaraLabel;
/// let label = quantize_frequency(330.0, 220.0, &FrequencyRange::default(), Disambiguation::Canonical).unwrap();
/// assert_eq!(label, SwaraLabel::P);
/// ```
pub fn quantize_frequency(
    frequency_hz: f32,
    tonic_hz: f32,
    range: &FrequencyRange,
    policy: Disambiguation<'_>,
) -> Result<SwaraLabel, QuantizeError> {
    if !(tonic_hz.is_finite() && tonic_hz > 0.0) {
        return Err(QuantizeError::InvalidTonic(tonic_hz));
    }
    if !range.contains(frequency_hz) {
        return Err(QuantizeError::InvalidPitch { index: 0, frequency_hz });
    }

    let position = nearest_position(semitone_class(frequency_hz, tonic_hz), policy);
    Ok(policy.label_for(position))
}

/// Offsets this close to `k + 0.5` semitones count as exact midpoints.
const MIDPOINT_TOLERANCE: f32 = 1e-4;

/// Nearest of the twelve positions to a semitone offset from Sa.
///
/// `offset` is folded into `[0, 12)` first. An offset halfway between two
/// positions goes to the lower one, unless `policy` names a raga that contains
/// only the upper one. 11.5 lies between N3 (11) and the upper Sa (0).
///
/// # Examples
/// ```
/// use raga_detect::features::{nearest_position, Disambiguation};
/// assert_eq!(nearest_position(4.2, Disambiguation::Canonical), 4);
/// assert_eq!(nearest_position(11.5, Disambiguation::Canonical), 11);
/// assert_eq!(nearest_position(-0.2, Disambiguation::Canonical), 0);
/// ```
pub fn nearest_position(offset: f32, policy: Disambiguation<'_>) -> usize {
    let class = offset.rem_euclid(POSITIONS as f32);
    let lower = class.floor() as usize % POSITIONS;
    let upper = (lower + 1) % POSITIONS;
    let frac = class - class.floor();

    if (frac - 0.5).abs() <= MIDPOINT_TOLERANCE {
        policy.break_tie(lower, upper)
    } else if frac < 0.5 {
        lower
    } else {
        upper
    }
}

/// Quantizes a pitch track against a tonic.
///
/// Unvoiced samples are dropped. Voiced samples with an unusable frequency
/// are skipped, counted and logged; they never abort the run. Output order
/// follows the input, even when the work is spread across threads.
///
/// # Arguments
/// * `samples` - Pitch track
/// * `tonic_hz` - Estimated Sa
/// * `range` - Frequencies accepted as valid pitch
/// * `policy` - Spelling and tie-break policy
/// * `config` - Parallelism threshold
///
/// # Errors
/// * `QuantizeError::InvalidTonic` - If `tonic_hz` is not a finite positive number
pub fn quantize(
    samples: &[PitchSample],
    tonic_hz: f32,
    range: &FrequencyRange,
    policy: Disambiguation<'_>,
    config: &QuantizerConfig,
) -> Result<QuantizedTrack, QuantizeError> {
    if !(tonic_hz.is_finite() && tonic_hz > 0.0) {
        return Err(QuantizeError::InvalidTonic(tonic_hz));
    }

    let classify = |(index, sample): (usize, &PitchSample)| {
        if !sample.voiced {
            return None;
        }
        let quantized = quantize_frequency(sample.frequency_hz, tonic_hz, range, policy)
            .map(|label| QuantizedSwara { index, timestamp: sample.timestamp, label })
            .map_err(|_| QuantizeError::InvalidPitch { index, frequency_hz: sample.frequency_hz });
        Some(quantized)
    };

    let results: Vec<Option<Result<QuantizedSwara, QuantizeError>>> =
        if samples.len() >= config.parallel_threshold {
            samples.par_iter().enumerate().map(&classify).collect()
        } else {
            samples.iter().enumerate().map(&classify).collect()
        };

    let mut track = QuantizedTrack { swaras: Vec::with_capacity(results.len()), ..Default::default() };
    for result in results {
        match result {
            None => track.unvoiced += 1,
            Some(Ok(swara)) => track.swaras.push(swara),
            Some(Err(e)) => {
                debug!("{}", e);
                track.skipped += 1;
            }
        }
    }

    if track.skipped > 0 {
        warn!(skipped = track.skipped, total = samples.len(), "skipped invalid pitch samples");
    }
    debug!(
        quantized = track.swaras.len(),
        unvoiced = track.unvoiced,
        skipped = track.skipped,
        "pitch track quantized"
    );
    Ok(track)
}
