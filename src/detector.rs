use crate::config::{ConfigError, DetectorConfig};
use crate::core::{load, AudioData, AudioError};
use crate::features::{quantize, Disambiguation, QuantizeError, SwaraProfile};
use crate::matching::{match_ragas, MatchResult};
use crate::pitch::{estimate_tonic, PitchSample, PitchTrackError, PitchTracker, TonicError, TonicEstimate, Yin};
use crate::raga::{CatalogError, RagaCatalog};
use crate::utils::hz_to_note;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Failures that abort one detection call.
///
/// Per-sample problems never show up here; they are counted in
/// [`Detection::skipped`].
#[derive(Error, Debug)]
pub enum DetectionError {
    /// Too few usable voiced samples to estimate a tonic. Retrying with a lower
    /// `tonic.min_voiced_fraction` may succeed.
    #[error("Insufficient voicing: {usable} of {total} samples usable, need {required_fraction}")]
    InsufficientVoicing {
        usable: usize,
        total: usize,
        required_fraction: f32,
    },

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Pitch tracking error: {0}")]
    PitchTrack(#[from] PitchTrackError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Quantization error: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<TonicError> for DetectionError {
    fn from(e: TonicError) -> Self {
        match e {
            TonicError::InsufficientVoicing { usable, total, required_fraction } => {
                DetectionError::InsufficientVoicing { usable, total, required_fraction }
            }
            TonicError::InvalidParameter(reason) => DetectionError::Config(ConfigError::Invalid(reason)),
        }
    }
}

/// Outcome of one detection call.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub tonic: TonicEstimate,
    /// Every catalog raga, most likely first.
    pub matches: Vec<MatchResult>,
    pub profile: SwaraProfile,
    /// Samples in the pitch track.
    pub total_samples: usize,
    pub unvoiced: usize,
    /// Voiced samples dropped as invalid pitch.
    pub skipped: usize,
}

impl Detection {
    /// Estimated Sa in Hz.
    pub fn tonic_hz(&self) -> f32 {
        self.tonic.frequency_hz
    }

    /// Best-ranked raga, if the catalog is not empty.
    pub fn top(&self) -> Option<&MatchResult> {
        self.matches.first()
    }

    /// False when the profile is empty or nothing scored above zero; the
    /// ranking is then uninformative.
    pub fn is_conclusive(&self) -> bool {
        !self.profile.is_empty() && self.top().is_some_and(|m| m.score > 0.0)
    }
}

/// The raga identification pipeline: pitch track → tonic → swaras → profile → ranking.
///
/// Holds an immutable catalog behind an `Arc`, so one detector (or several
/// sharing a catalog) can serve concurrent calls.
pub struct RagaDetector<T: PitchTracker = Yin> {
    config: DetectorConfig,
    catalog: Arc<RagaCatalog>,
    tracker: T,
}

impl RagaDetector<Yin> {
    /// Detector using the built-in YIN tracker.
    pub fn new(config: DetectorConfig, catalog: Arc<RagaCatalog>) -> Result<Self, DetectionError> {
        let tracker = Yin::new(config.yin.clone())?;
        RagaDetector::with_tracker(config, catalog, tracker)
    }

    /// Default configuration against the Melakarta and bundled janya ragas.
    pub fn with_defaults() -> Result<Self, DetectionError> {
        RagaDetector::new(DetectorConfig::default(), Arc::new(RagaCatalog::standard()?))
    }
}

impl<T: PitchTracker> RagaDetector<T> {
    /// Detector using any [`PitchTracker`].
    ///
    /// # Errors
    /// * `DetectionError::Config` - If `config` fails validation
    pub fn with_tracker(config: DetectorConfig, catalog: Arc<RagaCatalog>, tracker: T) -> Result<Self, DetectionError> {
        config.validate()?;
        Ok(Self { config, catalog, tracker })
    }

    /// Configuration in use.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Catalog every detection is ranked against.
    pub fn catalog(&self) -> &RagaCatalog {
        &self.catalog
    }

    /// Loads a WAV file at the configured rate and detects its raga.
    pub fn detect_file<P: AsRef<Path>>(&self, path: P) -> Result<Detection, DetectionError> {
        let audio = load(path, Some(self.config.sample_rate), Some(true), None, None)?;
        self.detect_audio(&audio)
    }

    /// Tracks pitch in decoded audio and detects its raga.
    pub fn detect_audio(&self, audio: &AudioData) -> Result<Detection, DetectionError> {
        let mono = audio.to_mono();
        let track = self.tracker.track(&mono)?;
        self.detect_track(&track)
    }

    /// Detects the raga of an existing pitch track with canonical spellings.
    pub fn detect_track(&self, samples: &[PitchSample]) -> Result<Detection, DetectionError> {
        self.detect_track_with(samples, Disambiguation::Canonical)
    }

    /// Detects the raga of a pitch track using an explicit disambiguation policy.
    pub fn detect_track_with(
        &self,
        samples: &[PitchSample],
        policy: Disambiguation<'_>,
    ) -> Result<Detection, DetectionError> {
        let cfg = &self.config;
        let tonic = estimate_tonic(samples, &cfg.pitch_range, &cfg.tonic)?;
        let quantized = quantize(samples, tonic.frequency_hz, &cfg.pitch_range, policy, &cfg.quantizer)?;
        let profile = SwaraProfile::extract(&quantized.swaras, &cfg.profile);
        let matches = match_ragas(&profile, &self.catalog, &cfg.weights);

        let detection = Detection {
            tonic,
            matches,
            profile,
            total_samples: samples.len(),
            unvoiced: quantized.unvoiced,
            skipped: quantized.skipped,
        };

        match detection.top() {
            Some(top) if detection.is_conclusive() => info!(
                tonic_hz = detection.tonic_hz(),
                tonic_note = %hz_to_note(detection.tonic_hz()),
                raga = %top.raga_name,
                score = top.score,
                "raga detected"
            ),
            _ => warn!(
                tonic_hz = detection.tonic_hz(),
                samples = samples.len(),
                "inconclusive detection: empty swara profile"
            ),
        }
        Ok(detection)
    }
}
