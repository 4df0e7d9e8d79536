use crate::features::{ProfileConfig, QuantizerConfig};
use crate::matching::{MatchError, MatchWeights};
use crate::pitch::{FrequencyRange, TonicConfig, Yin, YinConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Weights(#[from] MatchError),
}

/// Every tunable of the detection pipeline.
///
/// All sections are optional in TOML; missing keys take their defaults.
///
/// ```toml
/// sample_rate = 22050
///
/// [tonic]
/// min_voiced_fraction = 0.4
/// weighting = "confidence"
///
/// [weights]
/// coverage = 0.7
/// transition = 0.3
/// presence = 0.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Rate audio is resampled to before pitch tracking.
    pub sample_rate: u32,
    /// Frequencies accepted as valid pitch by the tonic estimator and quantizer.
    pub pitch_range: FrequencyRange,
    pub yin: YinConfig,
    pub tonic: TonicConfig,
    pub quantizer: QuantizerConfig,
    pub profile: ProfileConfig,
    pub weights: MatchWeights,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            pitch_range: FrequencyRange::default(),
            yin: YinConfig::default(),
            tonic: TonicConfig::default(),
            quantizer: QuantizerConfig::default(),
            profile: ProfileConfig::default(),
            weights: MatchWeights::default(),
        }
    }
}

impl DetectorConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<DetectorConfig, ConfigError> {
        let config: DetectorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    /// * `ConfigError::Io` - If the file cannot be read
    /// * `ConfigError::Parse` - On malformed TOML
    /// * `ConfigError::Invalid` / `ConfigError::Weights` - As for [`DetectorConfig::validate`]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<DetectorConfig, ConfigError> {
        DetectorConfig::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Renders the configuration as TOML, every key included.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// # Errors
    /// * `ConfigError::Invalid` - On a zero sample rate, an empty pitch range, a
    ///   voicing threshold outside `[0, 1]`, a zero histogram resolution, a
    ///   negative smoothing width, or YIN
    ///   parameters the tracker rejects
    /// * `ConfigError::Weights` - On invalid match weights
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".to_string()));
        }
        let range = &self.pitch_range;
        if !(range.min_hz > 0.0 && range.min_hz < range.max_hz && range.max_hz.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "pitch_range {}..{} Hz",
                range.min_hz, range.max_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.tonic.min_voiced_fraction) {
            return Err(ConfigError::Invalid(format!(
                "tonic.min_voiced_fraction {} outside [0, 1]",
                self.tonic.min_voiced_fraction
            )));
        }
        if self.tonic.bins_per_octave == 0 {
            return Err(ConfigError::Invalid("tonic.bins_per_octave must be positive".to_string()));
        }
        if !(self.tonic.smoothing_cents.is_finite() && self.tonic.smoothing_cents >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tonic.smoothing_cents {} must be finite and non-negative",
                self.tonic.smoothing_cents
            )));
        }
        if self.yin.fmax > self.sample_rate as f32 / 2.0 {
            return Err(ConfigError::Invalid(format!(
                "yin.fmax {} Hz above Nyquist for {} Hz",
                self.yin.fmax, self.sample_rate
            )));
        }
        Yin::new(self.yin.clone()).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.weights.validate()?;
        Ok(())
    }
}
