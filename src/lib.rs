//! # raga-detect: Carnatic raga identification in Rust
//!
//! Identifies the raga of a recording from its pitch contour. The pipeline
//! estimates the tonic (Sa), quantizes every voiced pitch onto the twelve
//! swara positions, summarises swara usage and melodic movement, and ranks a
//! catalog of ragas, including all 72 Melakarta parent scales, against it.
//!
//! ## Pipeline
//! - Pitch tracking: any [`pitch::PitchTracker`]; a YIN tracker ships by default.
//! - Tonic estimation: weighted octave-folded pitch histogram.
//! - Swara quantization: nearest position relative to the tonic, with an
//!   explicit enharmonic [`features::Disambiguation`] policy.
//! - Features: swara histogram and transition profile.
//! - Matching: coverage, transition-consistency and presence scores.
//!
//! ## Usage
//! ```rust
//! use raga_detect::pitch::PitchSample;
//! use raga_detect::RagaDetector;
//!
//! let detector = RagaDetector::with_defaults().unwrap();
//! let track: Vec<PitchSample> = (0..200)
//!     .map(|i| PitchSample::voiced(i as f32 * 0.01, 220.0, 0.9))
//!     .collect();
//! let detection = detector.detect_track(&track).unwrap();
//! assert!((detection.tonic_hz() - 220.0).abs() < 0.5);
//! ```

/// Audio loading.
///
/// WAV decoding and the `AudioData` container.
pub mod core;

/// Down-mixing and resampling applied while loading audio.
pub mod signal_processing;

/// Synthetic test signals: tones and swara melodies.
pub mod signal_generation;

/// Frequency and pitch-class conversions.
pub mod utils;

/// The sixteen swara labels and the twelve chromatic positions they occupy.
pub mod swara;

/// Raga definitions, the Melakarta generator and the raga catalog.
pub mod raga;

/// Pitch samples, pitch tracking and tonic estimation.
pub mod pitch;

/// Swara quantization and swara-usage profiles.
pub mod features;

/// Raga scoring and ranking.
pub mod matching;

/// Pipeline configuration.
pub mod config;

/// The caller-facing detection pipeline.
pub mod detector;

pub use config::{ConfigError, DetectorConfig};
pub use detector::{Detection, DetectionError, RagaDetector};
pub use raga::{melakarta_catalog, RagaCatalog};
