pub mod sample;
pub mod tonic;
pub mod yin;

pub use sample::{PitchSample, PitchTrackError, PitchTracker};
pub use tonic::{estimate_tonic, FrequencyRange, TonicConfig, TonicError, TonicEstimate, TonicWeighting};
pub use yin::{Yin, YinConfig};
