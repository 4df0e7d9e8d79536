pub mod profile;
pub mod quantize;

pub use profile::{ProfileConfig, SwaraProfile};
pub use quantize::{
    nearest_position, quantize, quantize_frequency, Disambiguation, QuantizeError, QuantizedSwara, QuantizedTrack,
    QuantizerConfig,
};
