pub mod mono;
pub mod resampling;

pub use mono::to_mono;
pub use resampling::{resample, ResampleError};
