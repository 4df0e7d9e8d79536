pub mod label;

pub use label::{SwaraError, SwaraLabel, LABEL_COUNT, POSITIONS};
