pub mod generators;

pub use generators::{swara_melody, tone};
