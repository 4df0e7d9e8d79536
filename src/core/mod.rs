pub mod io;

pub use io::{export, load, AudioData, AudioError};
