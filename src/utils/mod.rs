pub mod frequency;

pub use frequency::{hz_to_midi, hz_to_note, midi_to_hz, octave_class, semitone_class, semitones_from};
