/// Converts frequencies in Hz to MIDI note numbers (A4 = 440 Hz = 69).
pub fn hz_to_midi(frequencies: &[f32]) -> Vec<f32> {
    frequencies.iter().map(|&f| 12.0 * (f / 440.0).log2() + 69.0).collect()
}

/// Converts MIDI note numbers to frequencies in Hz.
pub fn midi_to_hz(notes: &[f32]) -> Vec<f32> {
    notes.iter().map(|&n| 440.0 * 2.0f32.powf((n - 69.0) / 12.0)).collect()
}

/// Western note name of a frequency, e.g. `"A3"` for 220 Hz.
pub fn hz_to_note(frequency: f32) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let midi = hz_to_midi(&[frequency])[0].round() as i32;
    format!("{}{}", NAMES[midi.rem_euclid(12) as usize], midi.div_euclid(12) - 1)
}

/// Signed distance in semitones from `tonic` to `frequency`.
///
/// # Examples
/// ```
/// use raga_detect::utils::semitones_from;
/// assert!((semitones_from(440.0, 220.0) - 12.0).abs() < 1e-4);
/// ```
pub fn semitones_from(frequency: f32, tonic: f32) -> f32 {
    12.0 * (frequency / tonic).log2()
}

/// Semitone offset from `tonic` folded into one octave, in `[0, 12)`.
pub fn semitone_class(frequency: f32, tonic: f32) -> f32 {
    let class = semitones_from(frequency, tonic).rem_euclid(12.0);
    // rem_euclid can round up to exactly 12.0 for tiny negative inputs.
    if class >= 12.0 { 0.0 } else { class }
}

/// Position of `frequency` within its octave, `fract(log2 f)` in `[0, 1)`,
/// together with the octave number `floor(log2 f)`.
pub fn octave_class(frequency: f32) -> (f32, i32) {
    let octs = frequency.log2();
    let octave = octs.floor();
    let class = octs - octave;
    if class >= 1.0 { (0.0, octave as i32 + 1) } else { (class, octave as i32) }
}
