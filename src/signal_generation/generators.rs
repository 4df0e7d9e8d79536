use crate::swara::SwaraLabel;

/// Generates a pure tone (cosine) at a specified frequency.
///
/// # Arguments
/// * `frequency` - Frequency of the tone in Hz
/// * `sr` - Optional sample rate in Hz (defaults to 22050 Hz)
/// * `length` - Optional length in samples (overrides duration if provided)
/// * `duration` - Optional duration in seconds (defaults to 1.0 if length not provided)
/// * `phi` - Optional initial phase in radians (defaults to 0.0)
///
/// # Examples
/// ```
/// use raga_detect::signal_generation::tone;
/// let signal = tone(220.0, None, None, Some(0.5), None);
/// assert_eq!(signal.len(), 11025);
/// ```
pub fn tone(
    frequency: f32,
    sr: Option<u32>,
    length: Option<usize>,
    duration: Option<f32>,
    phi: Option<f32>,
) -> Vec<f32> {
    let sample_rate = sr.unwrap_or(22050);
    let len = length.unwrap_or_else(|| (duration.unwrap_or(1.0) * sample_rate as f32) as usize);
    let phase = phi.unwrap_or(0.0);
    (0..len)
        .map(|n| (2.0 * std::f32::consts::PI * frequency * n as f32 / sample_rate as f32 + phase).cos())
        .collect()
}

/// Synthesises a swara melody over a tonic, one sustained tone per swara.
///
/// Phase runs continuously across notes so note boundaries do not click.
/// Every note lasts `note_duration` seconds, followed by `gap` seconds of
/// silence (defaults to none).
///
/// # Arguments
/// * `tonic_hz` - Frequency of Sa
/// * `swaras` - Melody, each label played in the middle octave
/// * `note_duration` - Seconds per note
/// * `sr` - Optional sample rate in Hz (defaults to 22050 Hz)
/// * `gap` - Optional silence after each note, in seconds
///
/// # Examples
/// ```
/// use raga_detect::signal_generation::swara_melody;
/// use raga_detect::swara::SwaraLabel::*;
/// let melody = swara_melody(220.0, &[S, R2, G3], 0.25, Some(8000), None);
/// assert_eq!(melody.len(), 6000);
/// ```
pub fn swara_melody(
    tonic_hz: f32,
    swaras: &[SwaraLabel],
    note_duration: f32,
    sr: Option<u32>,
    gap: Option<f32>,
) -> Vec<f32> {
    let sample_rate = sr.unwrap_or(22050) as f32;
    let note_len = (note_duration * sample_rate) as usize;
    let gap_len = (gap.unwrap_or(0.0) * sample_rate) as usize;

    let mut signal = Vec::with_capacity(swaras.len() * (note_len + gap_len));
    let mut phase = 0.0f32;
    for &swara in swaras {
        let frequency = tonic_hz * 2.0f32.powf(swara.position() as f32 / 12.0);
        let step = 2.0 * std::f32::consts::PI * frequency / sample_rate;
        for _ in 0..note_len {
            signal.push(0.8 * phase.cos());
            phase = (phase + step) % (2.0 * std::f32::consts::PI);
        }
        signal.extend(std::iter::repeat_n(0.0, gap_len));
    }
    signal
}
