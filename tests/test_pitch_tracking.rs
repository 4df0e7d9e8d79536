use approx::assert_abs_diff_eq;
use raga_detect::core::AudioData;
use raga_detect::pitch::{PitchTrackError, PitchTracker, Yin, YinConfig};
use raga_detect::signal_generation::{swara_melody, tone};
use raga_detect::swara::SwaraLabel::*;

const SR: u32 = 16000;

fn median_voiced(track: &[raga_detect::pitch::PitchSample]) -> f32 {
    let mut voiced: Vec<f32> = track.iter().filter(|s| s.voiced).map(|s| s.frequency_hz).collect();
    voiced.sort_by(f32::total_cmp);
    voiced[voiced.len() / 2]
}

#[test]
fn test_yin_tracks_pure_tone() {
    let audio = AudioData::new(tone(220.0, Some(SR), None, Some(0.5), None), SR, 1);
    let track = Yin::default().track(&audio).unwrap();

    assert!(!track.is_empty());
    assert!(track.iter().all(|s| s.voiced));
    assert_abs_diff_eq!(median_voiced(&track), 220.0, epsilon = 1.0);
    assert!(track.iter().all(|s| s.confidence > 0.8));
}

#[test]
fn test_yin_frame_timestamps() {
    let audio = AudioData::new(tone(330.0, Some(SR), None, Some(0.5), None), SR, 1);
    let cfg = YinConfig::default();
    let track = Yin::new(cfg.clone()).unwrap().track(&audio).unwrap();

    let expected_frames = (audio.samples.len() - cfg.frame_length) / cfg.hop_length + 1;
    assert_eq!(track.len(), expected_frames);
    assert_abs_diff_eq!(track[0].timestamp, (cfg.frame_length / 2) as f32 / SR as f32, epsilon = 1e-6);
    assert!(track.windows(2).all(|w| w[1].timestamp > w[0].timestamp));
}

#[test]
fn test_yin_silence_is_unvoiced() {
    let audio = AudioData::new(vec![0.0; 8000], SR, 1);
    let track = Yin::default().track(&audio).unwrap();
    assert!(!track.is_empty());
    assert!(track.iter().all(|s| !s.voiced));
}

#[test]
fn test_yin_follows_melody() {
    let melody = swara_melody(200.0, &[S, P], 0.5, Some(SR), None);
    let audio = AudioData::new(melody, SR, 1);
    let track = Yin::default().track(&audio).unwrap();

    let first = &track[2];
    let last = &track[track.len() - 3];
    assert!(first.voiced && last.voiced);
    assert_abs_diff_eq!(first.frequency_hz, 200.0, epsilon = 2.0);
    assert_abs_diff_eq!(last.frequency_hz, 200.0 * 2.0f32.powf(7.0 / 12.0), epsilon = 3.0);
}

#[test]
fn test_yin_rejects_bad_input() {
    let yin = Yin::default();

    let stereo = AudioData::new(vec![0.0; 8192], SR, 2);
    assert!(matches!(yin.track(&stereo), Err(PitchTrackError::NotMono(2))));

    let short = AudioData::new(vec![0.0; 100], SR, 1);
    assert!(matches!(
        yin.track(&short),
        Err(PitchTrackError::SignalTooShort { len: 100, frame_length: 2048 })
    ));

    let low_rate = AudioData::new(vec![0.0; 8192], 2000, 1);
    assert!(matches!(yin.track(&low_rate), Err(PitchTrackError::InvalidParameter(_))));
}

#[test]
fn test_yin_config_validation() {
    let inverted = YinConfig { fmin: 500.0, fmax: 100.0, ..YinConfig::default() };
    assert!(Yin::new(inverted).is_err());
    let no_hop = YinConfig { hop_length: 0, ..YinConfig::default() };
    assert!(Yin::new(no_hop).is_err());
    let bad_threshold = YinConfig { threshold: 1.5, ..YinConfig::default() };
    assert!(Yin::new(bad_threshold).is_err());
    assert!(Yin::new(YinConfig::default()).is_ok());
}
