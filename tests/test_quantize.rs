use raga_detect::features::{
    nearest_position, quantize, quantize_frequency, Disambiguation, QuantizeError, QuantizerConfig,
};
use raga_detect::pitch::{FrequencyRange, PitchSample};
use raga_detect::raga::{melakarta, Raga};
use raga_detect::swara::SwaraLabel::{self, *};

const TONIC: f32 = 220.0;

fn at(semitones: f32) -> f32 {
    TONIC * 2.0f32.powf(semitones / 12.0)
}

fn label(semitones: f32, policy: Disambiguation<'_>) -> SwaraLabel {
    quantize_frequency(at(semitones), TONIC, &FrequencyRange::default(), policy).unwrap()
}

#[test]
fn test_exact_offsets_use_canonical_spelling() {
    let expected = [S, R1, R2, G2, G3, M1, M2, P, D1, D2, N2, N3];
    for (offset, &want) in expected.iter().enumerate() {
        assert_eq!(label(offset as f32, Disambiguation::Canonical), want, "offset {}", offset);
    }
}

#[test]
fn test_octaves_fold() {
    assert_eq!(label(12.0, Disambiguation::Canonical), S);
    assert_eq!(label(-12.0, Disambiguation::Canonical), S);
    assert_eq!(label(19.0, Disambiguation::Canonical), P);
    assert_eq!(label(-5.0, Disambiguation::Canonical), P);
}

#[test]
fn test_rounds_to_nearest_position() {
    assert_eq!(label(1.4, Disambiguation::Canonical), R1);
    assert_eq!(label(1.6, Disambiguation::Canonical), R2);
    assert_eq!(label(6.9, Disambiguation::Canonical), P);
    assert_eq!(label(11.6, Disambiguation::Canonical), S);
    assert_eq!(label(-0.3, Disambiguation::Canonical), S);
}

#[test]
fn test_raga_context_respells_enharmonics() {
    let kanakangi = melakarta(1).unwrap();
    let policy = Disambiguation::RagaContext(&kanakangi);
    assert_eq!(label(2.0, policy), G1);
    assert_eq!(label(9.0, policy), N1);
    // Positions outside the raga fall back to canonical spelling.
    assert_eq!(label(4.0, policy), G3);

    let rasikapriya = melakarta(72).unwrap();
    let policy = Disambiguation::RagaContext(&rasikapriya);
    assert_eq!(label(3.0, policy), R3);
    assert_eq!(label(10.0, policy), D3);
    assert_eq!(label(3.0, Disambiguation::Canonical), G2);
}

#[test]
fn test_raga_context_never_moves_a_clear_pitch() {
    let mohanam = Raga::symmetric("Mohanam", vec![S, R2, G3, P, D2]).unwrap();
    let policy = Disambiguation::RagaContext(&mohanam);
    // Position 5 is outside Mohanam but the pitch is unambiguous.
    assert_eq!(label(5.1, policy), M1);
}

#[test]
fn test_invalid_tonic() {
    let range = FrequencyRange::default();
    assert_eq!(
        quantize_frequency(220.0, 0.0, &range, Disambiguation::Canonical),
        Err(QuantizeError::InvalidTonic(0.0))
    );
    assert!(matches!(
        quantize_frequency(220.0, f32::NAN, &range, Disambiguation::Canonical),
        Err(QuantizeError::InvalidTonic(_))
    ));
    assert!(matches!(
        quantize(&[], -1.0, &range, Disambiguation::Canonical, &QuantizerConfig::default()),
        Err(QuantizeError::InvalidTonic(_))
    ));
}

#[test]
fn test_invalid_pitch() {
    let range = FrequencyRange::default();
    for f in [0.0, -50.0, f32::NAN, f32::INFINITY, 20_000.0] {
        assert!(matches!(
            quantize_frequency(f, TONIC, &range, Disambiguation::Canonical),
            Err(QuantizeError::InvalidPitch { .. })
        ));
    }
}

#[test]
fn test_track_drops_unvoiced_and_skips_invalid() {
    let samples = vec![
        PitchSample::voiced(0.00, at(0.0), 0.9),
        PitchSample::unvoiced(0.01),
        PitchSample::voiced(0.02, f32::NAN, 0.9),
        PitchSample::voiced(0.03, at(7.0), 0.9),
        PitchSample::voiced(0.04, 0.0, 0.9),
        PitchSample::voiced(0.05, at(4.0), 0.9),
    ];
    let track = quantize(
        &samples,
        TONIC,
        &FrequencyRange::default(),
        Disambiguation::Canonical,
        &QuantizerConfig::default(),
    )
    .unwrap();

    assert_eq!(track.labels().collect::<Vec<_>>(), vec![S, P, G3]);
    assert_eq!(track.swaras.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 3, 5]);
    assert_eq!(track.swaras[1].timestamp, 0.03);
    assert_eq!(track.unvoiced, 1);
    assert_eq!(track.skipped, 2);
    assert_eq!(track.len(), 3);
}

#[test]
fn test_all_unvoiced_track_is_empty() {
    let samples: Vec<_> = (0..10).map(|i| PitchSample::unvoiced(i as f32 * 0.01)).collect();
    let track = quantize(
        &samples,
        TONIC,
        &FrequencyRange::default(),
        Disambiguation::Canonical,
        &QuantizerConfig::default(),
    )
    .unwrap();
    assert!(track.is_empty());
    assert_eq!(track.unvoiced, 10);
    assert_eq!(track.skipped, 0);
}

#[test]
fn test_parallel_path_preserves_order() {
    let samples: Vec<_> = (0..5000)
        .map(|i| {
            if i % 17 == 0 {
                PitchSample::unvoiced(i as f32 * 0.01)
            } else if i % 23 == 0 {
                PitchSample::voiced(i as f32 * 0.01, f32::NAN, 0.5)
            } else {
                PitchSample::voiced(i as f32 * 0.01, at((i % 24) as f32), 0.8)
            }
        })
        .collect();
    let range = FrequencyRange::default();

    let sequential = quantize(
        &samples,
        TONIC,
        &range,
        Disambiguation::Canonical,
        &QuantizerConfig { parallel_threshold: usize::MAX },
    )
    .unwrap();
    let parallel = quantize(
        &samples,
        TONIC,
        &range,
        Disambiguation::Canonical,
        &QuantizerConfig { parallel_threshold: 1 },
    )
    .unwrap();

    assert_eq!(sequential, parallel);
    assert!(parallel.swaras.windows(2).all(|w| w[0].index < w[1].index));
}

#[test]
fn test_midpoint_goes_to_lower_position() {
    let kanakangi = melakarta(1).unwrap();
    assert_eq!(nearest_position(2.5, Disambiguation::Canonical), 2);
    // Kanakangi has position 2 (G1) and lacks 3.
    assert_eq!(nearest_position(2.5, Disambiguation::RagaContext(&kanakangi)), 2);
    assert_eq!(nearest_position(7.5, Disambiguation::Canonical), 7);
}

#[test]
fn test_midpoint_follows_raga_context() {
    // Rasikapriya has position 3 (R3) and lacks 2.
    let rasikapriya = melakarta(72).unwrap();
    assert_eq!(nearest_position(2.5, Disambiguation::RagaContext(&rasikapriya)), 3);
    // Both neighbours present: the lower one wins.
    assert_eq!(nearest_position(3.5, Disambiguation::RagaContext(&rasikapriya)), 3);
}

#[test]
fn test_midpoint_wraps_at_octave() {
    assert_eq!(nearest_position(11.5, Disambiguation::Canonical), 11);
    assert_eq!(nearest_position(-0.5, Disambiguation::Canonical), 11);
    // Kanakangi has no position 11 but always has Sa.
    let kanakangi = melakarta(1).unwrap();
    assert_eq!(nearest_position(11.5, Disambiguation::RagaContext(&kanakangi)), 0);
}

#[test]
fn test_nearest_position_off_midpoint() {
    assert_eq!(nearest_position(2.49, Disambiguation::Canonical), 2);
    assert_eq!(nearest_position(2.51, Disambiguation::Canonical), 3);
    assert_eq!(nearest_position(11.51, Disambiguation::Canonical), 0);
    assert_eq!(nearest_position(25.0, Disambiguation::Canonical), 1);
}

#[test]
fn test_midpoint_frequency_reaches_tie_rule() {
    let rasikapriya = melakarta(72).unwrap();
    let kanakangi = melakarta(1).unwrap();
    let range = FrequencyRange::default();
    for tonic in [100.0f32, 128.0, 200.0, 220.0, 256.0, 440.0] {
        let midpoint = tonic * 2.0f32.powf(2.5 / 12.0);
        assert_eq!(
            quantize_frequency(midpoint, tonic, &range, Disambiguation::RagaContext(&rasikapriya)).unwrap(),
            R3,
            "tonic {}",
            tonic
        );
        assert_eq!(
            quantize_frequency(midpoint, tonic, &range, Disambiguation::RagaContext(&kanakangi)).unwrap(),
            G1,
            "tonic {}",
            tonic
        );
        assert_eq!(quantize_frequency(midpoint, tonic, &range, Disambiguation::Canonical).unwrap(), R2);
    }
}
