use raga_detect::pitch::TonicWeighting;
use raga_detect::{ConfigError, DetectorConfig};
use tempfile::tempdir;

#[test]
fn test_defaults_are_valid() {
    let config = DetectorConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.sample_rate, 22050);
    assert_eq!(config.tonic.min_voiced_fraction, 0.5);
    assert_eq!(config.tonic.bins_per_octave, 120);
    assert_eq!(config.tonic.smoothing_cents, 50.0);
    assert!(!config.profile.count_self_transitions);
}

#[test]
fn test_empty_document_gives_defaults() {
    assert_eq!(DetectorConfig::from_toml_str("").unwrap(), DetectorConfig::default());
}

#[test]
fn test_partial_sections() {
    let text = r#"
        sample_rate = 16000

        [tonic]
        min_voiced_fraction = 0.3
        weighting = "confidence"

        [weights]
        coverage = 0.7
        presence = 0.0
    "#;
    let config = DetectorConfig::from_toml_str(text).unwrap();
    assert_eq!(config.sample_rate, 16000);
    assert_eq!(config.tonic.min_voiced_fraction, 0.3);
    assert_eq!(config.tonic.weighting, TonicWeighting::Confidence);
    assert_eq!(config.tonic.bins_per_octave, 120);
    assert_eq!(config.weights.coverage, 0.7);
    assert_eq!(config.weights.transition, 0.3);
    assert_eq!(config.weights.presence, 0.0);
    assert_eq!(config.yin, DetectorConfig::default().yin);
}

#[test]
fn test_round_trip() {
    let mut config = DetectorConfig::default();
    config.profile.count_self_transitions = true;
    config.quantizer.parallel_threshold = 1024;
    let text = config.to_toml_string().unwrap();
    assert_eq!(DetectorConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn test_from_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("detector.toml");
    std::fs::write(&path, "[profile]\ncount_self_transitions = true\n").unwrap();
    let config = DetectorConfig::from_path(&path).unwrap();
    assert!(config.profile.count_self_transitions);

    assert!(matches!(
        DetectorConfig::from_path(dir.path().join("missing.toml")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_parse_errors() {
    assert!(matches!(DetectorConfig::from_toml_str("sample_rate = \"fast\""), Err(ConfigError::Parse(_))));
    assert!(matches!(
        DetectorConfig::from_toml_str("[tonic]\nweighting = \"loudness\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_validation_errors() {
    let cases = [
        "sample_rate = 0",
        "[pitch_range]\nmin_hz = 500.0\nmax_hz = 100.0",
        "[tonic]\nmin_voiced_fraction = 1.5",
        "[tonic]\nbins_per_octave = 0",
        "[tonic]\nsmoothing_cents = -5.0",
        "[yin]\nthreshold = 0.0",
        "sample_rate = 4000",
    ];
    for text in cases {
        assert!(matches!(DetectorConfig::from_toml_str(text), Err(ConfigError::Invalid(_))), "{}", text);
    }
    assert!(matches!(
        DetectorConfig::from_toml_str("[weights]\ncoverage = -1.0"),
        Err(ConfigError::Weights(_))
    ));
}
