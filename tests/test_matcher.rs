use approx::assert_abs_diff_eq;
use raga_detect::features::{ProfileConfig, SwaraProfile};
use raga_detect::matching::{match_ragas, score_raga, MatchError, MatchWeights};
use raga_detect::raga::{melakarta, Raga, RagaCatalog};
use raga_detect::swara::SwaraLabel::*;

#[test]
fn test_every_melakarta_ranks_first_on_its_own_arohana() {
    let catalog = RagaCatalog::melakarta().unwrap();
    let weights = MatchWeights::default();
    for raga in catalog.iter() {
        let profile = SwaraProfile::from_sequence(raga.arohana(), &ProfileConfig::default());
        let ranked = match_ragas(&profile, &catalog, &weights);
        assert_eq!(ranked[0].raga_name, raga.name());
        assert_eq!(ranked[0].melakarta, raga.melakarta());
        assert_abs_diff_eq!(ranked[0].score, 1.0, epsilon = 1e-5);
        assert!(ranked[1].score < ranked[0].score);
    }
}

#[test]
fn test_ranks_are_one_based_and_sorted() {
    let catalog = RagaCatalog::standard().unwrap();
    let profile = SwaraProfile::from_sequence(&[S, R2, G3, M1, P, D2, N3, S], &ProfileConfig::default());
    let ranked = match_ragas(&profile, &catalog, &MatchWeights::default());

    assert_eq!(ranked.len(), catalog.len());
    for (i, result) in ranked.iter().enumerate() {
        assert_eq!(result.rank, i + 1);
    }
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(ranked[0].raga_name, "Dheerasankarabharanam");
}

#[test]
fn test_empty_profile_scores_zero_and_sorts_by_name() {
    let catalog = RagaCatalog::standard().unwrap();
    let ranked = match_ragas(&SwaraProfile::default(), &catalog, &MatchWeights::default());
    assert!(ranked.iter().all(|r| r.score == 0.0));
    let names: Vec<&str> = ranked.iter().map(|r| r.raga_name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_transitions_separate_ragas_with_shared_notes() {
    // Mohanam phrase: every note also belongs to Harikambhoji and Bilahari.
    let phrase = [S, R2, G3, P, D2, S, D2, P, G3, R2, S];
    let profile = SwaraProfile::from_sequence(&phrase, &ProfileConfig::default());
    let catalog = RagaCatalog::standard().unwrap();
    let ranked = match_ragas(&profile, &catalog, &MatchWeights::default());

    assert_eq!(ranked[0].raga_name, "Mohanam");
    let harikambhoji = ranked.iter().find(|r| r.raga_name == "Harikambhoji").unwrap();
    let bilahari = ranked.iter().find(|r| r.raga_name == "Bilahari").unwrap();
    assert_abs_diff_eq!(harikambhoji.components.coverage, 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bilahari.components.coverage, 1.0, epsilon = 1e-6);
    assert!(harikambhoji.components.transition < 1.0);
    assert!(bilahari.components.transition < 1.0);
}

#[test]
fn test_score_components() {
    let mohanam = Raga::symmetric("Mohanam", vec![S, R2, G3, P, D2]).unwrap();
    // Half the samples on M1, which Mohanam lacks.
    let profile = SwaraProfile::from_sequence(&[S, M1, G3, M1], &ProfileConfig::default());
    let score = score_raga(&profile, &mohanam, &MatchWeights::default());

    assert_abs_diff_eq!(score.coverage, 0.5, epsilon = 1e-6);
    assert_eq!(score.transition, 0.0);
    assert_abs_diff_eq!(score.presence, 2.0 / 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(score.combined, 0.6 * 0.5 + 0.1 * 0.4, epsilon = 1e-6);
}

#[test]
fn test_spelling_does_not_change_scores() {
    let kanakangi = melakarta(1).unwrap();
    let spelled = SwaraProfile::from_sequence(&[S, R1, G1, M1], &ProfileConfig::default());
    let respelled = SwaraProfile::from_sequence(&[S, R1, R2, M1], &ProfileConfig::default());
    let weights = MatchWeights::default();
    assert_eq!(score_raga(&spelled, &kanakangi, &weights), score_raga(&respelled, &kanakangi, &weights));
}

#[test]
fn test_weights_validation() {
    assert!(MatchWeights::default().validate().is_ok());
    let transition_only = MatchWeights { coverage: 0.0, transition: 1.0, presence: 0.0, ..MatchWeights::default() };
    assert!(transition_only.validate().is_ok());

    let invalid = [
        MatchWeights { coverage: -0.1, ..MatchWeights::default() },
        MatchWeights { transition: f32::NAN, ..MatchWeights::default() },
        MatchWeights { coverage: 0.0, transition: 0.0, presence: 0.0, ..MatchWeights::default() },
        MatchWeights { presence_threshold: 0.0, ..MatchWeights::default() },
        MatchWeights { presence_threshold: 1.5, ..MatchWeights::default() },
    ];
    for weights in invalid {
        assert!(matches!(weights.validate(), Err(MatchError::InvalidWeights(_))), "{:?}", weights);
    }
}

#[test]
fn test_results_serialize() {
    let catalog = RagaCatalog::melakarta().unwrap();
    let profile = SwaraProfile::from_sequence(&[S, R2, G3], &ProfileConfig::default());
    let ranked = match_ragas(&profile, &catalog, &MatchWeights::default());
    let json = serde_json::to_value(&ranked[0]).unwrap();
    assert_eq!(json["rank"], 1);
    assert!(json["components"]["coverage"].is_number());
}
