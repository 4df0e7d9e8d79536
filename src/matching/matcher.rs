use crate::features::SwaraProfile;
use crate::raga::{Raga, RagaCatalog};
use crate::swara::POSITIONS;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid match weight: {0}")]
    InvalidWeights(String),
}

/// Weights of the three per-raga scores.
///
/// Coverage (scale membership) carries the most weight; transition
/// consistency separates ragas that share a swara set; presence rewards
/// scales whose notes are actually heard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub coverage: f32,
    pub transition: f32,
    pub presence: f32,
    /// Minimum histogram share for a position to count as heard.
    pub presence_threshold: f32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            coverage: 0.6,
            transition: 0.3,
            presence: 0.1,
            presence_threshold: 0.01,
        }
    }
}

impl MatchWeights {
    /// # Errors
    /// * `MatchError::InvalidWeights` - On a negative or non-finite weight, all-zero
    ///   weights, or a presence threshold outside `(0, 1]`
    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, value) in [
            ("coverage", self.coverage),
            ("transition", self.transition),
            ("presence", self.presence),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MatchError::InvalidWeights(format!("{} = {}", name, value)));
            }
        }
        if self.coverage + self.transition + self.presence <= 0.0 {
            return Err(MatchError::InvalidWeights("all weights are zero".to_string()));
        }
        if !(self.presence_threshold > 0.0 && self.presence_threshold <= 1.0) {
            return Err(MatchError::InvalidWeights(format!(
                "presence_threshold = {}",
                self.presence_threshold
            )));
        }
        Ok(())
    }
}

/// Component scores of one raga against one profile, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RagaScore {
    /// Histogram mass on the raga's positions.
    pub coverage: f32,
    /// Transition mass on steps of the arohana or avarohana.
    pub transition: f32,
    /// Share of the raga's positions that were heard.
    pub presence: f32,
    /// Weighted sum of the three.
    pub combined: f32,
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub raga_name: String,
    pub score: f32,
    /// 1-based rank, 1 is the most likely raga.
    pub rank: usize,
    pub melakarta: Option<u8>,
    pub components: RagaScore,
}

/// Scores a single raga. Membership is compared by chromatic position, so
/// enharmonic spelling (R2 vs G1, ...) never changes the result.
pub fn score_raga(profile: &SwaraProfile, raga: &Raga, weights: &MatchWeights) -> RagaScore {
    if profile.is_empty() {
        return RagaScore::default();
    }

    let histogram = profile.position_histogram();
    let coverage: f32 = (0..POSITIONS)
        .filter(|&p| raga.contains_position(p))
        .map(|p| histogram[p])
        .sum();

    let transition = if profile.transition_count() == 0 {
        0.0
    } else {
        let transitions = profile.position_transitions();
        let mut consistent = 0.0;
        for from in 0..POSITIONS {
            for to in 0..POSITIONS {
                let mass = transitions[[from, to]];
                if mass > 0.0 && raga.is_adjacent(from, to) {
                    consistent += mass;
                }
            }
        }
        consistent
    };

    let positions = raga.positions();
    let heard = positions
        .iter()
        .filter(|&&p| histogram[p] >= weights.presence_threshold)
        .count();
    let presence = if positions.is_empty() { 0.0 } else { heard as f32 / positions.len() as f32 };

    let coverage = coverage.clamp(0.0, 1.0);
    let transition = transition.clamp(0.0, 1.0);
    RagaScore {
        coverage,
        transition,
        presence,
        combined: weights.coverage * coverage + weights.transition * transition + weights.presence * presence,
    }
}

/// Ranks every raga in `catalog` against `profile`, most likely first.
///
/// Ties on score are broken by raga name so the ranking is deterministic. An
/// empty profile scores 0 against everything; callers should read that as
/// "not enough data" rather than as a result.
///
/// # Examples
/// ```
/// use raga_detect::features::{ProfileConfig, SwaraProfile};
/// use raga_detect::matching::{match_ragas, MatchWeights};
/// use raga_detect::raga::{melakarta, RagaCatalog};
/// let catalog = RagaCatalog::melakarta().unwrap();
/// let kalyani = melakarta(65).unwrap();
/// let profile = SwaraProfile::from_sequence(kalyani.arohana(), &ProfileConfig::default());
/// let ranked = match_ragas(&profile, &catalog, &MatchWeights::default());
/// assert_eq!(ranked[0].raga_name, "Mechakalyani");
/// ```
pub fn match_ragas(profile: &SwaraProfile, catalog: &RagaCatalog, weights: &MatchWeights) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = catalog
        .iter()
        .map(|raga| {
            let components = score_raga(profile, raga, weights);
            MatchResult {
                raga_name: raga.name().to_string(),
                score: components.combined,
                rank: 0,
                melakarta: raga.melakarta(),
                components,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.raga_name.cmp(&b.raga_name))
    });
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = i + 1;
    }

    if let Some(top) = results.first() {
        debug!(raga = %top.raga_name, score = top.score, candidates = results.len(), "ragas ranked");
    }
    results
}
