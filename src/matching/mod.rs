pub mod matcher;

pub use matcher::{match_ragas, score_raga, MatchError, MatchResult, MatchWeights, RagaScore};
