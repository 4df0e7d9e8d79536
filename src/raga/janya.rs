use crate::raga::raga::{Raga, RagaError};
use crate::swara::SwaraLabel::*;

/// A handful of widely sung janya ragas, ready for registration in a catalog.
///
/// These are not generated; they are hand-entered scales whose notes are a
/// subset of a Melakarta parent. Bilahari is included as an asymmetric example
/// (pentatonic ascent, full descent).
pub fn janya_ragas() -> Result<Vec<Raga>, RagaError> {
    Ok(vec![
        Raga::new("Mohanam", vec![S, R2, G3, P, D2], vec![D2, P, G3, R2, S])?,
        Raga::new("Hamsadhwani", vec![S, R2, G3, P, N3], vec![N3, P, G3, R2, S])?,
        Raga::new("Hindolam", vec![S, G2, M1, D1, N2], vec![N2, D1, M1, G2, S])?,
        Raga::new("Abhogi", vec![S, R2, G2, M1, D2], vec![D2, M1, G2, R2, S])?,
        Raga::new("Madhyamavati", vec![S, R2, M1, P, N2], vec![N2, P, M1, R2, S])?,
        Raga::new("Bilahari", vec![S, R2, G3, P, D2], vec![N3, D2, P, M1, G3, R2, S])?,
    ])
}
