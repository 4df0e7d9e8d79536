use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of chromatic positions in one octave of the swara space.
pub const POSITIONS: usize = 12;

/// Number of named swara labels, enharmonic spellings included.
pub const LABEL_COUNT: usize = 16;

/// Errors raised when parsing or constructing swara labels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwaraError {
    /// The text does not name one of the sixteen swaras.
    #[error("Unknown swara label: {0}")]
    UnknownLabel(String),

    /// A chromatic position outside `0..12` was requested.
    #[error("Invalid swara position: {0}")]
    InvalidPosition(usize),
}

/// One of the sixteen Carnatic swara names.
///
/// Each label sits at a fixed semitone offset from Sa. Four offsets carry two
/// names (R2/G1, R3/G2, D2/N1, D3/N2); which spelling applies depends on the
/// raga, so the offset alone never decides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SwaraLabel {
    S,
    R1,
    R2,
    R3,
    G1,
    G2,
    G3,
    M1,
    M2,
    P,
    D1,
    D2,
    D3,
    N1,
    N2,
    N3,
}

/// Spelling used for each position when no raga context is available.
///
/// For every enharmonic pair this is the name the larger share of the 72
/// Melakartas uses (R2 over G1, G2 over R3, D2 over N1, N2 over D3).
const CANONICAL: [SwaraLabel; POSITIONS] = [
    SwaraLabel::S,
    SwaraLabel::R1,
    SwaraLabel::R2,
    SwaraLabel::G2,
    SwaraLabel::G3,
    SwaraLabel::M1,
    SwaraLabel::M2,
    SwaraLabel::P,
    SwaraLabel::D1,
    SwaraLabel::D2,
    SwaraLabel::N2,
    SwaraLabel::N3,
];

impl SwaraLabel {
    /// All sixteen labels in declaration order, matching [`SwaraLabel::index`].
    pub const ALL: [SwaraLabel; LABEL_COUNT] = [
        SwaraLabel::S,
        SwaraLabel::R1,
        SwaraLabel::R2,
        SwaraLabel::R3,
        SwaraLabel::G1,
        SwaraLabel::G2,
        SwaraLabel::G3,
        SwaraLabel::M1,
        SwaraLabel::M2,
        SwaraLabel::P,
        SwaraLabel::D1,
        SwaraLabel::D2,
        SwaraLabel::D3,
        SwaraLabel::N1,
        SwaraLabel::N2,
        SwaraLabel::N3,
    ];

    /// Semitone offset from Sa, in `0..12`.
    pub const fn position(self) -> usize {
        match self {
            SwaraLabel::S => 0,
            SwaraLabel::R1 => 1,
            SwaraLabel::R2 | SwaraLabel::G1 => 2,
            SwaraLabel::R3 | SwaraLabel::G2 => 3,
            SwaraLabel::G3 => 4,
            SwaraLabel::M1 => 5,
            SwaraLabel::M2 => 6,
            SwaraLabel::P => 7,
            SwaraLabel::D1 => 8,
            SwaraLabel::D2 | SwaraLabel::N1 => 9,
            SwaraLabel::D3 | SwaraLabel::N2 => 10,
            SwaraLabel::N3 => 11,
        }
    }

    /// Dense index of the label in [`SwaraLabel::ALL`], used for array storage.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Label stored at `index` in [`SwaraLabel::ALL`].
    pub fn from_index(index: usize) -> Option<SwaraLabel> {
        Self::ALL.get(index).copied()
    }

    /// Default spelling for a chromatic position.
    ///
    /// # Errors
    /// * `SwaraError::InvalidPosition` - If `position` is not in `0..12`.
    pub fn canonical(position: usize) -> Result<SwaraLabel, SwaraError> {
        CANONICAL
            .get(position)
            .copied()
            .ok_or(SwaraError::InvalidPosition(position))
    }

    /// Every label sitting at `position`; one or two entries, empty when out of range.
    pub fn at_position(position: usize) -> Vec<SwaraLabel> {
        Self::ALL
            .iter()
            .copied()
            .filter(|label| label.position() == position)
            .collect()
    }

    /// The other spelling of the same position, if there is one.
    pub fn enharmonic(self) -> Option<SwaraLabel> {
        Self::ALL
            .iter()
            .copied()
            .find(|&other| other != self && other.position() == self.position())
    }

    /// Abbreviated name, e.g. `"R2"`.
    pub const fn abbr(self) -> &'static str {
        match self {
            SwaraLabel::S => "S",
            SwaraLabel::R1 => "R1",
            SwaraLabel::R2 => "R2",
            SwaraLabel::R3 => "R3",
            SwaraLabel::G1 => "G1",
            SwaraLabel::G2 => "G2",
            SwaraLabel::G3 => "G3",
            SwaraLabel::M1 => "M1",
            SwaraLabel::M2 => "M2",
            SwaraLabel::P => "P",
            SwaraLabel::D1 => "D1",
            SwaraLabel::D2 => "D2",
            SwaraLabel::D3 => "D3",
            SwaraLabel::N1 => "N1",
            SwaraLabel::N2 => "N2",
            SwaraLabel::N3 => "N3",
        }
    }

    /// Traditional long name, e.g. `"Chatushruti Rishabham"`.
    pub const fn full_name(self) -> &'static str {
        match self {
            SwaraLabel::S => "Shadjam",
            SwaraLabel::R1 => "Shuddha Rishabham",
            SwaraLabel::R2 => "Chatushruti Rishabham",
            SwaraLabel::R3 => "Shatshruti Rishabham",
            SwaraLabel::G1 => "Shuddha Gandharam",
            SwaraLabel::G2 => "Sadharana Gandharam",
            SwaraLabel::G3 => "Antara Gandharam",
            SwaraLabel::M1 => "Shuddha Madhyamam",
            SwaraLabel::M2 => "Prati Madhyamam",
            SwaraLabel::P => "Panchamam",
            SwaraLabel::D1 => "Shuddha Dhaivatam",
            SwaraLabel::D2 => "Chatushruti Dhaivatam",
            SwaraLabel::D3 => "Shatshruti Dhaivatam",
            SwaraLabel::N1 => "Shuddha Nishadam",
            SwaraLabel::N2 => "Kaisiki Nishadam",
            SwaraLabel::N3 => "Kakali Nishadam",
        }
    }
}

impl fmt::Display for SwaraLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

impl FromStr for SwaraLabel {
    type Err = SwaraError;

    /// Parses abbreviations case-insensitively; `"Sa"` and `"Pa"` are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let label = match upper.as_str() {
            "S" | "SA" => SwaraLabel::S,
            "P" | "PA" => SwaraLabel::P,
            other => SwaraLabel::ALL
                .iter()
                .copied()
                .find(|label| label.abbr() == other)
                .ok_or_else(|| SwaraError::UnknownLabel(s.to_string()))?,
        };
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_table_order() {
        for (i, label) in SwaraLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(SwaraLabel::from_index(i), Some(*label));
        }
    }

    #[test]
    fn canonical_sits_at_its_position() {
        for position in 0..POSITIONS {
            assert_eq!(SwaraLabel::canonical(position).unwrap().position(), position);
        }
    }
}
