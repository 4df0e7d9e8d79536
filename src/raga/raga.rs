use crate::swara::{SwaraLabel, POSITIONS};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when a raga definition breaks the scale invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RagaError {
    /// Raga name is empty or whitespace.
    #[error("Raga name must not be blank")]
    BlankName,

    /// Arohana or avarohana has no swaras.
    #[error("Raga {0} has an empty arohana or avarohana")]
    EmptyScale(String),

    /// Two different labels occupy the same chromatic position.
    #[error("Raga {name} uses both {first} and {second} at position {position}")]
    DuplicatePosition {
        name: String,
        first: SwaraLabel,
        second: SwaraLabel,
        position: usize,
    },

    /// Melakarta numbers run from 1 to 72.
    #[error("Invalid melakarta number: {0}")]
    InvalidMelakarta(u8),
}

/// A named scale: its ascent (arohana) and descent (avarohana).
///
/// Sequences hold pitch classes only, so the upper Sa that closes a
/// traditional arohana is implied rather than written. Serialized form is
/// `{ name, arohana, avarohana, melakarta? }` and is validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RagaRecord", into = "RagaRecord")]
pub struct Raga {
    name: String,
    arohana: Vec<SwaraLabel>,
    avarohana: Vec<SwaraLabel>,
    melakarta: Option<u8>,
    /// Label used at each chromatic position, if any.
    spelling: [Option<SwaraLabel>; POSITIONS],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RagaRecord {
    name: String,
    arohana: Vec<SwaraLabel>,
    avarohana: Vec<SwaraLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    melakarta: Option<u8>,
}

impl TryFrom<RagaRecord> for Raga {
    type Error = RagaError;

    fn try_from(record: RagaRecord) -> Result<Self, Self::Error> {
        let raga = Raga::new(record.name, record.arohana, record.avarohana)?;
        match record.melakarta {
            Some(number) => raga.with_melakarta(number),
            None => Ok(raga),
        }
    }
}

impl From<Raga> for RagaRecord {
    fn from(raga: Raga) -> Self {
        RagaRecord {
            name: raga.name,
            arohana: raga.arohana,
            avarohana: raga.avarohana,
            melakarta: raga.melakarta,
        }
    }
}

impl Raga {
    /// Builds a raga after checking its scale invariants.
    ///
    /// # Arguments
    /// * `name` - Display name; must not be blank
    /// * `arohana` - Ascending swara sequence, without the closing upper Sa
    /// * `avarohana` - Descending swara sequence, without the opening upper Sa
    ///
    /// # Errors
    /// * `RagaError::BlankName` - If the name is empty
    /// * `RagaError::EmptyScale` - If either sequence is empty
    /// * `RagaError::DuplicatePosition` - If two labels share a chromatic position
    ///
    /// # Examples
    /// ```
    /// use raga_detect::raga::Raga;
    /// use raga_detect::swara::SwaraLabel::*;
    /// let mohanam = Raga::new("Mohanam", vec![S, R2, G3, P, D2], vec![D2, P, G3, R2, S]).unwrap();
    /// assert_eq!(mohanam.positions(), vec![0, 2, 4, 7, 9]);
    /// ```
    pub fn new(
        name: impl Into<String>,
        arohana: Vec<SwaraLabel>,
        avarohana: Vec<SwaraLabel>,
    ) -> Result<Raga, RagaError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RagaError::BlankName);
        }
        if arohana.is_empty() || avarohana.is_empty() {
            return Err(RagaError::EmptyScale(name));
        }

        let mut spelling: [Option<SwaraLabel>; POSITIONS] = [None; POSITIONS];
        for &label in arohana.iter().chain(avarohana.iter()) {
            let position = label.position();
            match spelling[position] {
                Some(existing) if existing != label => {
                    return Err(RagaError::DuplicatePosition {
                        name,
                        first: existing,
                        second: label,
                        position,
                    });
                }
                _ => spelling[position] = Some(label),
            }
        }

        Ok(Raga {
            name,
            arohana,
            avarohana,
            melakarta: None,
            spelling,
        })
    }

    /// Builds a raga whose descent is the exact reverse of its ascent.
    pub fn symmetric(name: impl Into<String>, arohana: Vec<SwaraLabel>) -> Result<Raga, RagaError> {
        let avarohana = arohana.iter().rev().copied().collect();
        Raga::new(name, arohana, avarohana)
    }

    /// Tags the raga with its Melakarta number.
    ///
    /// # Errors
    /// * `RagaError::InvalidMelakarta` - If `number` is not in `1..=72`
    pub fn with_melakarta(mut self, number: u8) -> Result<Raga, RagaError> {
        if !(1..=72).contains(&number) {
            return Err(RagaError::InvalidMelakarta(number));
        }
        self.melakarta = Some(number);
        Ok(self)
    }

    /// Display name, unique within a catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ascending sequence, without the closing upper Sa.
    pub fn arohana(&self) -> &[SwaraLabel] {
        &self.arohana
    }

    /// Descending sequence, without the opening upper Sa.
    pub fn avarohana(&self) -> &[SwaraLabel] {
        &self.avarohana
    }

    /// Melakarta number, for the 72 parent scales.
    pub fn melakarta(&self) -> Option<u8> {
        self.melakarta
    }

    /// The label this raga uses at `position`, if the position is in its scale.
    pub fn label_at(&self, position: usize) -> Option<SwaraLabel> {
        self.spelling.get(position).copied().flatten()
    }

    /// Whether chromatic `position` occurs in the arohana or avarohana.
    pub fn contains_position(&self, position: usize) -> bool {
        self.label_at(position).is_some()
    }

    /// Sorted chromatic positions of arohana ∪ avarohana.
    pub fn positions(&self) -> Vec<usize> {
        (0..POSITIONS).filter(|&p| self.spelling[p].is_some()).collect()
    }

    /// 12-bit mask with bit `p` set for every position in the scale.
    pub fn position_mask(&self) -> u16 {
        self.positions().iter().fold(0u16, |mask, &p| mask | (1 << p))
    }

    /// Whether moving from position `from` to `to` is a step of the arohana or
    /// avarohana. Each sequence wraps at the octave (last swara back to first).
    pub fn is_adjacent(&self, from: usize, to: usize) -> bool {
        let steps_in = |sequence: &[SwaraLabel]| {
            let n = sequence.len();
            n > 1
                && (0..n).any(|i| {
                    sequence[i].position() == from && sequence[(i + 1) % n].position() == to
                })
        };
        steps_in(&self.arohana) || steps_in(&self.avarohana)
    }
}

impl fmt::Display for Raga {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |sequence: &[SwaraLabel]| {
            sequence
                .iter()
                .map(|label| label.abbr())
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(
            f,
            "{} [{} | {}]",
            self.name,
            join(&self.arohana),
            join(&self.avarohana)
        )
    }
}
