use crate::raga::catalog::CatalogError;
use crate::raga::raga::Raga;
use crate::swara::SwaraLabel::{self, *};
use std::collections::HashMap;
use tracing::debug;

/// Number of Melakarta parent scales.
pub const MELAKARTA_COUNT: usize = 72;

/// Traditional names in Melakarta order (index 0 is raga number 1).
pub const MELAKARTA_NAMES: [&str; MELAKARTA_COUNT] = [
    "Kanakangi", "Ratnangi", "Ganamurti", "Vanaspati", "Manavati", "Tanarupi",
    "Senavati", "Hanumatodi", "Dhenuka", "Natakapriya", "Kokilapriya", "Rupavati",
    "Gayakapriya", "Vakulabharanam", "Mayamalavagowla", "Chakravakam", "Suryakantam", "Hatakambari",
    "Jhankaradhwani", "Natabhairavi", "Keeravani", "Kharaharapriya", "Gourimanohari", "Varunapriya",
    "Mararanjani", "Charukesi", "Sarasangi", "Harikambhoji", "Dheerasankarabharanam", "Naganandini",
    "Yagapriya", "Ragavardhini", "Gangeyabhushani", "Vagadheeswari", "Shulini", "Chalanata",
    "Salagam", "Jalarnavam", "Jhalavarali", "Navaneetam", "Pavani", "Raghupriya",
    "Gavambodhi", "Bhavapriya", "Shubhapantuvarali", "Shadvidamargini", "Suvarnangi", "Divyamani",
    "Dhavalambari", "Namanarayani", "Kamavardhini", "Ramapriya", "Gamanashrama", "Vishwambari",
    "Shamalangi", "Shanmukhapriya", "Simhendramadhyamam", "Hemavati", "Dharmavati", "Neetimati",
    "Kantamani", "Rishabhapriya", "Latangi", "Vachaspati", "Mechakalyani", "Chitrambari",
    "Sucharitra", "Jyotiswarupini", "Dhatuvardhani", "Nasikabhushani", "Kosalam", "Rasikapriya",
];

/// Alternative spellings and common names, each mapped to a Melakarta number.
///
/// Bhairavi is a janya of Natabhairavi and resolves to its parent scale.
pub const MELAKARTA_ALIASES: [(&str, u8); 16] = [
    ("Hanumattodi", 8),
    ("Todi", 8),
    ("Mayamalavagaula", 15),
    ("Bhairavi", 20),
    ("Kiravani", 21),
    ("Shankarabharanam", 29),
    ("Sankarabharanam", 29),
    ("Dhirasankarabharanam", 29),
    ("Ragavardhani", 32),
    ("Kamavardhani", 51),
    ("Pantuvarali", 51),
    ("Viswambari", 54),
    ("Shyamalangi", 55),
    ("Kalyani", 65),
    ("Mecakalyani", 65),
    ("Vachaspathi", 64),
];

/// Chakra (group of six) names, in order.
pub const CHAKRA_NAMES: [&str; 12] = [
    "Indu", "Netra", "Agni", "Veda", "Bana", "Rutu",
    "Rishi", "Vasu", "Brahma", "Disi", "Rudra", "Aditya",
];

/// Valid (Ri, Ga) choices of the lower tetrachord, one per chakra.
const LOWER: [(SwaraLabel, SwaraLabel); 6] = [(R1, G1), (R1, G2), (R1, G3), (R2, G2), (R2, G3), (R3, G3)];

/// Valid (Dha, Ni) choices of the upper tetrachord, one per position in a chakra.
const UPPER: [(SwaraLabel, SwaraLabel); 6] = [(D1, N1), (D1, N2), (D1, N3), (D2, N2), (D2, N3), (D3, N3)];

/// Ascending scale of Melakarta `number` (1-72), or `None` outside that range.
///
/// # Examples
/// ```
/// use raga_detect::raga::melakarta::melakarta_arohana;
/// use raga_detect::swara::SwaraLabel::*;
/// assert_eq!(melakarta_arohana(15), Some([S, R1, G3, M1, P, D1, N3]));
/// ```
pub fn melakarta_arohana(number: u8) -> Option<[SwaraLabel; 7]> {
    if !(1..=72).contains(&number) {
        return None;
    }
    let m = (number as usize - 1) % 36;
    let ma = if number <= 36 { M1 } else { M2 };
    let (ri, ga) = LOWER[m / 6];
    let (dha, ni) = UPPER[m % 6];
    Some([S, ri, ga, ma, P, dha, ni])
}

/// Builds Melakarta `number` as a [`Raga`].
///
/// # Errors
/// * `CatalogError::Raga` - If `number` is not in `1..=72`
pub fn melakarta(number: u8) -> Result<Raga, CatalogError> {
    let arohana = melakarta_arohana(number)
        .ok_or(crate::raga::RagaError::InvalidMelakarta(number))?;
    let name = MELAKARTA_NAMES[number as usize - 1];
    Ok(Raga::symmetric(name, arohana.to_vec())?.with_melakarta(number)?)
}

/// Melakarta number for a traditional name or a known alias, ignoring case.
///
/// # Examples
/// ```
/// use raga_detect::raga::melakarta_number;
/// assert_eq!(melakarta_number("Mechakalyani"), Some(65));
/// assert_eq!(melakarta_number("kalyani"), Some(65));
/// assert_eq!(melakarta_number("Hamsadhwani"), None);
/// ```
pub fn melakarta_number(name: &str) -> Option<u8> {
    let name = name.trim();
    MELAKARTA_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(|index| index as u8 + 1)
        .or_else(|| {
            MELAKARTA_ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                .map(|&(_, number)| number)
        })
}

/// Looks up a Melakarta by name or alias, ignoring case.
pub fn melakarta_by_name(name: &str) -> Option<Raga> {
    melakarta(melakarta_number(name)?).ok()
}

/// Chakra name for Melakarta `number`, or `None` outside `1..=72`.
pub fn chakra_name(number: u8) -> Option<&'static str> {
    if !(1..=72).contains(&number) {
        return None;
    }
    Some(CHAKRA_NAMES[(number as usize - 1) / 6])
}

/// Generates all 72 Melakarta ragas in numeric order.
///
/// The combinatorics are checked on the way out: exactly 72 scales, no two
/// sharing a pitch-class pattern. A failure here is a defect in the tables,
/// not a runtime condition.
///
/// # Errors
/// * `CatalogError::Consistency` - If the generated set breaks either check
pub fn generate_melakartas() -> Result<Vec<Raga>, CatalogError> {
    let ragas = (1..=MELAKARTA_COUNT as u8)
        .map(melakarta)
        .collect::<Result<Vec<_>, _>>()?;
    check_melakartas(&ragas)?;
    debug!(count = ragas.len(), "generated melakarta scales");
    Ok(ragas)
}

/// Verifies count and pairwise-distinct pitch-class patterns.
pub fn check_melakartas(ragas: &[Raga]) -> Result<(), CatalogError> {
    if ragas.len() != MELAKARTA_COUNT {
        return Err(CatalogError::Consistency(format!(
            "expected {} melakartas, generated {}",
            MELAKARTA_COUNT,
            ragas.len()
        )));
    }

    let mut seen: HashMap<u16, &str> = HashMap::with_capacity(MELAKARTA_COUNT);
    for raga in ragas {
        if raga.positions().len() != 7 {
            return Err(CatalogError::Consistency(format!(
                "{} has {} distinct positions",
                raga.name(),
                raga.positions().len()
            )));
        }
        if let Some(previous) = seen.insert(raga.position_mask(), raga.name()) {
            return Err(CatalogError::Consistency(format!(
                "{} and {} share the same scale",
                previous,
                raga.name()
            )));
        }
    }
    Ok(())
}
