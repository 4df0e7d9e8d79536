use raga_detect::swara::{SwaraError, SwaraLabel, LABEL_COUNT, POSITIONS};
use raga_detect::swara::SwaraLabel::*;

#[test]
fn test_sixteen_labels_cover_twelve_positions() {
    assert_eq!(SwaraLabel::ALL.len(), LABEL_COUNT);
    let mut covered = [false; POSITIONS];
    for label in SwaraLabel::ALL {
        covered[label.position()] = true;
    }
    assert!(covered.iter().all(|&c| c));
}

#[test]
fn test_fixed_offsets() {
    let expected = [
        (S, 0), (R1, 1), (R2, 2), (R3, 3), (G1, 2), (G2, 3), (G3, 4), (M1, 5),
        (M2, 6), (P, 7), (D1, 8), (D2, 9), (D3, 10), (N1, 9), (N2, 10), (N3, 11),
    ];
    for (label, position) in expected {
        assert_eq!(label.position(), position, "{}", label);
    }
}

#[test]
fn test_enharmonic_pairs() {
    assert_eq!(R2.enharmonic(), Some(G1));
    assert_eq!(G2.enharmonic(), Some(R3));
    assert_eq!(N1.enharmonic(), Some(D2));
    assert_eq!(D3.enharmonic(), Some(N2));
    assert_eq!(S.enharmonic(), None);
    assert_eq!(P.enharmonic(), None);
    assert_eq!(SwaraLabel::at_position(2), vec![R2, G1]);
    assert_eq!(SwaraLabel::at_position(7), vec![P]);
    assert!(SwaraLabel::at_position(12).is_empty());
}

#[test]
fn test_canonical_spelling() {
    let canonical: Vec<SwaraLabel> = (0..POSITIONS).map(|p| SwaraLabel::canonical(p).unwrap()).collect();
    assert_eq!(canonical, vec![S, R1, R2, G2, G3, M1, M2, P, D1, D2, N2, N3]);
    assert_eq!(SwaraLabel::canonical(12), Err(SwaraError::InvalidPosition(12)));
}

#[test]
fn test_parse_and_display() {
    assert_eq!("r2".parse::<SwaraLabel>().unwrap(), R2);
    assert_eq!("Sa".parse::<SwaraLabel>().unwrap(), S);
    assert_eq!(" pa ".parse::<SwaraLabel>().unwrap(), P);
    assert_eq!("N3".parse::<SwaraLabel>().unwrap(), N3);
    assert!(matches!("X9".parse::<SwaraLabel>(), Err(SwaraError::UnknownLabel(_))));
    for label in SwaraLabel::ALL {
        assert_eq!(label.to_string().parse::<SwaraLabel>().unwrap(), label);
    }
    assert_eq!(M2.full_name(), "Prati Madhyamam");
}
