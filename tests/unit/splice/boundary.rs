use super::*;

#[test]
fn single_tick_has_two_segments() {
    let b = SpliceBoundary::new(&[4], 8).unwrap();
    assert_eq!(b.segments(Source::A), vec![(0..4, Source::A), (4..8, Source::B)]);
    assert_eq!(b.segments(Source::B), vec![(0..4, Source::B), (4..8, Source::A)]);
}

#[test]
fn two_ticks_alternate_three_segments() {
    let b = SpliceBoundary::new(&[2, 6], 10).unwrap();
    let picks: Vec<Source> = (0..10).map(|f| b.pick(Source::A, f)).collect();
    use Source::{A, B};
    assert_eq!(picks, vec![A, A, B, B, B, B, A, A, A, A]);
    assert_eq!(b.segments(Source::B)[1], (2..6, Source::A));
}

#[test]
fn invalid_boundaries_are_rejected() {
    assert!(SpliceBoundary::new(&[], 10).is_err());
    assert!(SpliceBoundary::new(&[5, 5], 10).is_err());
    assert!(SpliceBoundary::new(&[6, 2], 10).is_err());
    assert!(SpliceBoundary::new(&[10], 10).is_err());
    assert!(SpliceBoundary::new(&[0], 10).is_ok());
}
