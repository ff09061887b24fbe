use super::*;
use crate::scene::class::{Motion, TestClass};

#[test]
fn protocol_follows_trick_count() {
    assert_eq!(Protocol::for_kind(ScenarioKind::Train), Protocol::Train);
    for occluded in [false, true] {
        for motion in Motion::ALL {
            let expected = if motion == Motion::Dynamic2 {
                Protocol::FullMagic
            } else {
                Protocol::MirrorMagic
            };
            let kind = ScenarioKind::Test(TestClass::new(occluded, motion));
            assert_eq!(Protocol::for_kind(kind), expected, "{kind}");
        }
    }
}

#[test]
fn run_counts() {
    assert_eq!((Protocol::Train.real_runs(), Protocol::Train.total_runs()), (1, 1));
    assert_eq!((Protocol::MirrorMagic.real_runs(), Protocol::MirrorMagic.total_runs()), (2, 4));
    assert_eq!((Protocol::FullMagic.real_runs(), Protocol::FullMagic.total_runs()), (3, 4));
    assert!(!Protocol::MirrorMagic.plays(2));
    assert!(Protocol::FullMagic.plays(2));
    assert!(!Protocol::FullMagic.plays(3));
}

#[test]
fn only_the_full_trick_run_is_impossible_and_real() {
    let real_impossible: Vec<(Protocol, usize)> =
        [Protocol::Train, Protocol::MirrorMagic, Protocol::FullMagic]
            .into_iter()
            .flat_map(|p| (0..p.real_runs()).map(move |i| (p, i)))
            .filter(|&(p, i)| !p.is_possible(i))
            .collect();
    assert_eq!(real_impossible, vec![(Protocol::FullMagic, 2)]);
    assert!(Protocol::FullMagic.applies_trick(2));
    assert!(!Protocol::MirrorMagic.applies_trick(2));
}

#[test]
fn observers_use_both_configurations() {
    for p in [Protocol::MirrorMagic, Protocol::FullMagic] {
        assert!(p.is_observer(0) && p.is_observer(1) && !p.is_observer(2));
        assert_eq!(p.configuration(0), Configuration::A);
        assert_eq!(p.configuration(1), Configuration::B);
        assert!(p.resolves_ticks_after(1));
    }
    assert_eq!(Protocol::FullMagic.configuration(2), Configuration::A);
    assert!(!Protocol::Train.is_observer(0));
    assert!(!Protocol::Train.resolves_ticks_after(1));
}
