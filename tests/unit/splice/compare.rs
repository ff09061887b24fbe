use super::*;
use crate::foundation::core::{Rotator, Transform, Vec3};
use crate::run::telemetry::{ActorSample, TelemetryFrame};
use std::collections::BTreeMap;

fn log(samples: &[&[(&str, f64)]]) -> TelemetryLog {
    let mut log = TelemetryLog::new();
    for (tick, frame) in samples.iter().enumerate() {
        let actors: BTreeMap<String, ActorSample> = frame
            .iter()
            .map(|&(name, y)| {
                (
                    name.to_string(),
                    ActorSample {
                        transform: Transform::new(Vec3::new(0.0, y, 0.0), Rotator::default()),
                        visible: true,
                    },
                )
            })
            .collect();
        log.push(TelemetryFrame { tick, actors }).unwrap();
    }
    log
}

#[test]
fn compare_is_symmetric() {
    let a = log(&[&[("o1", 1.0), ("o2", 2.0)], &[("o1", 1.0), ("o2", 2.5)], &[("o1", 0.0)]]);
    let b = log(&[&[("o1", 1.0), ("o2", 2.0)], &[("o1", 1.0), ("o2", 2.0)], &[("o1", -0.0)]]);
    for frame in 0..4 {
        assert_eq!(compare_frame(&a, &b, frame), compare_frame(&b, &a, frame));
    }
    assert!(compare_frame(&a, &b, 0));
    assert!(!compare_frame(&a, &b, 1));
    assert!(!compare_frame(&a, &b, 2), "signed zero differs bitwise");
    assert!(!compare_frame(&a, &b, 3), "missing frames never match");
}

#[test]
fn excluded_actor_is_ignored() {
    let a = log(&[&[("o1", 1.0), ("magic", 5.0)]]);
    let b = log(&[&[("o1", 1.0), ("magic", 9.0)]]);
    assert!(!compare_frame(&a, &b, 0));
    assert!(compare_frame_excluding(&a, &b, 0, Some("magic")));
    assert!(compare_frame_excluding(&b, &a, 0, Some("magic")));
}

#[test]
fn different_actor_sets_do_not_match() {
    let a = log(&[&[("o1", 1.0)]]);
    let b = log(&[&[("o1", 1.0), ("o2", 1.0)]]);
    assert!(!compare_frame(&a, &b, 0));
}
