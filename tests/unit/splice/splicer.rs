use super::*;
use crate::foundation::core::{Rotator, Vec3};
use crate::media::status::{ActorStatus, ScenarioHeader, StatusHeader};
use crate::scene::params::Mesh;
use std::collections::BTreeMap;

fn status(tag: f64, frames: usize) -> RunStatus {
    RunStatus {
        header: StatusHeader {
            scenario: ScenarioHeader {
                name: "O1".into(),
                kind: "test".into(),
                is_possible: true,
            },
            static_actors: BTreeMap::new(),
            magic: None,
            max_depth: tag,
            masks: BTreeMap::new(),
        },
        frames: (0..frames)
            .map(|i| {
                let mut f = FrameStatus::new();
                f.insert(
                    "object_1".into(),
                    ActorStatus {
                        location: Vec3::new(tag, i as f64, 0.0),
                        rotation: Rotator::default(),
                        visible: true,
                        hidden: false,
                        mesh: Mesh::Sphere,
                        material: None,
                    },
                );
                f
            })
            .collect(),
    }
}

#[test]
fn single_boundary_splits_at_tick() {
    let a = status(1.0, 8);
    let b = status(2.0, 8);
    let boundary = SpliceBoundary::new(&[3], 8).unwrap();
    let (c, d) = splice_metadata(&a, &b, &boundary).unwrap();

    for i in 0..8 {
        let (c_src, d_src) = if i < 3 { (&a, &b) } else { (&b, &a) };
        assert_eq!(c.frames[i], c_src.frames[i]);
        assert_eq!(d.frames[i], d_src.frames[i]);
    }
    assert!(!c.header.scenario.is_possible);
    assert!(!d.header.scenario.is_possible);
    assert_eq!(c.header.max_depth, 1.0, "header comes from run A");
    assert_eq!(d.header.max_depth, 1.0);
}

#[test]
fn two_boundaries_alternate() {
    let a = status(1.0, 10);
    let b = status(2.0, 10);
    let boundary = SpliceBoundary::new(&[2, 6], 10).unwrap();
    let (c, d) = splice_metadata(&a, &b, &boundary).unwrap();
    assert_eq!(c.frames[1], a.frames[1]);
    assert_eq!(c.frames[4], b.frames[4]);
    assert_eq!(c.frames[8], a.frames[8]);
    assert_eq!(d.frames[1], b.frames[1]);
    assert_eq!(d.frames[4], a.frames[4]);
    assert_eq!(d.frames[8], b.frames[8]);
}

#[test]
fn mismatched_lengths_are_fatal() {
    let boundary = SpliceBoundary::new(&[3], 8).unwrap();
    let err = splice_metadata(&status(1.0, 8), &status(2.0, 7), &boundary).unwrap_err();
    assert!(matches!(err, PhysclipError::LengthMismatch(_)));
}

#[test]
fn media_is_copied_from_the_right_source() {
    let root = std::env::temp_dir().join("physclip_splice_media");
    let _ = std::fs::remove_dir_all(&root);
    let (a, b, c, d) = (root.join("1"), root.join("2"), root.join("3"), root.join("4"));
    for (dir, tag) in [(&a, "A"), (&b, "B")] {
        for category in MEDIA_CATEGORIES {
            std::fs::create_dir_all(dir.join(category)).unwrap();
            for frame in 0..4 {
                std::fs::write(dir.join(frame_file(category, frame)), format!("{tag}{frame}")).unwrap();
            }
        }
    }

    let boundary = SpliceBoundary::new(&[2], 4).unwrap();
    splice_media(&a, &b, &boundary, &[(c.as_path(), Source::A), (d.as_path(), Source::B)]).unwrap();

    let read = |dir: &Path, cat: &str, f: usize| std::fs::read_to_string(dir.join(frame_file(cat, f))).unwrap();
    assert_eq!(read(&c, "scene", 0), "A0");
    assert_eq!(read(&c, "depth", 3), "B3");
    assert_eq!(read(&d, "masks", 1), "B1");
    assert_eq!(read(&d, "scene", 2), "A2");
}

#[test]
fn missing_source_media_is_a_save_failure() {
    let root = std::env::temp_dir().join("physclip_splice_missing");
    let _ = std::fs::remove_dir_all(&root);
    let boundary = SpliceBoundary::new(&[1], 2).unwrap();
    let err = splice_media(
        &root.join("1"),
        &root.join("2"),
        &boundary,
        &[(root.join("3").as_path(), Source::A)],
    )
    .unwrap_err();
    assert!(matches!(err, PhysclipError::MediaSave(_)));
}
