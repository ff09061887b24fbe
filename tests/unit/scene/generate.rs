use super::*;
use crate::scene::params::ActorRole;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn same_seed_same_params() {
    let catalog = MaterialCatalog::builtin();
    let generator = SceneGenerator::new(&catalog, 100);
    let class = TestClass::new(true, Motion::Dynamic2);

    let a = generator.test(class, None, &mut ChaCha8Rng::seed_from_u64(7));
    let b = generator.test(class, None, &mut ChaCha8Rng::seed_from_u64(7));
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_scenes_validate_for_every_class() {
    let catalog = MaterialCatalog::builtin();
    let generator = SceneGenerator::new(&catalog, 100);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for occluded in [false, true] {
        for motion in Motion::ALL {
            let p = generator.test(TestClass::new(occluded, motion), None, &mut rng);
            p.validate().unwrap();
            let occluders = p.names_with_role(ActorRole::Occluder).count();
            let expected = match (occluded, motion) {
                (false, _) => 0,
                (true, Motion::Dynamic2) => 2,
                (true, _) => 1,
            };
            assert_eq!(occluders, expected, "{occluded} {motion:?}");
        }
    }
}

#[test]
fn pinned_actor_count_is_honoured() {
    let catalog = MaterialCatalog::builtin();
    let generator = SceneGenerator::new(&catalog, 100);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let p = generator.test(TestClass::new(false, Motion::Static), Some(2), &mut rng);
    assert_eq!(p.names_with_role(ActorRole::Object).count(), 2);
}

#[test]
fn dynamic_objects_are_launched_along_y() {
    let catalog = MaterialCatalog::builtin();
    let generator = SceneGenerator::new(&catalog, 100);
    let p = generator.test(
        TestClass::new(false, Motion::Dynamic1),
        Some(3),
        &mut ChaCha8Rng::seed_from_u64(5),
    );
    for name in p.names_with_role(ActorRole::Object) {
        let a = p.actor(name).unwrap();
        assert!(a.force.y > 0.0);
        assert_eq!(a.location.y, -1200.0);
    }
}

#[test]
fn train_scenes_have_no_magic() {
    let catalog = MaterialCatalog::builtin();
    let generator = SceneGenerator::new(&catalog, 100);
    let p = generator.train(&mut ChaCha8Rng::seed_from_u64(1));
    assert!(p.magic.is_none());
    p.validate().unwrap();
    assert!(p.names_with_role(ActorRole::Object).count() >= 1);
}
