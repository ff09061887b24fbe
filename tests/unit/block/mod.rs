use super::*;
use crate::scene::class::Motion;
use crate::scene::generate::SceneGenerator;
use crate::scene::materials::MaterialCatalog;
use crate::world::headless::HeadlessWorld;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_scene(block: &dyn Block, class: TestClass, seed: u64) -> SceneParams {
    let catalog = MaterialCatalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut p = SceneGenerator::new(&catalog, 100).test(class, None, &mut rng);
    block.customize_test(&mut p, class, &mut rng);
    p
}

#[test]
fn block_names_parse_with_legacy_prefix() {
    assert_eq!("O3".parse::<BlockId>().unwrap(), BlockId::O3);
    assert_eq!("scenario_O5".parse::<BlockId>().unwrap(), BlockId::O5);
    assert!("O9".parse::<BlockId>().is_err());
    for id in BlockId::ALL {
        assert_eq!(id.block().id(), id);
    }
}

#[test]
fn configuration_b_hides_the_magic_actor_for_o1() {
    let block = BlockId::O1.block();
    let p = test_scene(block.as_ref(), TestClass::new(false, Motion::Static), 1);
    let a = block.configure(&p, Configuration::A).unwrap();
    let b = block.configure(&p, Configuration::B).unwrap();
    let magic = p.magic_actor_name().unwrap();
    assert_eq!(a, p);
    assert!(!a.actor(magic).unwrap().hidden);
    assert!(b.actor(magic).unwrap().hidden);
}

#[test]
fn o2_alternative_mesh_differs() {
    let block = BlockId::O2.block();
    for seed in 0..10 {
        let p = test_scene(block.as_ref(), TestClass::new(true, Motion::Dynamic1), seed);
        let magic = p.magic.as_ref().unwrap();
        let MagicVariant::Mesh { alternative } = magic.variant else {
            panic!("O2 must use a mesh variant");
        };
        assert_ne!(p.actor(&magic.actor).unwrap().mesh, alternative);
        let b = block.configure(&p, Configuration::B).unwrap();
        assert_eq!(b.actor(&magic.actor).unwrap().mesh, alternative);
    }
}

#[test]
fn o4_pulls_the_camera_back_and_halves_the_launch() {
    let block = BlockId::O4.block();
    let p = test_scene(block.as_ref(), TestClass::new(false, Motion::Dynamic1), 3);
    let camera = p.names_with_role(crate::scene::params::ActorRole::Camera).next().unwrap();
    assert_eq!(p.actor(camera).unwrap().location.x, -1000.0);

    let magic = p.magic_actor_name().unwrap();
    let b = block.configure(&p, Configuration::B).unwrap();
    let fa = p.actor(magic).unwrap().force;
    let fb = b.actor(magic).unwrap().force;
    assert_eq!(fb, fa * 0.5);
    assert!(!block.compares_magic_actor());
}

#[test]
fn trick_phases_go_to_b_and_back() {
    let block = BlockId::O2.block();
    let p = test_scene(block.as_ref(), TestClass::new(false, Motion::Dynamic2), 6);
    let original = p.actor(p.magic_actor_name().unwrap()).unwrap().mesh;
    let MagicVariant::Mesh { alternative } = p.magic.as_ref().unwrap().variant else {
        panic!("O2 must use a mesh variant");
    };

    let mut world = HeadlessWorld::new();
    let mut run = Run::new(2, p.clone());
    run.spawn(&mut world).unwrap();
    block.apply_trick(&p, &mut run, &mut world, 0).unwrap();
    assert_eq!(run.magic_mesh(), Some(alternative));
    block.apply_trick(&p, &mut run, &mut world, 1).unwrap();
    assert_eq!(run.magic_mesh(), Some(original));
}

#[test]
fn configure_b_without_magic_fails() {
    let block = BlockId::O1.block();
    let catalog = MaterialCatalog::builtin();
    let p = SceneGenerator::new(&catalog, 100).train(&mut ChaCha8Rng::seed_from_u64(0));
    assert!(block.configure(&p, Configuration::B).is_err());
    assert!(block.configure(&p, Configuration::A).is_ok());
}

#[test]
fn o4_widens_occluders_of_two_trick_occluded_scenes() {
    let block = BlockId::O4.block();
    let p = test_scene(block.as_ref(), TestClass::new(true, Motion::Dynamic2), 4);
    let left = p.actor("occluder_1").unwrap();
    let right = p.actor("occluder_2").unwrap();
    assert!(left.location.y < 0.0 && right.location.y > 0.0);
    // Inner edges leave a narrow gap around the middle of the view.
    let left_edge = left.location.y + 200.0 * left.scale.y;
    let right_edge = right.location.y - 200.0 * right.scale.y;
    assert!(left_edge < right_edge);
    assert!(right_edge - left_edge <= 100.0);

    let single = test_scene(block.as_ref(), TestClass::new(true, Motion::Dynamic1), 4);
    assert_eq!(single.actor("occluder_1").unwrap().scale.y, 1.0);
}

#[test]
fn o5_raises_occluders_of_dynamic_occluded_scenes() {
    let block = BlockId::O5.block();
    let p = test_scene(block.as_ref(), TestClass::new(true, Motion::Dynamic2), 2);
    let occluders: Vec<_> = p.names_with_role(crate::scene::params::ActorRole::Occluder).collect();
    assert_eq!(occluders.len(), 2);
    for name in occluders {
        assert!(p.actor(name).unwrap().scale.z > 2.0);
    }
}
