use super::*;
use crate::scene::class::{Motion, TestClass};
use crate::scene::generate::SceneGenerator;
use crate::scene::materials::MaterialCatalog;
use crate::scene::params::ActorParams;
use crate::world::headless::HeadlessWorld;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn scene() -> SceneParams {
    let catalog = MaterialCatalog::builtin();
    SceneGenerator::new(&catalog, 100).test(
        TestClass::new(true, Motion::Static),
        Some(2),
        &mut ChaCha8Rng::seed_from_u64(9),
    )
}

#[test]
fn teardown_is_idempotent() {
    let mut world = HeadlessWorld::new();
    let mut run = Run::new(0, scene());
    run.spawn(&mut world).unwrap();
    for _ in 0..5 {
        run.tick(&mut world).unwrap();
    }
    assert!(world.live_actors() > 0);

    let first = run.teardown(&mut world).clone();
    assert_eq!(world.live_actors(), 0);
    let second = run.teardown(&mut world).clone();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
    assert!(run.is_torn_down());
}

#[test]
fn failed_spawn_leaves_no_actors_behind() {
    let mut world = HeadlessWorld::new();
    world.reject_spawn_of("object_2");
    let mut run = Run::new(0, scene());
    let err = run.spawn(&mut world).unwrap_err();
    assert!(matches!(err, PhysclipError::Spawn(_)));
    assert_eq!(world.live_actors(), 0);
    assert!(run.actors().is_none());
}

#[test]
fn ticks_before_spawn_record_nothing() {
    let mut world = HeadlessWorld::new();
    let mut run = Run::new(0, scene());
    run.tick(&mut world).unwrap();
    assert!(run.log().is_empty());
}

#[test]
fn overlapping_objects_invalidate_the_run() {
    let mut p = scene();
    let at = p.actor("object_1").unwrap().location;
    p.actor_mut("object_2").unwrap().location = at;

    let mut world = HeadlessWorld::new();
    let mut run = Run::new(0, p);
    run.spawn(&mut world).unwrap();
    run.tick(&mut world).unwrap();
    assert!(!run.is_valid());
    assert!(run.invalid_reason().unwrap().contains("overlaps"));
}

#[test]
fn destroyed_actor_invalidates_the_run() {
    let mut world = HeadlessWorld::new();
    let mut run = Run::new(0, scene());
    let h = run.spawn(&mut world).unwrap().get("object_1").unwrap();
    world.destroy_actor(h).unwrap();
    run.tick(&mut world).unwrap();
    assert!(!run.is_valid());
    assert!(run.log().is_empty());
}

#[test]
fn hiding_the_magic_actor_removes_it_from_frame() {
    let mut world = HeadlessWorld::new();
    let mut p = scene();
    p.actors.retain(|_, a| a.role() != ActorRole::Occluder);
    let mut run = Run::new(0, p);
    run.spawn(&mut world).unwrap();
    run.tick(&mut world).unwrap();
    assert!(run.magic_visible());

    run.set_magic_hidden(&mut world, true).unwrap();
    run.tick(&mut world).unwrap();
    assert!(!run.magic_visible());
    assert!(run.magic_hidden());

    let mut saver = Saver::dry();
    run.capture(&world, &mut saver).unwrap();
    assert_eq!(saver.captured_frames(), 1);
}

#[test]
fn camera_is_always_ignored() {
    let mut world = HeadlessWorld::new();
    let mut p = SceneParams::default();
    p.insert(
        "camera",
        ActorParams::new(ActorKind::Camera {
            field_of_view: 90.0,
            aspect_ratio: 1.0,
        }),
    );
    let mut run = Run::new(0, p);
    let table = run.spawn(&mut world).unwrap();
    assert_eq!(table.always_ignored(), &[table.camera().unwrap()]);
}

/// Refuses to destroy the first actor it spawned.
#[derive(Debug, Default)]
struct StickyWorld {
    inner: HeadlessWorld,
    refused: usize,
}

impl World for StickyWorld {
    fn spawn_actor(&mut self, name: &str, params: &ActorParams) -> PhysclipResult<ActorHandle> {
        self.inner.spawn_actor(name, params)
    }
    fn destroy_actor(&mut self, handle: ActorHandle) -> PhysclipResult<()> {
        if handle.0 == 0 {
            self.refused += 1;
            return Err(PhysclipError::invalid_run("actor is stuck"));
        }
        self.inner.destroy_actor(handle)
    }
    fn transform(&self, handle: ActorHandle) -> PhysclipResult<crate::foundation::core::Transform> {
        self.inner.transform(handle)
    }
    fn is_visible_in_frame(&self, handle: ActorHandle, ignored: &[ActorHandle]) -> PhysclipResult<bool> {
        self.inner.is_visible_in_frame(handle, ignored)
    }
    fn apply_force(&mut self, handle: ActorHandle, force: Vec3) -> PhysclipResult<()> {
        self.inner.apply_force(handle, force)
    }
    fn set_paused(&mut self, paused: bool) {
        self.inner.set_paused(paused)
    }
    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }
    fn advance(&mut self) {
        self.inner.advance()
    }
    fn set_hidden(&mut self, handle: ActorHandle, hidden: bool) -> PhysclipResult<()> {
        self.inner.set_hidden(handle, hidden)
    }
    fn set_mesh(&mut self, handle: ActorHandle, mesh: Mesh) -> PhysclipResult<()> {
        self.inner.set_mesh(handle, mesh)
    }
    fn set_location(&mut self, handle: ActorHandle, location: Vec3) -> PhysclipResult<()> {
        self.inner.set_location(handle, location)
    }
}

#[test]
fn failed_cleanup_keeps_the_spawn_error() {
    let mut world = StickyWorld::default();
    world.inner.reject_spawn_of("object_2");
    let mut run = Run::new(0, scene());
    let err = run.spawn(&mut world).unwrap_err();
    assert!(matches!(err, PhysclipError::Spawn(_)), "{err}");
    assert_eq!(world.refused, 1);
    // Every other actor spawned before the failure is gone.
    assert_eq!(world.inner.live_actors(), 1);
}
