use super::*;

fn camera() -> ActorParams {
    ActorParams::new(ActorKind::Camera {
        field_of_view: 90.0,
        aspect_ratio: 1.0,
    })
    .with_location(Vec3::new(0.0, 0.0, 200.0))
}

fn ball(location: Vec3) -> ActorParams {
    let mut p = ActorParams::object(Mesh::Sphere, "RedPaint").with_location(location);
    p.mass = 100.0;
    p
}

#[test]
fn object_falls_and_settles_on_floor() {
    let mut w = HeadlessWorld::new();
    let h = w.spawn_actor("object_1", &ball(Vec3::new(1000.0, 0.0, 300.0))).unwrap();
    for _ in 0..400 {
        w.advance();
    }
    let t = w.transform(h).unwrap();
    assert_eq!(t.location.z, 50.0);
}

#[test]
fn paused_world_does_not_move() {
    let mut w = HeadlessWorld::new();
    let h = w.spawn_actor("object_1", &ball(Vec3::new(1000.0, 0.0, 300.0))).unwrap();
    w.set_paused(true);
    w.advance();
    assert_eq!(w.transform(h).unwrap().location.z, 300.0);
    assert_eq!(w.ticks(), 0);
}

#[test]
fn identical_worlds_replay_bit_identically() {
    let run = || {
        let mut w = HeadlessWorld::new();
        let mut p = ball(Vec3::new(1000.0, -1200.0, 0.0));
        p.force = Vec3::new(0.0, 1200.0 * 100.0, 300.0 * 100.0);
        let h = w.spawn_actor("object_1", &p).unwrap();
        (0..100)
            .map(|_| {
                w.advance();
                w.transform(h).unwrap()
            })
            .collect::<Vec<_>>()
    };
    let a = run();
    let b = run();
    assert!(a.iter().zip(&b).all(|(x, y)| x.bit_eq(y)));
}

#[test]
fn standing_occluder_hides_object_behind_it() {
    let mut w = HeadlessWorld::new();
    w.spawn_actor("camera", &camera()).unwrap();
    let obj = w.spawn_actor("object_1", &ball(Vec3::new(1000.0, 0.0, 0.0))).unwrap();
    let occ = w
        .spawn_actor(
            "occluder_1",
            &ActorParams::occluder("Brick", vec![], 4.5).with_location(Vec3::new(400.0, 0.0, 0.0)),
        )
        .unwrap();

    assert!(!w.is_visible_in_frame(obj, &[]).unwrap());
    assert!(w.is_visible_in_frame(obj, &[occ]).unwrap());
    w.set_hidden(obj, true).unwrap();
    assert!(!w.is_visible_in_frame(obj, &[occ]).unwrap());
}

#[test]
fn occluder_rises_then_falls_on_move_ticks() {
    let mut w = HeadlessWorld::new();
    let occ = w
        .spawn_actor(
            "occluder_1",
            &ActorParams::occluder("Brick", vec![2, 40], 10.0)
                .with_rotation(Rotator::new(0.0, 0.0, 90.0)),
        )
        .unwrap();
    let mut rolls = Vec::new();
    for _ in 0..60 {
        w.advance();
        rolls.push(w.transform(occ).unwrap().rotation.roll);
    }
    assert_eq!(rolls[1], 90.0);
    assert_eq!(rolls[2], 80.0);
    assert_eq!(rolls[20], 0.0);
    assert_eq!(rolls[40], 10.0);
    assert_eq!(rolls[59], 90.0);
}

#[test]
fn object_outside_field_of_view_is_not_visible() {
    let mut w = HeadlessWorld::new();
    w.spawn_actor("camera", &camera()).unwrap();
    let obj = w.spawn_actor("object_1", &ball(Vec3::new(700.0, -1200.0, 0.0))).unwrap();
    assert!(!w.is_visible_in_frame(obj, &[]).unwrap());
}

#[test]
fn rejected_and_duplicate_spawns_fail() {
    let mut w = HeadlessWorld::new();
    w.reject_spawn_of("object_2");
    w.spawn_actor("object_1", &ball(Vec3::ZERO)).unwrap();
    assert!(matches!(
        w.spawn_actor("object_1", &ball(Vec3::ZERO)),
        Err(PhysclipError::Spawn(_))
    ));
    assert!(matches!(
        w.spawn_actor("object_2", &ball(Vec3::ZERO)),
        Err(PhysclipError::Spawn(_))
    ));
    assert_eq!(w.live_actors(), 1);
}

#[test]
fn mesh_swap_is_visible_to_capture() {
    let mut w = HeadlessWorld::new();
    let h = w.spawn_actor("object_1", &ball(Vec3::ZERO)).unwrap();
    w.set_mesh(h, Mesh::Cone).unwrap();
    assert_eq!(w.appearance(h).unwrap(), (Mesh::Cone, false));
}
