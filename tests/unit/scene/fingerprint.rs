use super::*;
use crate::scene::params::{MagicSpec, MagicTicks, Mesh};

fn base() -> SceneParams {
    let mut p = SceneParams::default();
    p.insert(
        "object_1",
        ActorParams::object(Mesh::Cube, "RedPaint").with_location(Vec3::new(1000.0, 0.0, 0.0)),
    );
    p.magic = Some(MagicSpec {
        actor: "object_1".into(),
        ticks: None,
        variant: MagicVariant::None,
    });
    p
}

#[test]
fn fingerprint_is_stable_and_sensitive() {
    let a = base();
    assert_eq!(a.fingerprint(), base().fingerprint());

    let mut b = base();
    b.actor_mut("object_1").unwrap().location.y = 1.0;
    assert_ne!(a.fingerprint(), b.fingerprint());

    let mut c = base();
    c.actor_mut("object_1").unwrap().location.x = -0.0 + 1000.0;
    assert_eq!(a.fingerprint(), c.fingerprint());
}

#[test]
fn resolved_ticks_do_not_change_identity() {
    let a = base();
    let mut b = base();
    b.set_magic_ticks(MagicTicks::single(40)).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint().to_string().len(), 32);
}
