use super::*;

fn scene_with_magic(actor: &str) -> SceneParams {
    let mut p = SceneParams::default();
    p.insert(
        "camera",
        ActorParams::new(ActorKind::Camera {
            field_of_view: 90.0,
            aspect_ratio: 1.0,
        }),
    );
    p.insert("object_1", ActorParams::object(Mesh::Sphere, "Black"));
    p.insert("occluder_1", ActorParams::occluder("Brick", vec![10, 60], 2.0));
    p.magic = Some(MagicSpec {
        actor: actor.to_string(),
        ticks: None,
        variant: MagicVariant::None,
    });
    p
}

#[test]
fn magic_actor_must_be_a_present_object() {
    assert!(scene_with_magic("object_1").validate().is_ok());

    let err = scene_with_magic("object_9").validate().unwrap_err();
    assert!(err.to_string().contains("not in the scene"));

    let err = scene_with_magic("occluder_1").validate().unwrap_err();
    assert!(err.to_string().contains("not an object"));
}

#[test]
fn unsorted_occluder_moves_are_rejected() {
    let mut p = scene_with_magic("object_1");
    p.insert("occluder_2", ActorParams::occluder("Brick", vec![60, 10], 2.0));
    assert!(matches!(p.validate(), Err(PhysclipError::Validation(_))));
}

#[test]
fn magic_ticks_serialize_as_int_or_list() {
    let one = serde_json::to_string(&MagicTicks::single(42)).unwrap();
    assert_eq!(one, "42");
    let two = serde_json::to_string(&MagicTicks::pair(12, 40)).unwrap();
    assert_eq!(two, "[12,40]");

    let back: MagicTicks = serde_json::from_str("[12,40]").unwrap();
    assert_eq!(back, MagicTicks::pair(12, 40));
    let back: MagicTicks = serde_json::from_str("7").unwrap();
    assert_eq!(back.as_slice(), &[7]);
}

#[test]
fn scene_params_json_keeps_role_and_magic() {
    let mut p = scene_with_magic("object_1");
    p.set_magic_ticks(MagicTicks::single(33)).unwrap();
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["actors"]["occluder_1"]["role"], "occluder");
    assert_eq!(json["magic"]["tick"], 33);

    let back: SceneParams = serde_json::from_value(json).unwrap();
    assert_eq!(back, p);
}

#[test]
fn moving_names_skip_static_roles() {
    let p = scene_with_magic("object_1");
    let names: Vec<&str> = p.moving_names().collect();
    assert_eq!(names, vec!["object_1", "occluder_1"]);
}
