use super::*;
use serde_json::json;

#[test]
fn nested_and_flat_test_keys_are_equivalent() {
    let nested = SceneList::from_value(&json!({
        "O1": {"test": {"occluded": {"static": 1, "dynamic_2": 2}}}
    }))
    .unwrap();
    let flat = SceneList::from_value(&json!({
        "scenario_O1": {"test_occluded": {"static": 1, "dynamic_2": 2}}
    }))
    .unwrap();
    assert_eq!(nested, flat);
    assert_eq!(nested.len(), 3);
    assert_eq!(nested.total_runs(), 12);
}

#[test]
fn train_counts_and_order_are_preserved() {
    let list = SceneList::from_value(&json!({
        "O2": {"train": 2, "test": {"visible": {"dynamic_1": 1}}}
    }))
    .unwrap();
    let kinds: Vec<String> = list.scenes().iter().map(|s| s.to_string()).collect();
    assert_eq!(
        kinds,
        vec!["O2 train", "O2 train", "O2 test visible dynamic_1"]
    );
    assert_eq!(list.total_runs(), 6);
}

#[test]
fn actor_count_maps_pin_objects() {
    let list = SceneList::from_value(&json!({
        "O3": {"test": {"visible": {"static": {"1": 1, "3": 2}}}}
    }))
    .unwrap();
    let counts: Vec<Option<u8>> = list.scenes().iter().map(|s| s.actor_count).collect();
    assert_eq!(counts, vec![Some(1), Some(3), Some(3)]);
}

#[test]
fn unknown_names_are_validation_errors() {
    for bad in [
        json!({"O7": {"train": 1}}),
        json!({"O1": {"warmup": 1}}),
        json!({"O1": {"test": {"hidden": {"static": 1}}}}),
        json!({"O1": {"test_visible": {"dynamic_3": 1}}}),
        json!({"O1": {"test_visible": {"static": -1}}}),
        json!({"O1": {"test_visible": {"static": {"5": 1}}}}),
        json!([1, 2]),
    ] {
        let err = SceneList::from_value(&bad).unwrap_err();
        assert!(matches!(err, PhysclipError::Validation(_)), "{bad}");
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SceneList::from_reader("{not json".as_bytes()).unwrap_err();
    assert!(matches!(err, PhysclipError::Serde(_)));
}
