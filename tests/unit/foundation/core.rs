use super::*;

#[test]
fn bit_eq_distinguishes_signed_zero() {
    let a = Transform::new(Vec3::new(0.0, 1.0, 2.0), Rotator::new(0.0, 0.0, 90.0));
    let mut b = a;
    assert!(a.bit_eq(&b));

    b.location.x = -0.0;
    assert_eq!(a, b);
    assert!(!a.bit_eq(&b));
}

#[test]
fn rotator_bit_eq_checks_every_axis() {
    let a = Rotator::new(10.0, 20.0, 30.0);
    assert!(!a.bit_eq(&Rotator::new(10.0, 20.0, 30.000001)));
    assert!(!a.bit_eq(&Rotator::new(10.0, 21.0, 30.0)));
    assert!(a.bit_eq(&Rotator::new(10.0, 20.0, 30.0)));
}

#[test]
fn resolution_parses_and_rejects() {
    let r: Resolution = "320x240".parse().unwrap();
    assert_eq!(r.width, 320);
    assert_eq!(r.height, 240);
    assert_eq!(r.to_string(), "320x240");

    assert!("320".parse::<Resolution>().is_err());
    assert!("0x10".parse::<Resolution>().is_err());
    assert!("ax10".parse::<Resolution>().is_err());
}
