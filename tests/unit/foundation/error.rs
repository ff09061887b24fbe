use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PhysclipError::spawn("x")
            .to_string()
            .contains("spawn error:")
    );
    assert!(
        PhysclipError::insufficient_windows("x")
            .to_string()
            .contains("insufficient occlusion windows:")
    );
    assert!(
        PhysclipError::length_mismatch("x")
            .to_string()
            .contains("length mismatch:")
    );
    assert!(
        PhysclipError::media_save("x")
            .to_string()
            .contains("media save failure:")
    );
}

#[test]
fn recoverable_kinds_trigger_retry() {
    assert!(PhysclipError::insufficient_windows("x").is_recoverable());
    assert!(PhysclipError::no_magic_tick("x").is_recoverable());
    assert!(PhysclipError::frame_mismatch("x").is_recoverable());
    assert!(PhysclipError::invalid_run("x").is_recoverable());

    assert_eq!(PhysclipError::spawn("x").severity(), Severity::Fatal);
    assert_eq!(PhysclipError::length_mismatch("x").severity(), Severity::Fatal);
    assert_eq!(PhysclipError::media_save("x").severity(), Severity::Fatal);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PhysclipError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.severity(), Severity::Fatal);
}
