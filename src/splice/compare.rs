use crate::run::telemetry::TelemetryLog;

/// Whether every tracked actor has a bit-identical transform in both logs at `frame`.
///
/// Frames missing from either log, or with different actor sets, never match.
pub fn compare_frame(a: &TelemetryLog, b: &TelemetryLog, frame: usize) -> bool {
    compare_frame_excluding(a, b, frame, None)
}

/// Like [`compare_frame`], skipping the actor named `excluded`.
pub fn compare_frame_excluding(
    a: &TelemetryLog,
    b: &TelemetryLog,
    frame: usize,
    excluded: Option<&str>,
) -> bool {
    let (Some(fa), Some(fb)) = (a.frame(frame), b.frame(frame)) else {
        return false;
    };
    let keep = |name: &&String| Some(name.as_str()) != excluded;
    if !fa.actors.keys().filter(keep).eq(fb.actors.keys().filter(keep)) {
        return false;
    }
    fa.actors
        .iter()
        .filter(|(name, _)| keep(name))
        .all(|(name, sa)| {
            fb.actors
                .get(name)
                .is_some_and(|sb| sa.transform.bit_eq(&sb.transform))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/splice/compare.rs"]
mod tests;
