use crate::foundation::error::{PhysclipError, PhysclipResult};

/// One or two boolean time series, one sample per captured frame.
#[derive(Clone, Copy, Debug)]
pub enum Series<'a> {
    /// A single run.
    Single(&'a [bool]),
    /// Two runs that must agree frame by frame.
    Pair(&'a [bool], &'a [bool]),
}

/// Return the sorted frame indices where the series equals `desired`.
///
/// For [`Series::Pair`] a frame is kept only when both runs agree on `desired`; frames where they
/// disagree are excluded.
pub fn time_laps_where(series: Series<'_>, desired: bool) -> PhysclipResult<Vec<usize>> {
    match series {
        Series::Single(s) => Ok(s
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| (v == desired).then_some(i))
            .collect()),
        Series::Pair(a, b) => {
            if a.len() != b.len() {
                return Err(PhysclipError::length_mismatch(format!(
                    "visibility series differ in length ({} vs {})",
                    a.len(),
                    b.len()
                )));
            }
            Ok(a.iter()
                .zip(b)
                .enumerate()
                .filter_map(|(i, (&x, &y))| (x == desired && y == desired).then_some(i))
                .collect())
        }
    }
}

/// Drop the first and last `margin` elements of a sorted index list.
pub fn trim_edges(indices: &[usize], margin: usize) -> Vec<usize> {
    if indices.len() <= margin.saturating_mul(2) {
        return Vec::new();
    }
    indices[margin..indices.len() - margin].to_vec()
}

/// Strip the leading run of indices pinned to `min_bound` and the trailing run pinned to
/// `max_bound`.
///
/// An index list `[0, 1, 2, 40, 41, 97, 98, 99]` with bounds `(0, 99)` becomes `[40, 41]`: the
/// actor was out of frame at the clip edges rather than occluded.
pub fn drop_runs_touching_bounds(indices: &[usize], min_bound: usize, max_bound: usize) -> Vec<usize> {
    let mut start = 0;
    let mut lo = min_bound;
    while start < indices.len() && indices[start] == lo {
        start += 1;
        lo += 1;
    }

    let mut end = indices.len();
    let mut hi = Some(max_bound);
    while end > start && Some(indices[end - 1]) == hi {
        end -= 1;
        hi = hi.and_then(|h| h.checked_sub(1));
    }

    indices[start..end].to_vec()
}

/// Partition a sorted index list into maximal runs of consecutive integers.
///
/// Never fails; an empty input yields no runs.
pub fn contiguous_runs(indices: &[usize]) -> Vec<Vec<usize>> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    for &i in indices {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|&prev| prev + 1 == i) => run.push(i),
            _ => runs.push(vec![i]),
        }
    }
    runs
}

/// Partition into contiguous windows, requiring at least two of them.
///
/// Fewer than two windows is a recoverable [`PhysclipError::InsufficientOcclusionWindows`].
pub fn group_contiguous(indices: &[usize]) -> PhysclipResult<Vec<Vec<usize>>> {
    let runs = contiguous_runs(indices);
    if runs.len() < 2 || runs.iter().any(Vec::is_empty) {
        return Err(PhysclipError::insufficient_windows(format!(
            "found {} occlusion window(s), need 2",
            runs.len()
        )));
    }
    Ok(runs)
}

/// Remove every index within `margin` frames of `tick` (the tick itself included).
pub fn exclude_near(indices: &[usize], tick: usize, margin: usize) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| i.abs_diff(tick) > margin)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/visibility.rs"]
mod tests;
