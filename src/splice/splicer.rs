use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::media::layout::{MEDIA_CATEGORIES, frame_file};
use crate::media::status::{FrameStatus, RunStatus};
use crate::splice::boundary::{Source, SpliceBoundary};
use rayon::prelude::*;
use std::path::Path;

/// Build the two synthetic statuses `(C, D)` from real runs `a` and `b`.
///
/// C alternates A, B, A... at each boundary and D alternates B, A, B.... Both take run A's header
/// with `is_possible = false`.
pub fn splice_metadata(
    a: &RunStatus,
    b: &RunStatus,
    boundary: &SpliceBoundary,
) -> PhysclipResult<(RunStatus, RunStatus)> {
    if a.frames.len() != b.frames.len() {
        return Err(PhysclipError::length_mismatch(format!(
            "cannot splice runs of {} and {} frames",
            a.frames.len(),
            b.frames.len()
        )));
    }
    if a.frames.len() != boundary.frame_count() {
        return Err(PhysclipError::length_mismatch(format!(
            "runs have {} frames, boundary expects {}",
            a.frames.len(),
            boundary.frame_count()
        )));
    }

    let build = |first: Source| -> RunStatus {
        let mut header = a.header.clone();
        header.scenario.is_possible = false;
        let frames: Vec<FrameStatus> = boundary
            .segments(first)
            .into_iter()
            .flat_map(|(range, src)| {
                let from = match src {
                    Source::A => &a.frames,
                    Source::B => &b.frames,
                };
                from[range].iter().cloned()
            })
            .collect();
        RunStatus { header, frames }
    };

    Ok((build(Source::A), build(Source::B)))
}

/// Copy already-captured frame images from `src_a`/`src_b` into each destination, following the
/// same alternation as [`splice_metadata`].
///
/// Every destination is paired with the source its first segment comes from: `Source::A` builds
/// run C, `Source::B` builds run D.
#[tracing::instrument(skip(boundary, dests), fields(ticks = ?boundary.ticks(), dests = dests.len()))]
pub fn splice_media(
    src_a: &Path,
    src_b: &Path,
    boundary: &SpliceBoundary,
    dests: &[(&Path, Source)],
) -> PhysclipResult<()> {
    for (dest, _) in dests {
        for category in MEDIA_CATEGORIES {
            std::fs::create_dir_all(dest.join(category)).map_err(|e| {
                PhysclipError::media_save(format!("create {}: {e}", dest.display()))
            })?;
        }
    }

    let jobs: Vec<(&Path, &str, usize, Source)> = dests
        .iter()
        .flat_map(|&(dest, first)| {
            MEDIA_CATEGORIES.into_iter().flat_map(move |category| {
                (0..boundary.frame_count())
                    .map(move |frame| (dest, category, frame, boundary.pick(first, frame)))
            })
        })
        .collect();

    jobs.par_iter().try_for_each(|&(dest, category, frame, src)| {
        let from = match src {
            Source::A => src_a,
            Source::B => src_b,
        }
        .join(frame_file(category, frame));
        let to = dest.join(frame_file(category, frame));
        std::fs::copy(&from, &to).map(|_| ()).map_err(|e| {
            PhysclipError::media_save(format!(
                "copy {} -> {}: {e}",
                from.display(),
                to.display()
            ))
        })
    })?;

    tracing::debug!(files = jobs.len(), "spliced media");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/splice/splicer.rs"]
mod tests;
