use crate::foundation::error::{PhysclipError, PhysclipResult};
use smallvec::SmallVec;
use std::ops::Range;

/// Which real run a synthetic frame comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    A,
    B,
}

impl Source {
    pub fn flip(self) -> Self {
        match self {
            Source::A => Source::B,
            Source::B => Source::A,
        }
    }
}

/// Ordered tick indices partitioning `[0, frame_count)` into segments alternating between two
/// sources.
///
/// With ticks `(t1, t2)` the segments are `[0, t1)`, `[t1, t2)` and `[t2, N)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpliceBoundary {
    ticks: SmallVec<[usize; 2]>,
    frame_count: usize,
}

impl SpliceBoundary {
    /// Ticks must be strictly increasing and inside `[0, frame_count)`.
    pub fn new(ticks: &[usize], frame_count: usize) -> PhysclipResult<Self> {
        if ticks.is_empty() {
            return Err(PhysclipError::validation("splice boundary needs at least one tick"));
        }
        if ticks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PhysclipError::validation(format!(
                "splice ticks must be strictly increasing: {ticks:?}"
            )));
        }
        if ticks.iter().any(|&t| t >= frame_count) {
            return Err(PhysclipError::validation(format!(
                "splice ticks {ticks:?} outside [0, {frame_count})"
            )));
        }
        Ok(Self {
            ticks: SmallVec::from_slice(ticks),
            frame_count,
        })
    }

    pub fn ticks(&self) -> &[usize] {
        &self.ticks
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Segments in order, the first one sourced from `first`.
    pub fn segments(&self, first: Source) -> Vec<(Range<usize>, Source)> {
        let mut out = Vec::with_capacity(self.ticks.len() + 1);
        let mut start = 0;
        let mut src = first;
        for &t in &self.ticks {
            out.push((start..t, src));
            start = t;
            src = src.flip();
        }
        out.push((start..self.frame_count, src));
        out
    }

    /// Source of `frame` for a synthetic run starting with `first`.
    pub fn pick(&self, first: Source, frame: usize) -> Source {
        let crossed = self.ticks.iter().filter(|&&t| t <= frame).count();
        if crossed % 2 == 0 { first } else { first.flip() }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/splice/boundary.rs"]
mod tests;
