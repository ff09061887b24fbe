use crate::analysis::visibility::{
    Series, drop_runs_touching_bounds, exclude_near, group_contiguous, time_laps_where, trim_edges,
};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::scene::class::TestClass;
use crate::scene::params::MagicTicks;
use rand::RngCore;
use rand::seq::SliceRandom;

/// Candidate magic ticks produced by a [`TickPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Candidates {
    /// One trick; any index is a candidate.
    Single(Vec<usize>),
    /// Two tricks drawn from the same pool, more than `min_gap` frames apart.
    Spread { pool: Vec<usize>, min_gap: usize },
    /// Two tricks, one per occlusion window.
    Windows { first: Vec<usize>, second: Vec<usize> },
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        match self {
            Candidates::Single(v) => v.is_empty(),
            Candidates::Spread { pool, .. } => pool.len() < 2,
            Candidates::Windows { first, second } => first.is_empty() || second.is_empty(),
        }
    }
}

/// Magic-tick selection policy for one test class.
///
/// Visible classes need the magic actor visible in both observer runs. Occluded single-trick
/// classes look for an occlusion window of the first observer that does not touch the clip
/// edges; occluded two-trick classes need two distinct windows where both observers agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickPolicy {
    pub occluded: bool,
    pub tricks: usize,
    pub edge_margin: usize,
    pub two_trick_edge_margin: usize,
    pub min_trick_gap: usize,
}

impl TickPolicy {
    pub fn for_class(
        class: TestClass,
        edge_margin: usize,
        two_trick_edge_margin: usize,
        min_trick_gap: usize,
    ) -> Self {
        Self {
            occluded: class.occluded,
            tricks: class.motion.trick_count(),
            edge_margin,
            two_trick_edge_margin,
            min_trick_gap,
        }
    }

    /// Candidate ticks from the observer runs' magic-actor visibility series.
    pub fn candidates(&self, first: &[bool], second: &[bool]) -> PhysclipResult<Candidates> {
        let n = first.len();
        let last = n.saturating_sub(1);
        let c = match (self.occluded, self.tricks) {
            (false, 1) => {
                let visible = time_laps_where(Series::Pair(first, second), true)?;
                Candidates::Single(trim_edges(&visible, self.edge_margin))
            }
            (false, _) => {
                let visible = time_laps_where(Series::Pair(first, second), true)?;
                Candidates::Spread {
                    pool: trim_edges(&visible, self.two_trick_edge_margin),
                    min_gap: self.min_trick_gap,
                }
            }
            (true, 1) => {
                let hidden = time_laps_where(Series::Single(first), false)?;
                let hidden = drop_runs_touching_bounds(&hidden, 0, last);
                Candidates::Single(trim_edges(&hidden, self.edge_margin))
            }
            (true, _) => {
                let hidden = time_laps_where(Series::Pair(first, second), false)?;
                let hidden = drop_runs_touching_bounds(&hidden, 0, last);
                let mut windows = group_contiguous(&hidden)?.into_iter();
                let (Some(first), Some(second)) = (windows.next(), windows.next()) else {
                    return Err(PhysclipError::insufficient_windows("need two occlusion windows"));
                };
                Candidates::Windows { first, second }
            }
        };
        if c.is_empty() {
            return Err(PhysclipError::no_magic_tick(format!(
                "no candidate tick in {n} frames ({} trick(s), occluded: {})",
                self.tricks, self.occluded
            )));
        }
        Ok(c)
    }
}

/// Draw ticks among `candidates` in random order until `accept` approves one set.
///
/// Tick sets are passed to `accept` sorted ascending. Exhausting every candidate is a recoverable
/// [`PhysclipError::NoValidMagicTick`].
#[tracing::instrument(skip_all)]
pub fn choose_ticks(
    candidates: &Candidates,
    rng: &mut dyn RngCore,
    mut accept: impl FnMut(&[usize]) -> bool,
) -> PhysclipResult<MagicTicks> {
    let mut tried = 0usize;
    match candidates {
        Candidates::Single(pool) => {
            let mut pool = pool.clone();
            pool.shuffle(rng);
            for t in pool {
                tried += 1;
                if accept(&[t]) {
                    return Ok(MagicTicks::single(t));
                }
            }
        }
        Candidates::Spread { pool, min_gap } => {
            let mut firsts = pool.clone();
            firsts.shuffle(rng);
            for t1 in firsts {
                let mut rest = exclude_near(pool, t1, *min_gap);
                rest.shuffle(rng);
                for t2 in rest {
                    tried += 1;
                    let pair = [t1.min(t2), t1.max(t2)];
                    if accept(&pair) {
                        return Ok(MagicTicks::pair(pair[0], pair[1]));
                    }
                }
            }
        }
        Candidates::Windows { first, second } => {
            let mut firsts = first.clone();
            let mut seconds = second.clone();
            firsts.shuffle(rng);
            seconds.shuffle(rng);
            for &t1 in &firsts {
                for &t2 in &seconds {
                    tried += 1;
                    if accept(&[t1, t2]) {
                        return Ok(MagicTicks::pair(t1, t2));
                    }
                }
            }
        }
    }
    Err(PhysclipError::no_magic_tick(format!(
        "all {tried} candidate tick set(s) rejected"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/policy.rs"]
mod tests;
