use crate::foundation::core::Resolution;
use crate::foundation::error::{PhysclipError, PhysclipResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Knobs of a generation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Captured frames per run.
    pub frames_per_run: usize,
    /// Paused ticks after every spawn, while textures load.
    pub pause_ticks: usize,
    pub resolution: Resolution,
    /// Random seed; derived from the clock when absent.
    pub seed: Option<u64>,
    /// Output root; absent means dry mode and nothing is written.
    pub output_dir: Option<PathBuf>,
    /// Attempts per scene before generation fails.
    pub max_attempts: usize,
    /// Candidate ticks dropped at both ends of single-trick candidate lists.
    pub edge_margin: usize,
    /// Same, for two-trick candidate lists.
    pub two_trick_edge_margin: usize,
    /// Minimum distance between the two ticks of visible two-trick scenes.
    pub min_trick_gap: usize,
    /// Also require observer runs to match on their first and last frames.
    pub check_run_bounds: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frames_per_run: 100,
            pause_ticks: 2,
            resolution: Resolution::default(),
            seed: None,
            output_dir: None,
            max_attempts: 20,
            edge_margin: 8,
            two_trick_edge_margin: 5,
            min_trick_gap: 5,
            check_run_bounds: false,
        }
    }
}

impl GeneratorConfig {
    pub fn is_dry_mode(&self) -> bool {
        self.output_dir.is_none()
    }

    pub fn validate(&self) -> PhysclipResult<()> {
        if self.frames_per_run < 2 {
            return Err(PhysclipError::validation("frames_per_run must be >= 2"));
        }
        if self.frames_per_run > 999 {
            return Err(PhysclipError::validation(
                "frames_per_run must be <= 999 (three-digit frame numbering)",
            ));
        }
        if self.max_attempts == 0 {
            return Err(PhysclipError::validation("max_attempts must be >= 1"));
        }
        if self.edge_margin.saturating_mul(2) >= self.frames_per_run
            || self.two_trick_edge_margin.saturating_mul(2) >= self.frames_per_run
        {
            return Err(PhysclipError::validation(format!(
                "edge margins leave no frame out of {}",
                self.frames_per_run
            )));
        }
        if self.min_trick_gap >= self.frames_per_run {
            return Err(PhysclipError::validation(
                "min_trick_gap must be smaller than frames_per_run",
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> PhysclipResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PhysclipError::serde(format!("config parse failed: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
