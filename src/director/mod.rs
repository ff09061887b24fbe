//! Top-level scheduler driving scenarios one engine tick at a time.

use crate::config::{GeneratorConfig, ScenarioSpec, SceneList};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::media::layout::scene_dir_name;
use crate::media::saver::Saver;
use crate::scenario::{Outcome, Scenario, SceneSummary};
use crate::scene::materials::MaterialCatalog;
use crate::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

/// Position of the director within the active run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The next real run (or the next scene) has to be spawned.
    Start,
    /// World paused after a spawn; resumes once `remaining` reaches zero.
    Paused { remaining: usize },
    Running,
    Finished,
}

/// Whether [`Director::tick`] should be called again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectorStatus {
    Running,
    Finished,
}

/// A completed scene together with the number of attempts it took.
#[derive(Clone, Debug)]
pub struct SceneReport {
    pub index: usize,
    pub attempts: usize,
    pub summary: SceneSummary,
}

/// Owns the ordered scene list and plays it against a world.
///
/// Each call to [`Director::tick`] does a bounded amount of work. Recoverable scenario failures
/// regenerate the scene from scratch, at most `max_attempts` times per scene.
#[derive(Debug)]
pub struct Director<W: World> {
    world: W,
    saver: Saver,
    config: GeneratorConfig,
    catalog: MaterialCatalog,
    scenes: Vec<ScenarioSpec>,
    next: usize,
    current: Option<Scenario>,
    rng: ChaCha8Rng,
    seed: u64,
    phase: Phase,
    attempts: usize,
    restarts: usize,
    reports: Vec<SceneReport>,
}

impl<W: World> Director<W> {
    /// Validate the configuration and seed the random source.
    ///
    /// An output directory in `config` with a dry `saver` still runs dry.
    pub fn new(
        world: W,
        saver: Saver,
        config: GeneratorConfig,
        scenes: SceneList,
        catalog: MaterialCatalog,
    ) -> PhysclipResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(
            seed,
            scenes = scenes.len(),
            runs = scenes.total_runs(),
            dry = saver.is_dry_mode() || config.is_dry_mode(),
            "generating scenes"
        );
        Ok(Self {
            world,
            saver,
            config,
            catalog,
            scenes: scenes.scenes().to_vec(),
            next: 0,
            current: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            phase: Phase::Start,
            attempts: 0,
            restarts: 0,
            reports: Vec::new(),
        })
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current(&self) -> Option<&Scenario> {
        self.current.as_ref()
    }

    /// Completed scenes, in order.
    pub fn reports(&self) -> &[SceneReport] {
        &self.reports
    }

    /// Attempts discarded over the whole session.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Advance by one engine tick.
    pub fn tick(&mut self) -> PhysclipResult<DirectorStatus> {
        match self.phase {
            Phase::Finished => return Ok(DirectorStatus::Finished),
            Phase::Start => self.start_run()?,
            Phase::Paused { remaining: 0 } => {
                self.world.set_paused(false);
                self.phase = Phase::Running;
            }
            Phase::Paused { remaining } => {
                self.phase = Phase::Paused {
                    remaining: remaining - 1,
                };
            }
            Phase::Running => self.step()?,
        }
        Ok(if self.phase == Phase::Finished {
            DirectorStatus::Finished
        } else {
            DirectorStatus::Running
        })
    }

    /// Tick until every scene is generated.
    pub fn run_to_completion(&mut self) -> PhysclipResult<&[SceneReport]> {
        while self.tick()? == DirectorStatus::Running {}
        Ok(&self.reports)
    }

    /// Stop at the current tick boundary; the active attempt is dropped without being persisted.
    pub fn abort(&mut self) {
        if let Some(mut scenario) = self.current.take() {
            scenario.abort(&mut self.world, &mut self.saver);
            self.drop_partial_output();
        }
        self.world.set_paused(false);
        self.phase = Phase::Finished;
    }

    fn start_run(&mut self) -> PhysclipResult<()> {
        if self.current.is_none() {
            if self.next >= self.scenes.len() {
                tracing::info!(
                    scenes = self.reports.len(),
                    restarts = self.restarts,
                    "all scenes generated"
                );
                self.phase = Phase::Finished;
                return Ok(());
            }
            self.current = Some(self.new_scenario()?);
        }
        let Some(scenario) = self.current.as_mut() else {
            return Ok(());
        };

        if let Err(e) = scenario.play_run(&mut self.world, &mut self.saver) {
            return self.fail(e);
        }
        self.world.set_paused(true);
        self.phase = Phase::Paused {
            remaining: self.config.pause_ticks,
        };
        Ok(())
    }

    fn step(&mut self) -> PhysclipResult<()> {
        let Some(scenario) = self.current.as_mut() else {
            self.phase = Phase::Start;
            return Ok(());
        };
        if let Err(e) = scenario.tick(&mut self.world, &mut self.saver) {
            return self.fail(e);
        }
        if scenario.is_run_valid() && scenario.frames_recorded() < self.config.frames_per_run {
            return Ok(());
        }

        let outcome = scenario.stop_run(&mut self.world, &mut self.saver, &mut self.rng);
        match outcome {
            Outcome::NextRun => {
                self.phase = Phase::Start;
                Ok(())
            }
            Outcome::Success(summary) => {
                self.attempts += 1;
                tracing::info!(
                    scene = %summary.spec,
                    index = self.next + 1,
                    of = self.scenes.len(),
                    attempts = self.attempts,
                    "scene generated"
                );
                self.reports.push(SceneReport {
                    index: self.next,
                    attempts: self.attempts,
                    summary,
                });
                self.current = None;
                self.next += 1;
                self.attempts = 0;
                self.phase = Phase::Start;
                Ok(())
            }
            Outcome::Retry(e) => self.retry(e),
            Outcome::Fatal(e) => {
                self.current = None;
                self.drop_partial_output();
                self.phase = Phase::Finished;
                Err(e)
            }
        }
    }

    /// Route an error raised outside `stop_run`.
    fn fail(&mut self, e: PhysclipError) -> PhysclipResult<()> {
        if let Some(mut scenario) = self.current.take() {
            scenario.abort(&mut self.world, &mut self.saver);
        }
        self.world.set_paused(false);
        if e.is_recoverable() {
            return self.retry(e);
        }
        tracing::error!(scene = self.next + 1, error = %e, "generation stopped");
        self.drop_partial_output();
        self.phase = Phase::Finished;
        Err(e)
    }

    /// Discard the current attempt and regenerate the scene.
    fn retry(&mut self, e: PhysclipError) -> PhysclipResult<()> {
        self.attempts += 1;
        self.restarts += 1;
        let spec = self.scenes.get(self.next).cloned();
        tracing::warn!(
            scene = self.next + 1,
            attempt = self.attempts,
            max = self.config.max_attempts,
            error = %e,
            "restarting scene"
        );

        self.drop_partial_output();
        self.saver.reset();
        self.current = None;

        if self.attempts >= self.config.max_attempts {
            self.phase = Phase::Finished;
            let what = spec.map_or_else(|| "scene".to_string(), |s| s.to_string());
            return Err(PhysclipError::RetriesExhausted(format!(
                "{what} failed {} times, last error: {e}",
                self.attempts
            )));
        }
        self.current = Some(self.new_scenario()?);
        self.phase = Phase::Start;
        Ok(())
    }

    /// Delete whatever the current scene has written so far.
    fn drop_partial_output(&self) {
        if let Some(dir) = self.scene_dir(self.next) {
            remove_partial_output(&dir);
        }
    }

    fn new_scenario(&mut self) -> PhysclipResult<Scenario> {
        let spec = self.scenes.get(self.next).cloned().ok_or_else(|| {
            PhysclipError::validation(format!("no scene at index {}", self.next))
        })?;
        let dir = self.scene_dir(self.next);
        Scenario::new(spec, &self.config, &self.catalog, dir, &mut self.rng)
    }

    fn scene_dir(&self, index: usize) -> Option<PathBuf> {
        if self.saver.is_dry_mode() {
            return None;
        }
        let root = self.config.output_dir.as_ref()?;
        let spec = self.scenes.get(index)?;
        Some(root.join(scene_dir_name(
            index,
            self.scenes.len(),
            spec.kind.type_str(),
            spec.block.as_str(),
        )))
    }
}

fn remove_partial_output(dir: &std::path::Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "could not remove partial output");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/director/mod.rs"]
mod tests;
