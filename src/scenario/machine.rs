use crate::analysis::policy::{TickPolicy, choose_ticks};
use crate::block::Block;
use crate::config::{GeneratorConfig, ScenarioSpec};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::media::layout::{STATUS_FILE, run_dir};
use crate::media::saver::Saver;
use crate::media::status::{RunStatus, ScenarioHeader};
use crate::run::{Observer, Run, TelemetryStore};
use crate::scenario::protocol::Protocol;
use crate::scene::class::ScenarioKind;
use crate::scene::fingerprint::ParamsFingerprint;
use crate::scene::generate::SceneGenerator;
use crate::scene::materials::MaterialCatalog;
use crate::scene::params::{ActorParams, MagicTicks, SceneParams};
use crate::splice::{Source, SpliceBoundary, compare_frame_excluding, splice_media, splice_metadata};
use crate::world::World;
use rand::RngCore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where a scenario attempt stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenarioState {
    ParamsGenerated,
    /// Run index (0-based) being simulated.
    RunInProgress(usize),
    RunComplete(usize),
    /// Every real and synthetic run has been produced.
    Done,
    Failed,
}

/// What the director should do after a run stops.
#[derive(Debug)]
pub enum Outcome {
    /// Play the next real run of the same attempt.
    NextRun,
    Success(SceneSummary),
    /// Discard the attempt and start over with fresh parameters.
    Retry(PhysclipError),
    Fatal(PhysclipError),
}

impl Outcome {
    fn from_error(e: PhysclipError) -> Self {
        if e.is_recoverable() {
            Outcome::Retry(e)
        } else {
            Outcome::Fatal(e)
        }
    }
}

/// Result of a completed scenario.
#[derive(Clone, Debug)]
pub struct SceneSummary {
    pub spec: ScenarioSpec,
    pub protocol: Protocol,
    pub fingerprint: ParamsFingerprint,
    pub magic_ticks: Option<MagicTicks>,
    /// Status of every run, real and synthetic, in run order.
    pub runs: Vec<RunStatus>,
    pub dir: Option<PathBuf>,
}

/// Fresh parameters for one attempt at `spec`.
///
/// The base generator lays out common actors, then the block adjusts them. Nothing is carried
/// over from previous attempts.
pub fn generate_parameters(
    spec: &ScenarioSpec,
    block: &dyn Block,
    generator: &SceneGenerator<'_>,
    rng: &mut dyn RngCore,
) -> PhysclipResult<SceneParams> {
    let params = match spec.kind {
        ScenarioKind::Train => {
            let mut p = generator.train(rng);
            block.customize_train(&mut p, rng);
            p
        }
        ScenarioKind::Test(class) => {
            let mut p = generator.test(class, spec.actor_count, rng);
            block.customize_test(&mut p, class, rng);
            p
        }
    };
    params.validate()?;
    Ok(params)
}

/// One attempt at generating a scene: a fixed sequence of runs driven tick by tick.
///
/// Runs are played strictly one after the other. Observer runs feed the telemetry store; once
/// the second one stops the magic ticks are resolved, and after the last real run the remaining
/// runs are spliced from recorded ones.
#[derive(Debug)]
pub struct Scenario {
    spec: ScenarioSpec,
    block: Box<dyn Block>,
    protocol: Protocol,
    policy: Option<TickPolicy>,
    frames: usize,
    check_run_bounds: bool,
    params: SceneParams,
    fingerprint: ParamsFingerprint,
    state: ScenarioState,
    run_index: usize,
    run: Option<Run>,
    /// Whether the magic actor starts hidden in each observer run.
    observer_hidden: [bool; 2],
    store: TelemetryStore,
    statuses: Vec<RunStatus>,
    scene_dir: Option<PathBuf>,
}

impl Scenario {
    /// Generate parameters for a new attempt. `scene_dir` is `None` in dry mode.
    pub fn new(
        spec: ScenarioSpec,
        config: &GeneratorConfig,
        catalog: &MaterialCatalog,
        scene_dir: Option<PathBuf>,
        rng: &mut dyn RngCore,
    ) -> PhysclipResult<Self> {
        let block = spec.block.block();
        let generator = SceneGenerator::new(catalog, config.frames_per_run);
        let params = generate_parameters(&spec, block.as_ref(), &generator, rng)?;
        let fingerprint = params.fingerprint();
        let protocol = Protocol::for_kind(spec.kind);
        let policy = match spec.kind {
            ScenarioKind::Train => None,
            ScenarioKind::Test(class) => Some(TickPolicy::for_class(
                class,
                config.edge_margin,
                config.two_trick_edge_margin,
                config.min_trick_gap,
            )),
        };
        tracing::info!(scene = %spec, %protocol, %fingerprint, "parameters generated");

        Ok(Self {
            spec,
            block,
            protocol,
            policy,
            frames: config.frames_per_run,
            check_run_bounds: config.check_run_bounds,
            params,
            fingerprint,
            state: ScenarioState::ParamsGenerated,
            run_index: 0,
            run: None,
            observer_hidden: [false; 2],
            store: TelemetryStore::new(),
            statuses: Vec::new(),
            scene_dir,
        })
    }

    pub fn spec(&self) -> &ScenarioSpec {
        &self.spec
    }

    pub fn block(&self) -> &dyn Block {
        self.block.as_ref()
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Configuration A parameters, with the magic ticks once resolved.
    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn fingerprint(&self) -> ParamsFingerprint {
        self.fingerprint
    }

    pub fn state(&self) -> ScenarioState {
        self.state
    }

    /// Index of the run being played, or of the next one.
    pub fn run_index(&self) -> usize {
        self.run_index
    }

    pub fn store(&self) -> &TelemetryStore {
        &self.store
    }

    /// Statuses produced so far, in run order.
    pub fn statuses(&self) -> &[RunStatus] {
        &self.statuses
    }

    pub fn scene_dir(&self) -> Option<&Path> {
        self.scene_dir.as_deref()
    }

    pub fn is_over(&self) -> bool {
        self.state == ScenarioState::Done
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Frames recorded by the active run.
    pub fn frames_recorded(&self) -> usize {
        self.run.as_ref().map_or(0, |r| r.log().len())
    }

    pub fn is_run_valid(&self) -> bool {
        self.run.as_ref().is_none_or(|r| r.is_valid())
    }

    /// Spawn the next real run and open its capture.
    ///
    /// No-op once the attempt is over or when the next run index is synthesized.
    pub fn play_run(&mut self, world: &mut dyn World, saver: &mut Saver) -> PhysclipResult<()> {
        if self.run.is_some() {
            return Err(PhysclipError::validation(format!(
                "run {} of {} is still in progress",
                self.run_index + 1,
                self.spec
            )));
        }
        if matches!(self.state, ScenarioState::Done | ScenarioState::Failed)
            || !self.protocol.plays(self.run_index)
        {
            return Ok(());
        }

        let index = self.run_index;
        let params = self
            .block
            .configure(&self.params, self.protocol.configuration(index))?;
        let mut run = Run::new(index, params);
        let camera = run.spawn(world)?.camera();
        let Some(camera) = camera else {
            run.teardown(world);
            return Err(PhysclipError::spawn(format!("{} has no camera", self.spec)));
        };
        if let Err(e) = saver.begin_run(camera, self.frames) {
            run.teardown(world);
            return Err(e);
        }
        if let Some(slot) = self.observer_hidden.get_mut(index) {
            *slot = run.magic_hidden();
        }

        tracing::info!(
            scene = %self.spec,
            run = index + 1,
            of = self.protocol.total_runs(),
            possible = self.protocol.is_possible(index),
            "run started"
        );
        self.run = Some(run);
        self.state = ScenarioState::RunInProgress(index);
        Ok(())
    }

    /// Advance the active run by one tick, capture it and record observer telemetry.
    ///
    /// In the trick run the block's trick is played before the world advances on each magic
    /// frame.
    pub fn tick(&mut self, world: &mut dyn World, saver: &mut Saver) -> PhysclipResult<()> {
        let index = self.run_index;
        let Some(run) = self.run.as_mut() else {
            return Ok(());
        };

        let frame = run.log().len();
        let trick_phase = if self.protocol.applies_trick(index) {
            self.params.magic_ticks().and_then(|t| t.position(frame))
        } else {
            None
        };
        if let Some(phase) = trick_phase {
            tracing::debug!(scene = %self.spec, frame, phase, "playing magic trick");
            self.block.apply_trick(&self.params, run, world, phase)?;
        }

        run.tick(world)?;
        if trick_phase.is_some() && self.policy.is_some_and(|p| p.occluded) && run.magic_visible() {
            run.invalidate(format!("magic actor visible at trick frame {frame}"));
        }
        if !run.is_valid() {
            return Ok(());
        }

        run.capture(world, saver)?;
        if self.protocol.is_observer(index)
            && let (Some(observer), Some(last)) = (Observer::from_run_index(index), run.log().last())
        {
            self.store.record(observer, run.magic_visible(), last.clone())?;
        }
        Ok(())
    }

    /// Tear the active run down and move the attempt forward.
    pub fn stop_run(
        &mut self,
        world: &mut dyn World,
        saver: &mut Saver,
        rng: &mut dyn RngCore,
    ) -> Outcome {
        match self.finish_run(world, saver, rng) {
            Ok(Some(summary)) => Outcome::Success(summary),
            Ok(None) => Outcome::NextRun,
            Err(e) => {
                self.discard(world, saver, &e);
                Outcome::from_error(e)
            }
        }
    }

    /// Drop the attempt without persisting the active run.
    pub fn abort(&mut self, world: &mut dyn World, saver: &mut Saver) {
        if let Some(mut run) = self.run.take() {
            run.teardown(world);
        }
        saver.reset();
        self.state = ScenarioState::Failed;
        tracing::info!(scene = %self.spec, run = self.run_index + 1, "scenario aborted");
    }

    fn discard(&mut self, world: &mut dyn World, saver: &mut Saver, e: &PhysclipError) {
        tracing::warn!(
            scene = %self.spec,
            run = self.run_index + 1,
            fingerprint = %self.fingerprint,
            error = %e,
            "scenario attempt discarded"
        );
        if let Some(mut run) = self.run.take() {
            run.teardown(world);
        }
        saver.reset();
        self.state = ScenarioState::Failed;
    }

    fn finish_run(
        &mut self,
        world: &mut dyn World,
        saver: &mut Saver,
        rng: &mut dyn RngCore,
    ) -> PhysclipResult<Option<SceneSummary>> {
        let index = self.run_index;
        let Some(mut run) = self.run.take() else {
            return Err(PhysclipError::validation(format!(
                "{}: no run in progress",
                self.spec
            )));
        };
        run.teardown(world);
        self.state = ScenarioState::RunComplete(index);

        if let Some(reason) = run.invalid_reason() {
            return Err(PhysclipError::invalid_run(format!("run {}: {reason}", index + 1)));
        }
        if run.log().len() != self.frames {
            return Err(PhysclipError::invalid_run(format!(
                "run {} stopped after {} of {} frames",
                index + 1,
                run.log().len(),
                self.frames
            )));
        }

        if self.protocol.resolves_ticks_after(index) {
            let ticks = self.resolve_magic_ticks(rng)?;
            tracing::info!(scene = %self.spec, ticks = ?ticks.as_slice(), "magic ticks resolved");
            self.stamp_magic_ticks()?;
        }

        let header = ScenarioHeader {
            name: self.spec.block.as_str().to_string(),
            kind: self.spec.kind.type_str().to_string(),
            is_possible: self.protocol.is_possible(index),
        };
        let dir = self.run_dir(index);
        let status = saver.finish_run(
            dir.as_deref(),
            header,
            static_actors(run.params()),
            self.params.magic.clone(),
        )?;
        self.statuses.push(status);
        tracing::debug!(scene = %self.spec, run = index + 1, "run stored");

        self.run_index += 1;
        if self.protocol.plays(self.run_index) {
            return Ok(None);
        }

        self.synthesize()?;
        self.state = ScenarioState::Done;
        tracing::info!(scene = %self.spec, runs = self.statuses.len(), "scenario done");
        Ok(Some(SceneSummary {
            spec: self.spec.clone(),
            protocol: self.protocol,
            fingerprint: self.fingerprint,
            magic_ticks: self.params.magic_ticks().cloned(),
            runs: self.statuses.clone(),
            dir: self.scene_dir.clone(),
        }))
    }

    /// Pick the magic ticks from the observer runs and store them in the parameters.
    #[tracing::instrument(skip_all, fields(scene = %self.spec))]
    fn resolve_magic_ticks(&mut self, rng: &mut dyn RngCore) -> PhysclipResult<MagicTicks> {
        let Some(policy) = self.policy else {
            return Err(PhysclipError::validation("train scenes have no magic tick"));
        };
        let (first, second) = self.store.visibility_pair()?;
        // A configuration that hides the magic actor from the start says nothing about where it
        // could be seen; use the other observer's series for both.
        let (first, second) = match self.observer_hidden {
            [false, true] => (first, first),
            [true, false] => (second, second),
            _ => (first, second),
        };
        let candidates = policy.candidates(first, second)?;
        tracing::debug!(?candidates, "magic tick candidates");

        let (la, lb) = self.store.location_pair()?;
        let magic = self.params.magic_actor_name();
        if self.check_run_bounds {
            for frame in [0, la.len().saturating_sub(1)] {
                if !compare_frame_excluding(la, lb, frame, magic) {
                    return Err(PhysclipError::frame_mismatch(format!(
                        "observer runs differ at frame {frame}"
                    )));
                }
            }
        }
        let excluded = if self.block.compares_magic_actor() {
            None
        } else {
            magic
        };
        let ticks = choose_ticks(&candidates, rng, |ticks| {
            ticks
                .iter()
                .all(|&t| compare_frame_excluding(la, lb, t, excluded))
        })?;

        self.params.set_magic_ticks(ticks.clone())?;
        Ok(ticks)
    }

    /// Rewrite statuses stored before the magic ticks were known.
    fn stamp_magic_ticks(&mut self) -> PhysclipResult<()> {
        for (index, status) in self.statuses.iter_mut().enumerate() {
            if status.header.magic == self.params.magic {
                continue;
            }
            status.header.magic = self.params.magic.clone();
            if let Some(scene_dir) = self.scene_dir.as_deref() {
                status.write(&run_dir(scene_dir, false, index).join(STATUS_FILE))?;
            }
        }
        Ok(())
    }

    /// Splice the synthetic runs of the protocol from the recorded ones.
    #[tracing::instrument(skip_all, fields(scene = %self.spec, protocol = %self.protocol))]
    fn synthesize(&mut self) -> PhysclipResult<()> {
        // Source runs A and B, then each synthetic run with the source of its first segment.
        let (a, b, outputs) = match self.protocol {
            Protocol::Train => return Ok(()),
            Protocol::MirrorMagic => (0, 1, vec![(2, Source::A), (3, Source::B)]),
            Protocol::FullMagic => (1, 0, vec![(3, Source::A)]),
        };
        let ticks = self
            .params
            .magic_ticks()
            .ok_or_else(|| PhysclipError::validation("magic ticks are not resolved"))?;
        let boundary = SpliceBoundary::new(ticks.as_slice(), self.frames)?;
        let (c, d) = splice_metadata(self.status(a)?, self.status(b)?, &boundary)?;

        if let Some(scene_dir) = self.scene_dir.as_deref() {
            let dests: Vec<(PathBuf, Source)> = outputs
                .iter()
                .map(|&(index, first)| (run_dir(scene_dir, false, index), first))
                .collect();
            let dests: Vec<(&Path, Source)> =
                dests.iter().map(|(dir, first)| (dir.as_path(), *first)).collect();
            splice_media(
                &run_dir(scene_dir, false, a),
                &run_dir(scene_dir, false, b),
                &boundary,
                &dests,
            )?;
        }

        for (index, first) in outputs {
            let status = match first {
                Source::A => c.clone(),
                Source::B => d.clone(),
            };
            if let Some(scene_dir) = self.scene_dir.as_deref() {
                status.write(&run_dir(scene_dir, false, index).join(STATUS_FILE))?;
            }
            self.statuses.push(status);
        }
        Ok(())
    }

    fn status(&self, index: usize) -> PhysclipResult<&RunStatus> {
        self.statuses.get(index).ok_or_else(|| {
            PhysclipError::length_mismatch(format!("run {} has no status", index + 1))
        })
    }

    fn run_dir(&self, index: usize) -> Option<PathBuf> {
        self.scene_dir
            .as_deref()
            .map(|dir| run_dir(dir, self.spec.kind.is_train(), index))
    }
}

/// Parameters of actors that never move, for status headers.
fn static_actors(params: &SceneParams) -> BTreeMap<String, ActorParams> {
    params
        .actors
        .iter()
        .filter(|(_, p)| !p.role().is_moving())
        .map(|(name, p)| (name.clone(), p.clone()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scenario/machine.rs"]
mod tests;
