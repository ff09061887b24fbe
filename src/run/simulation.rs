use crate::foundation::core::Vec3;
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::media::saver::Saver;
use crate::media::status::{ActorStatus, FrameStatus};
use crate::run::telemetry::{ActorSample, TelemetryFrame, TelemetryLog};
use crate::scene::params::{ActorKind, ActorRole, Mesh, SceneParams};
use crate::world::{ActorHandle, CameraView, CaptureActor, CaptureRequest, World};
use std::collections::BTreeMap;

/// Objects closer than this fraction of their summed radii overlap.
const OVERLAP_RATIO: f64 = 0.9;

/// Live actors of a spawned run.
#[derive(Clone, Debug, Default)]
pub struct ActorTable {
    handles: BTreeMap<String, ActorHandle>,
    camera: Option<ActorHandle>,
    always_ignored: Vec<ActorHandle>,
}

impl ActorTable {
    pub fn get(&self, name: &str) -> Option<ActorHandle> {
        self.handles.get(name).copied()
    }

    pub fn camera(&self) -> Option<ActorHandle> {
        self.camera
    }

    /// Walls, floor, light and camera: never treated as occluders.
    pub fn always_ignored(&self) -> &[ActorHandle] {
        &self.always_ignored
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ActorHandle)> {
        self.handles.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// One simulation pass of a scenario.
#[derive(Debug)]
pub struct Run {
    ordinal: usize,
    params: SceneParams,
    actors: Option<ActorTable>,
    log: TelemetryLog,
    invalid: Option<String>,
    torn_down: bool,
    magic_hidden: bool,
    magic_mesh: Option<Mesh>,
}

impl Run {
    pub fn new(ordinal: usize, params: SceneParams) -> Self {
        let magic = params.magic_actor_name().and_then(|m| params.actor(m));
        let magic_hidden = magic.is_some_and(|p| p.hidden);
        let magic_mesh = magic.map(|p| p.mesh);
        Self {
            ordinal,
            params,
            actors: None,
            log: TelemetryLog::new(),
            invalid: None,
            torn_down: false,
            magic_hidden,
            magic_mesh,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn actors(&self) -> Option<&ActorTable> {
        self.actors.as_ref()
    }

    pub fn log(&self) -> &TelemetryLog {
        &self.log
    }

    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid.as_deref()
    }

    /// Mark the run invalid; the first reason wins.
    pub fn invalidate(&mut self, reason: impl Into<String>) {
        if self.invalid.is_none() {
            let reason = reason.into();
            tracing::warn!(run = self.ordinal, %reason, "run invalidated");
            self.invalid = Some(reason);
        }
    }

    /// Spawn one live actor per parameter entry.
    ///
    /// On failure every actor spawned so far is destroyed and the error is returned unchanged.
    pub fn spawn(&mut self, world: &mut dyn World) -> PhysclipResult<&ActorTable> {
        if self.actors.is_some() || self.torn_down {
            return Err(PhysclipError::validation(format!(
                "run {} cannot be spawned twice",
                self.ordinal
            )));
        }

        let mut table = ActorTable::default();
        for (name, p) in &self.params.actors {
            let handle = match world.spawn_actor(name, p) {
                Ok(h) => h,
                Err(e) => {
                    for (spawned, h) in table.iter() {
                        if let Err(e) = world.destroy_actor(h) {
                            tracing::warn!(run = self.ordinal, actor = spawned, error = %e, "destroy failed");
                        }
                    }
                    return Err(e);
                }
            };
            match p.role() {
                ActorRole::Camera => {
                    table.camera = Some(handle);
                    table.always_ignored.push(handle);
                }
                ActorRole::Floor | ActorRole::Walls | ActorRole::Light => {
                    table.always_ignored.push(handle)
                }
                ActorRole::Object | ActorRole::Occluder => {}
            }
            table.handles.insert(name.clone(), handle);
        }

        tracing::debug!(run = self.ordinal, actors = table.len(), "spawned run");
        Ok(self.actors.insert(table))
    }

    /// Advance the world one step and append a telemetry frame.
    ///
    /// A lost actor or an overlap between objects invalidates the run; the frame is still
    /// appended when every actor could be sampled.
    pub fn tick(&mut self, world: &mut dyn World) -> PhysclipResult<()> {
        let Some(table) = self.actors.as_ref() else {
            return Ok(());
        };
        world.advance();

        let mut frame = TelemetryFrame {
            tick: self.log.len(),
            actors: BTreeMap::new(),
        };
        let mut lost = None;
        for name in self.params.moving_names() {
            let Some(handle) = table.get(name) else {
                lost = Some(format!("actor '{name}' has no live handle"));
                break;
            };
            let sample = world.transform(handle).and_then(|transform| {
                let visible = world.is_visible_in_frame(handle, table.always_ignored())?;
                Ok(ActorSample { transform, visible })
            });
            match sample {
                Ok(s) => {
                    frame.actors.insert(name.to_string(), s);
                }
                Err(e) => {
                    lost = Some(format!("actor '{name}' lost at tick {}: {e}", frame.tick));
                    break;
                }
            }
        }
        if let Some(reason) = lost {
            self.invalidate(reason);
            return Ok(());
        }

        if let Some(reason) = self.overlap(&frame) {
            self.invalidate(reason);
        }
        self.log.push(frame)
    }

    fn overlap(&self, frame: &TelemetryFrame) -> Option<String> {
        let objects: Vec<(&str, f64, Vec3)> = self
            .params
            .names_with_role(ActorRole::Object)
            .filter_map(|n| {
                let p = self.params.actor(n)?;
                let s = frame.actors.get(n)?;
                Some((n, p.radius(), s.transform.location))
            })
            .collect();
        for (i, (a, ra, la)) in objects.iter().enumerate() {
            for (b, rb, lb) in &objects[i + 1..] {
                if la.distance(*lb) < (ra + rb) * OVERLAP_RATIO {
                    return Some(format!("{a} overlaps {b} at tick {}", frame.tick));
                }
            }
        }
        None
    }

    /// Capture the current tick through the saver.
    ///
    /// The magic actor joins the ignored set while it is hidden.
    pub fn capture(&self, world: &dyn World, saver: &mut Saver) -> PhysclipResult<()> {
        let Some(table) = self.actors.as_ref() else {
            return Ok(());
        };
        let frame = self.log.len().saturating_sub(1);
        let last = self.log.last();

        let mut ignored = table.always_ignored().to_vec();
        let magic = self.params.magic_actor_name();
        if self.magic_hidden
            && let Some(h) = magic.and_then(|m| table.get(m))
        {
            ignored.push(h);
        }

        let camera = self.camera_view(world)?;
        let mut actors = Vec::new();
        let mut status = FrameStatus::new();
        for name in self.params.moving_names() {
            let (Some(handle), Some(p)) = (table.get(name), self.params.actor(name)) else {
                continue;
            };
            let transform = match last.and_then(|f| f.actors.get(name)) {
                Some(s) => s.transform,
                None => world.transform(handle)?,
            };
            let is_magic = magic == Some(name);
            let hidden = if is_magic { self.magic_hidden } else { p.hidden };
            let mesh = if is_magic {
                self.magic_mesh.unwrap_or(p.mesh)
            } else {
                p.mesh
            };
            let visible = last
                .and_then(|f| f.actors.get(name))
                .is_some_and(|s| s.visible);

            actors.push(CaptureActor {
                name,
                handle,
                role: p.role(),
                transform,
                params: p,
                mesh,
                hidden,
            });
            status.insert(
                name.to_string(),
                ActorStatus {
                    location: transform.location,
                    rotation: transform.rotation,
                    visible,
                    hidden,
                    mesh,
                    material: p.material.clone(),
                },
            );
        }

        let request = CaptureRequest {
            frame,
            camera,
            ignored: &ignored,
            actors,
        };
        saver.capture(&request, status)
    }

    fn camera_view(&self, world: &dyn World) -> PhysclipResult<CameraView> {
        let table = self
            .actors
            .as_ref()
            .ok_or_else(|| PhysclipError::validation("run is not spawned"))?;
        let (Some(handle), Some(p)) = (
            table.camera(),
            self.params
                .names_with_role(ActorRole::Camera)
                .next()
                .and_then(|n| self.params.actor(n)),
        ) else {
            return Err(PhysclipError::validation("scene has no camera"));
        };
        let ActorKind::Camera {
            field_of_view,
            aspect_ratio,
        } = p.kind
        else {
            return Err(PhysclipError::validation("camera actor has no projection"));
        };
        Ok(CameraView {
            location: world.transform(handle)?.location,
            field_of_view,
            aspect_ratio,
        })
    }

    /// Destroy every live actor and return the accumulated log.
    ///
    /// Calling it again is a no-op returning the same log.
    pub fn teardown(&mut self, world: &mut dyn World) -> &TelemetryLog {
        if let Some(table) = self.actors.take() {
            for (name, h) in table.iter() {
                if let Err(e) = world.destroy_actor(h) {
                    tracing::warn!(run = self.ordinal, actor = name, error = %e, "destroy failed");
                }
            }
            tracing::debug!(run = self.ordinal, frames = self.log.len(), "run torn down");
        }
        self.torn_down = true;
        &self.log
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn magic_handle(&self) -> PhysclipResult<ActorHandle> {
        self.params
            .magic_actor_name()
            .and_then(|m| self.actors.as_ref()?.get(m))
            .ok_or_else(|| PhysclipError::validation(format!("run {} has no live magic actor", self.ordinal)))
    }

    pub fn magic_hidden(&self) -> bool {
        self.magic_hidden
    }

    pub fn magic_mesh(&self) -> Option<Mesh> {
        self.magic_mesh
    }

    /// Whether the magic actor was visible in the most recent frame.
    pub fn magic_visible(&self) -> bool {
        match (self.params.magic_actor_name(), self.log.last()) {
            (Some(m), Some(f)) => f.actors.get(m).is_some_and(|s| s.visible),
            _ => false,
        }
    }

    pub fn set_magic_hidden(&mut self, world: &mut dyn World, hidden: bool) -> PhysclipResult<()> {
        let h = self.magic_handle()?;
        world.set_hidden(h, hidden)?;
        self.magic_hidden = hidden;
        Ok(())
    }

    pub fn set_magic_mesh(&mut self, world: &mut dyn World, mesh: Mesh) -> PhysclipResult<()> {
        let h = self.magic_handle()?;
        world.set_mesh(h, mesh)?;
        self.magic_mesh = Some(mesh);
        Ok(())
    }

    /// Teleport the magic actor by `delta`.
    pub fn displace_magic(&mut self, world: &mut dyn World, delta: Vec3) -> PhysclipResult<()> {
        let h = self.magic_handle()?;
        let at = world.transform(h)?.location;
        world.set_location(h, at + delta)
    }

    pub fn push_magic(&mut self, world: &mut dyn World, impulse: Vec3) -> PhysclipResult<()> {
        let h = self.magic_handle()?;
        world.apply_force(h, impulse)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/run/simulation.rs"]
mod tests;
