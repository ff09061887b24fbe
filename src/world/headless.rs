use crate::foundation::core::{Rotator, TICK_SECONDS, Transform, Vec3};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::scene::params::{ActorKind, ActorParams, ActorRole, Mesh};
use crate::world::{ActorHandle, CameraView, World};
use std::collections::BTreeMap;

const GRAVITY_Z: f64 = -980.0;
/// Vertical speed below which a bounce comes to rest.
const REST_SPEED: f64 = 20.0;
const OCCLUDER_HALF_WIDTH: f64 = 200.0;
const OCCLUDER_HEIGHT: f64 = 200.0;

/// Fall/rise animation state of an occluder.
///
/// Roll 0 is standing, roll 90 is lying on the floor. Each tick listed in `moves` starts a fall
/// (when standing) or a rise (when lying); a move tick reached mid-motion reverses it.
#[derive(Clone, Debug, PartialEq)]
struct OccluderMotion {
    moves: Vec<u32>,
    speed: f64,
    count: i64,
    moving: bool,
    up: bool,
}

impl OccluderMotion {
    fn new(moves: Vec<u32>, speed: f64, roll: f64) -> Self {
        Self {
            moves,
            speed,
            count: -1,
            moving: false,
            up: roll < 90.0,
        }
    }

    fn step(&mut self, rotation: &mut Rotator) {
        self.count += 1;
        let at_move = u32::try_from(self.count).is_ok_and(|c| self.moves.contains(&c));
        if at_move {
            if self.moving {
                self.up = !self.up;
            }
            self.moving = true;
        } else if !self.moving {
            return;
        }

        if self.up {
            rotation.roll += self.speed;
        } else {
            rotation.roll -= self.speed;
        }

        if rotation.roll >= 90.0 {
            rotation.roll = 90.0;
            self.up = false;
            self.moving = false;
        } else if rotation.roll <= 0.0 {
            rotation.roll = 0.0;
            self.up = true;
            self.moving = false;
        }
    }
}

#[derive(Clone, Debug)]
struct Body {
    name: String,
    params: ActorParams,
    location: Vec3,
    rotation: Rotator,
    velocity: Vec3,
    hidden: bool,
    mesh: Mesh,
    occluder: Option<OccluderMotion>,
}

impl Body {
    fn radius(&self) -> f64 {
        50.0 * self.params.scale.z
    }

    fn step(&mut self) {
        if let Some(motion) = self.occluder.as_mut() {
            motion.step(&mut self.rotation);
            return;
        }
        if self.params.role() != ActorRole::Object {
            return;
        }

        let r = self.radius();
        let resting = self.location.z <= r && self.velocity.z == 0.0;
        if !resting {
            self.velocity.z += GRAVITY_Z * TICK_SECONDS;
        }
        self.location += self.velocity * TICK_SECONDS;

        if self.location.z < r {
            self.location.z = r;
            let bounce = -self.velocity.z * self.params.restitution;
            self.velocity.z = if bounce.abs() < REST_SPEED { 0.0 } else { bounce };
        }
        if self.location.z <= r {
            // Rolling on the floor.
            self.rotation.roll += (self.velocity.y * TICK_SECONDS / r).to_degrees();
            self.rotation.pitch -= (self.velocity.x * TICK_SECONDS / r).to_degrees();
        }
    }

    /// Vertical extent of a standing-or-falling occluder wall.
    fn occluder_height(&self) -> f64 {
        OCCLUDER_HEIGHT * self.params.scale.z * self.rotation.roll.to_radians().cos().max(0.0)
    }

    fn occluder_half_width(&self) -> f64 {
        OCCLUDER_HALF_WIDTH * self.params.scale.y
    }
}

/// Deterministic rigid-body stand-in.
///
/// Objects integrate gravity and bounce on the floor plane, occluders run their fall/rise
/// animation, and visibility is a line-of-sight test against occluder walls inside the camera's
/// horizontal and vertical field of view. Identical inputs yield bit-identical transforms.
#[derive(Debug, Default)]
pub struct HeadlessWorld {
    bodies: BTreeMap<u64, Body>,
    next_handle: u64,
    paused: bool,
    ticks: u64,
    reject: Option<String>,
}

impl HeadlessWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later spawn of an actor called `name` fail.
    pub fn reject_spawn_of(&mut self, name: impl Into<String>) {
        self.reject = Some(name.into());
    }

    pub fn live_actors(&self) -> usize {
        self.bodies.len()
    }

    /// Ticks advanced since creation, paused ticks excluded.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn camera_view(&self) -> Option<CameraView> {
        self.camera().and_then(|cam| match cam.params.kind {
            ActorKind::Camera {
                field_of_view,
                aspect_ratio,
            } => Some(CameraView {
                location: cam.location,
                field_of_view,
                aspect_ratio,
            }),
            _ => None,
        })
    }

    fn camera(&self) -> Option<&Body> {
        self.bodies
            .values()
            .rev()
            .find(|b| b.params.role() == ActorRole::Camera)
    }

    fn body(&self, handle: ActorHandle) -> PhysclipResult<&Body> {
        self.bodies
            .get(&handle.0)
            .ok_or_else(|| PhysclipError::invalid_run(format!("unknown actor handle {}", handle.0)))
    }

    fn body_mut(&mut self, handle: ActorHandle) -> PhysclipResult<&mut Body> {
        self.bodies
            .get_mut(&handle.0)
            .ok_or_else(|| PhysclipError::invalid_run(format!("unknown actor handle {}", handle.0)))
    }
}

impl World for HeadlessWorld {
    fn spawn_actor(&mut self, name: &str, params: &ActorParams) -> PhysclipResult<ActorHandle> {
        if self.reject.as_deref() == Some(name) {
            return Err(PhysclipError::spawn(format!("world rejected actor '{name}'")));
        }
        if self.bodies.values().any(|b| b.name == name) {
            return Err(PhysclipError::spawn(format!("actor '{name}' is already alive")));
        }
        if !params.location.is_finite() {
            return Err(PhysclipError::spawn(format!(
                "actor '{name}' has a non-finite location"
            )));
        }

        let mut location = params.location;
        let occluder = match &params.kind {
            ActorKind::Occluder { moves, speed } => {
                Some(OccluderMotion::new(moves.clone(), *speed, params.rotation.roll))
            }
            _ => None,
        };
        if params.role() == ActorRole::Object {
            location.z = location.z.max(50.0 * params.scale.z);
        }
        let velocity = if params.role() == ActorRole::Object && params.mass > 0.0 {
            params.force / params.mass
        } else {
            Vec3::ZERO
        };

        let handle = ActorHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle.0,
            Body {
                name: name.to_string(),
                params: params.clone(),
                location,
                rotation: params.rotation,
                velocity,
                hidden: params.hidden,
                mesh: params.mesh,
                occluder,
            },
        );
        tracing::trace!(name, handle = handle.0, "spawned actor");
        Ok(handle)
    }

    fn destroy_actor(&mut self, handle: ActorHandle) -> PhysclipResult<()> {
        self.bodies
            .remove(&handle.0)
            .map(|_| ())
            .ok_or_else(|| PhysclipError::invalid_run(format!("unknown actor handle {}", handle.0)))
    }

    fn transform(&self, handle: ActorHandle) -> PhysclipResult<Transform> {
        let b = self.body(handle)?;
        Ok(Transform::new(b.location, b.rotation))
    }

    fn is_visible_in_frame(&self, handle: ActorHandle, ignored: &[ActorHandle]) -> PhysclipResult<bool> {
        let target = self.body(handle)?;
        if target.hidden {
            return Ok(false);
        }
        let Some(view) = self.camera_view() else {
            return Ok(false);
        };

        let d = target.location - view.location;
        if d.x <= 0.0 {
            return Ok(false);
        }
        let half = (view.field_of_view.to_radians() / 2.0).tan();
        if d.y.abs() > d.x * half || d.z.abs() > d.x * half / view.aspect_ratio.max(f64::EPSILON) {
            return Ok(false);
        }

        for (&id, occ) in &self.bodies {
            if id == handle.0
                || occ.hidden
                || occ.params.role() != ActorRole::Occluder
                || ignored.contains(&ActorHandle(id))
            {
                continue;
            }
            let dx = occ.location.x - view.location.x;
            if dx <= 0.0 || dx >= d.x {
                continue;
            }
            let s = dx / d.x;
            let p = view.location + d * s;
            let within_width = (p.y - occ.location.y).abs() <= occ.occluder_half_width();
            let below_top = p.z >= occ.location.z && p.z <= occ.location.z + occ.occluder_height();
            if within_width && below_top {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn apply_force(&mut self, handle: ActorHandle, force: Vec3) -> PhysclipResult<()> {
        let b = self.body_mut(handle)?;
        if b.params.mass > 0.0 {
            b.velocity += force / b.params.mass;
        }
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn advance(&mut self) {
        if self.paused {
            return;
        }
        self.ticks += 1;
        for body in self.bodies.values_mut() {
            body.step();
        }
    }

    fn set_hidden(&mut self, handle: ActorHandle, hidden: bool) -> PhysclipResult<()> {
        self.body_mut(handle)?.hidden = hidden;
        Ok(())
    }

    fn set_mesh(&mut self, handle: ActorHandle, mesh: Mesh) -> PhysclipResult<()> {
        self.body_mut(handle)?.mesh = mesh;
        Ok(())
    }

    fn set_location(&mut self, handle: ActorHandle, location: Vec3) -> PhysclipResult<()> {
        self.body_mut(handle)?.location = location;
        Ok(())
    }
}

impl HeadlessWorld {
    /// Current mesh and hidden flag, as a capture backend would render them.
    pub fn appearance(&self, handle: ActorHandle) -> PhysclipResult<(Mesh, bool)> {
        let b = self.body(handle)?;
        Ok((b.mesh, b.hidden))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/world/headless.rs"]
mod tests;
