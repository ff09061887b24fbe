//! Simulation collaborators.
//!
//! The generator never simulates physics itself: a [`World`] owns rigid bodies and reports
//! transforms and visibility, a [`CaptureBackend`] turns captured frames into image files. Real
//! engines implement both traits; [`headless`] and [`capture`] provide deterministic stand-ins.

use crate::foundation::core::{Transform, Vec3};
use crate::foundation::error::PhysclipResult;
use crate::scene::params::{ActorParams, ActorRole, Mesh};
use std::collections::BTreeMap;
use std::path::Path;

pub mod capture;
pub mod headless;

/// Opaque identifier of a live actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub u64);

/// The simulated world, queried and driven one tick at a time.
pub trait World {
    /// Instantiate one actor from fully populated parameters.
    fn spawn_actor(&mut self, name: &str, params: &ActorParams) -> PhysclipResult<ActorHandle>;
    fn destroy_actor(&mut self, handle: ActorHandle) -> PhysclipResult<()>;
    fn transform(&self, handle: ActorHandle) -> PhysclipResult<Transform>;
    /// Whether the actor shows in the camera frame, treating `ignored` actors as transparent.
    fn is_visible_in_frame(&self, handle: ActorHandle, ignored: &[ActorHandle]) -> PhysclipResult<bool>;
    /// Apply an instantaneous impulse.
    fn apply_force(&mut self, handle: ActorHandle, force: Vec3) -> PhysclipResult<()>;
    fn set_paused(&mut self, paused: bool);
    fn is_paused(&self) -> bool;
    /// Advance the simulation by one tick. No-op while paused.
    fn advance(&mut self);
    fn set_hidden(&mut self, handle: ActorHandle, hidden: bool) -> PhysclipResult<()>;
    fn set_mesh(&mut self, handle: ActorHandle, mesh: Mesh) -> PhysclipResult<()>;
    fn set_location(&mut self, handle: ActorHandle, location: Vec3) -> PhysclipResult<()>;
}

/// Camera projection used by captures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub location: Vec3,
    pub field_of_view: f64,
    pub aspect_ratio: f64,
}

/// One actor as the capture backend should draw it.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureActor<'a> {
    pub name: &'a str,
    pub handle: ActorHandle,
    pub role: ActorRole,
    pub transform: Transform,
    pub params: &'a ActorParams,
    pub mesh: Mesh,
    pub hidden: bool,
}

/// Everything needed to capture one frame.
#[derive(Clone, Debug)]
pub struct CaptureRequest<'a> {
    pub frame: usize,
    pub camera: CameraView,
    /// Actors left out of the masks image.
    pub ignored: &'a [ActorHandle],
    pub actors: Vec<CaptureActor<'a>>,
}

/// Result of persisting a run's captured frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveReport {
    pub ok: bool,
    pub max_depth: f64,
    /// Actor name to the gray level it has in the masks images.
    pub masks: BTreeMap<String, u8>,
}

/// Screenshot/pixel capture collaborator.
pub trait CaptureBackend {
    fn begin_capture(&mut self, camera: ActorHandle, frame_count: usize) -> PhysclipResult<()>;
    fn capture_frame(&mut self, request: &CaptureRequest<'_>) -> PhysclipResult<()>;
    /// Write `scene`, `depth` and `masks` images of the captured frames under `output_dir`.
    fn save_run(&mut self, output_dir: &Path) -> PhysclipResult<SaveReport>;
    fn reset_buffers(&mut self);
    fn captured_frames(&self) -> usize;
}
