#![forbid(unsafe_code)]
//! Procedural generation of intuitive-physics test clips.
//!
//! A [`director::Director`] plays an ordered list of scenes against a [`world::World`]. Each
//! scene is a [`scenario::Scenario`]: real runs are simulated and captured, magic ticks are
//! derived from the observer runs' telemetry, and impossible runs are spliced from recorded ones
//! by frame index.

pub mod analysis;
pub mod block;
pub mod config;
pub mod director;
pub mod foundation;
pub mod media;
pub mod run;
pub mod scenario;
pub mod scene;
pub mod splice;
pub mod world;

pub use block::{Block, BlockId};
pub use config::{GeneratorConfig, ScenarioSpec, SceneList};
pub use director::{Director, DirectorStatus, SceneReport};
pub use foundation::core::{Resolution, Rotator, Transform, Vec3};
pub use foundation::error::{PhysclipError, PhysclipResult, Severity};
pub use media::saver::Saver;
pub use scenario::{Outcome, Protocol, Scenario, SceneSummary};
pub use scene::params::{ActorParams, MagicTicks, SceneParams};
pub use world::{CaptureBackend, World};
