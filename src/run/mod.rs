//! One simulation pass and the telemetry it records.

pub mod simulation;
pub mod telemetry;

pub use simulation::{ActorTable, Run};
pub use telemetry::{ActorSample, CheckCategory, Observer, TelemetryFrame, TelemetryLog, TelemetryStore};
