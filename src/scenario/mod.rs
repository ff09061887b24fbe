//! Scene attempts as explicit state machines.
//!
//! A [`Scenario`] pairs a [`Protocol`] (which runs are simulated, which are spliced) with a
//! [`crate::block::Block`] (how parameters and tricks look) and reports an [`Outcome`] each time
//! a run stops.

pub mod machine;
pub mod protocol;

pub use machine::{Outcome, Scenario, ScenarioState, SceneSummary, generate_parameters};
pub use protocol::Protocol;
