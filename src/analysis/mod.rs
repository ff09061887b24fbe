//! Magic-tick discovery over recorded visibility series.
//!
//! [`visibility`] holds the pure index-list primitives, [`policy`] composes them into candidate
//! sets per test class and picks ticks among the candidates with a caller-provided random source.

pub mod policy;
pub mod visibility;
