//! Synthesis of impossible runs from two real ones, by index only.

pub mod boundary;
pub mod compare;
pub mod splicer;

pub use boundary::{Source, SpliceBoundary};
pub use compare::{compare_frame, compare_frame_excluding};
pub use splicer::{splice_media, splice_metadata};
