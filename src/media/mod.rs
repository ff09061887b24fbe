//! On-disk output: directory layout, `status.json` metadata and the per-run [`saver::Saver`].

pub mod layout;
pub mod saver;
pub mod status;
