//! Scene parameters: typed actor records, the random generator that fills them and a stable
//! fingerprint used to identify an attempt.

pub mod class;
pub mod fingerprint;
pub mod generate;
pub mod materials;
pub mod params;
