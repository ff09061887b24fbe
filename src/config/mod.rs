//! Generator settings and the scene-list input.

pub mod scene_list;
pub mod settings;

pub use scene_list::{SceneList, ScenarioSpec};
pub use settings::GeneratorConfig;
