use crate::foundation::error::{PhysclipError, PhysclipResult};
use serde::{Deserialize, Serialize};

/// Motion class of a test scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Objects rest on the floor.
    Static,
    /// Objects cross the view, one trick.
    #[serde(rename = "dynamic_1")]
    Dynamic1,
    /// Objects cross the view, two tricks.
    #[serde(rename = "dynamic_2")]
    Dynamic2,
}

impl Motion {
    pub const ALL: [Motion; 3] = [Motion::Static, Motion::Dynamic1, Motion::Dynamic2];

    pub fn as_str(self) -> &'static str {
        match self {
            Motion::Static => "static",
            Motion::Dynamic1 => "dynamic_1",
            Motion::Dynamic2 => "dynamic_2",
        }
    }

    pub fn is_dynamic(self) -> bool {
        !matches!(self, Motion::Static)
    }

    /// Number of magic ticks injected in a scene of this class.
    pub fn trick_count(self) -> usize {
        match self {
            Motion::Dynamic2 => 2,
            Motion::Static | Motion::Dynamic1 => 1,
        }
    }
}

impl std::str::FromStr for Motion {
    type Err = PhysclipError;

    fn from_str(s: &str) -> PhysclipResult<Self> {
        Motion::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| PhysclipError::validation(format!("unknown motion class '{s}'")))
    }
}

/// Occlusion + motion class of a test scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestClass {
    /// Whether the magic actor is behind an occluder at the magic tick.
    pub occluded: bool,
    pub motion: Motion,
}

impl TestClass {
    pub fn new(occluded: bool, motion: Motion) -> Self {
        Self { occluded, motion }
    }

    pub fn occlusion_str(&self) -> &'static str {
        if self.occluded { "occluded" } else { "visible" }
    }
}

impl std::fmt::Display for TestClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.occlusion_str(), self.motion.as_str())
    }
}

/// Train scenes are single possible runs, test scenes carry magic tricks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioKind {
    Train,
    Test(TestClass),
}

impl ScenarioKind {
    pub fn is_train(&self) -> bool {
        matches!(self, ScenarioKind::Train)
    }

    /// `train` or `test`, as used in directory names and status headers.
    pub fn type_str(&self) -> &'static str {
        match self {
            ScenarioKind::Train => "train",
            ScenarioKind::Test(_) => "test",
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioKind::Train => f.write_str("train"),
            ScenarioKind::Test(class) => write!(f, "test {class}"),
        }
    }
}
