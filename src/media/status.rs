use crate::foundation::core::{Rotator, Vec3};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::scene::params::{ActorParams, MagicSpec, Mesh};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Scenario identity written at the top of every `status.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioHeader {
    /// Block name, e.g. `O1`.
    pub name: String,
    /// `train` or `test`.
    #[serde(rename = "type")]
    pub kind: String,
    pub is_possible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusHeader {
    #[serde(flatten)]
    pub scenario: ScenarioHeader,
    /// Parameters of camera, floor, light and walls.
    pub static_actors: BTreeMap<String, ActorParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<MagicSpec>,
    pub max_depth: f64,
    pub masks: BTreeMap<String, u8>,
}

/// State of one moving actor in one captured frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorStatus {
    pub location: Vec3,
    pub rotation: Rotator,
    pub visible: bool,
    pub hidden: bool,
    pub mesh: Mesh,
    #[serde(default)]
    pub material: Option<String>,
}

/// Actor name to status, for one frame.
pub type FrameStatus = BTreeMap<String, ActorStatus>;

/// Contents of a run's `status.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub header: StatusHeader,
    pub frames: Vec<FrameStatus>,
}

impl RunStatus {
    pub fn from_reader<R: std::io::Read>(reader: R) -> PhysclipResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| PhysclipError::serde(format!("status parse failed: {e}")))
    }

    pub fn from_path(path: &Path) -> PhysclipResult<Self> {
        let f = std::fs::File::open(path).map_err(|e| {
            PhysclipError::media_save(format!("open status {}: {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Write as pretty JSON, creating the parent directory.
    pub fn write(&self, path: &Path) -> PhysclipResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PhysclipError::media_save(format!("create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| PhysclipError::serde(format!("status encode failed: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| PhysclipError::media_save(format!("write {}: {e}", path.display())))
    }
}
