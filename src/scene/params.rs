use crate::foundation::core::{Rotator, Vec3};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Actor role, derived from [`ActorKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Camera,
    Light,
    Floor,
    Walls,
    Object,
    Occluder,
}

impl ActorRole {
    /// Moving actors are ticked, tracked in telemetry and written to per-frame status.
    pub fn is_moving(self) -> bool {
        matches!(self, ActorRole::Object | ActorRole::Occluder)
    }
}

/// Static mesh of an object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mesh {
    #[default]
    Sphere,
    Cube,
    Cone,
}

impl Mesh {
    pub const ALL: [Mesh; 3] = [Mesh::Sphere, Mesh::Cube, Mesh::Cone];

    pub fn as_str(self) -> &'static str {
        match self {
            Mesh::Sphere => "Sphere",
            Mesh::Cube => "Cube",
            Mesh::Cone => "Cone",
        }
    }
}

/// Role-specific actor fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ActorKind {
    Camera { field_of_view: f64, aspect_ratio: f64 },
    Light { light_type: String },
    Floor,
    Walls { length: f64, depth: f64, height: f64 },
    Object,
    Occluder {
        /// Ticks at which the occluder starts falling or rising.
        moves: Vec<u32>,
        /// Roll degrees per tick while moving.
        speed: f64,
    },
}

impl ActorKind {
    pub fn role(&self) -> ActorRole {
        match self {
            ActorKind::Camera { .. } => ActorRole::Camera,
            ActorKind::Light { .. } => ActorRole::Light,
            ActorKind::Floor => ActorRole::Floor,
            ActorKind::Walls { .. } => ActorRole::Walls,
            ActorKind::Object => ActorRole::Object,
            ActorKind::Occluder { .. } => ActorRole::Occluder,
        }
    }
}

/// Spawn parameters of one actor. Never mutated once a run has started.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorParams {
    #[serde(flatten)]
    pub kind: ActorKind,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub mesh: Mesh,
    #[serde(default)]
    pub location: Vec3,
    #[serde(default)]
    pub rotation: Rotator,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default = "one")]
    pub mass: f64,
    #[serde(default = "half")]
    pub friction: f64,
    #[serde(default = "half")]
    pub restitution: f64,
    /// Initial impulse applied right after spawn.
    #[serde(default)]
    pub force: Vec3,
    #[serde(default)]
    pub hidden: bool,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

fn one() -> f64 {
    1.0
}

fn half() -> f64 {
    0.5
}

impl ActorParams {
    /// Parameters with engine defaults for the given role.
    pub fn new(kind: ActorKind) -> Self {
        Self {
            kind,
            material: None,
            mesh: Mesh::Sphere,
            location: Vec3::ZERO,
            rotation: Rotator::default(),
            scale: unit_scale(),
            mass: one(),
            friction: half(),
            restitution: half(),
            force: Vec3::ZERO,
            hidden: false,
        }
    }

    pub fn object(mesh: Mesh, material: impl Into<String>) -> Self {
        Self {
            mesh,
            material: Some(material.into()),
            ..Self::new(ActorKind::Object)
        }
    }

    pub fn occluder(material: impl Into<String>, moves: Vec<u32>, speed: f64) -> Self {
        Self {
            material: Some(material.into()),
            ..Self::new(ActorKind::Occluder { moves, speed })
        }
    }

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotator) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn role(&self) -> ActorRole {
        self.kind.role()
    }

    /// Bounding radius used for floor contact and overlap checks.
    pub fn radius(&self) -> f64 {
        50.0 * self.scale.max_element()
    }
}

/// One or two magic ticks.
///
/// Serialized as a bare integer when there is one tick and as a list otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MagicTicks(pub SmallVec<[usize; 2]>);

impl MagicTicks {
    pub fn single(tick: usize) -> Self {
        Self(smallvec::smallvec![tick])
    }

    pub fn pair(first: usize, second: usize) -> Self {
        Self(smallvec::smallvec![first, second])
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, tick: usize) -> bool {
        self.0.contains(&tick)
    }

    /// Position of `tick` among the magic ticks, if it is one.
    pub fn position(&self, tick: usize) -> Option<usize> {
        self.0.iter().position(|&t| t == tick)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MagicTicksRepr {
    One(usize),
    Many(SmallVec<[usize; 2]>),
}

impl Serialize for MagicTicks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [t] => MagicTicksRepr::One(*t).serialize(serializer),
            _ => MagicTicksRepr::Many(self.0.clone()).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MagicTicks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match MagicTicksRepr::deserialize(deserializer)? {
            MagicTicksRepr::One(t) => MagicTicks::single(t),
            MagicTicksRepr::Many(v) => MagicTicks(v),
        })
    }
}

/// How configuration B differs from A for the magic actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MagicVariant {
    /// Visibility toggle only.
    #[default]
    None,
    /// Alternative mesh in configuration B.
    Mesh { alternative: Mesh },
    /// Location offset in configuration B.
    Displacement { offset: Vec3 },
    /// Extra impulse in configuration B.
    Impulse { impulse: Vec3 },
}

/// The distinguished magic entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagicSpec {
    /// Name of the actor the trick is applied to.
    pub actor: String,
    /// Resolved magic tick(s), unset until the observer runs are analyzed.
    #[serde(default, rename = "tick", skip_serializing_if = "Option::is_none")]
    pub ticks: Option<MagicTicks>,
    #[serde(default)]
    pub variant: MagicVariant,
}

/// Actor name to parameters, plus the magic entry of test scenes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneParams {
    pub actors: BTreeMap<String, ActorParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<MagicSpec>,
}

impl SceneParams {
    pub fn insert(&mut self, name: impl Into<String>, params: ActorParams) {
        self.actors.insert(name.into(), params);
    }

    pub fn actor(&self, name: &str) -> Option<&ActorParams> {
        self.actors.get(name)
    }

    pub fn actor_mut(&mut self, name: &str) -> Option<&mut ActorParams> {
        self.actors.get_mut(name)
    }

    /// Names of all actors with the given role, in key order.
    pub fn names_with_role(&self, role: ActorRole) -> impl Iterator<Item = &str> {
        self.actors
            .iter()
            .filter(move |(_, p)| p.role() == role)
            .map(|(k, _)| k.as_str())
    }

    /// Names of objects and occluders, in key order.
    pub fn moving_names(&self) -> impl Iterator<Item = &str> {
        self.actors
            .iter()
            .filter(|(_, p)| p.role().is_moving())
            .map(|(k, _)| k.as_str())
    }

    pub fn magic_actor_name(&self) -> Option<&str> {
        self.magic.as_ref().map(|m| m.actor.as_str())
    }

    pub fn magic_ticks(&self) -> Option<&MagicTicks> {
        self.magic.as_ref().and_then(|m| m.ticks.as_ref())
    }

    pub fn set_magic_ticks(&mut self, ticks: MagicTicks) -> PhysclipResult<()> {
        let magic = self
            .magic
            .as_mut()
            .ok_or_else(|| PhysclipError::validation("scene has no magic actor"))?;
        magic.ticks = Some(ticks);
        Ok(())
    }

    /// Check that the magic entry references an object of this scene and that a camera exists.
    pub fn validate(&self) -> PhysclipResult<()> {
        if self.names_with_role(ActorRole::Camera).count() != 1 {
            return Err(PhysclipError::validation("scene needs exactly one camera"));
        }
        for (name, p) in &self.actors {
            if !p.scale.is_finite() || p.scale.min_element() <= 0.0 {
                return Err(PhysclipError::validation(format!(
                    "actor '{name}' has a non-positive scale"
                )));
            }
            if let ActorKind::Occluder { moves, speed } = &p.kind {
                if *speed <= 0.0 {
                    return Err(PhysclipError::validation(format!(
                        "occluder '{name}' speed must be > 0"
                    )));
                }
                if moves.windows(2).any(|w| w[0] > w[1]) {
                    return Err(PhysclipError::validation(format!(
                        "occluder '{name}' moves must be sorted"
                    )));
                }
            }
        }
        if let Some(magic) = &self.magic {
            match self.actor(&magic.actor) {
                Some(p) if p.role() == ActorRole::Object => {}
                Some(_) => {
                    return Err(PhysclipError::validation(format!(
                        "magic actor '{}' is not an object",
                        magic.actor
                    )));
                }
                None => {
                    return Err(PhysclipError::validation(format!(
                        "magic actor '{}' is not in the scene",
                        magic.actor
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/params.rs"]
mod tests;
