//! Scenario blocks: one physical principle each.
//!
//! A [`Block`] customizes generated parameters, describes how reference configuration B differs
//! from A through the magic entry's [`MagicVariant`], and knows whether the magic actor's
//! transform can be compared across configurations. The in-world trick is derived from the
//! variant so the impossible real run reproduces exactly the A/B difference.

use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::run::Run;
use crate::scene::class::TestClass;
use crate::scene::params::{MagicVariant, SceneParams};
use crate::world::World;
use rand::RngCore;
use serde::{Deserialize, Serialize};

mod o1;
mod o2;
mod o3;
mod o4;
mod o5;

pub use o1::ObjectPermanence;
pub use o2::ShapeConstancy;
pub use o3::SpatioTemporalContinuity;
pub use o4::EnergyConservation;
pub use o5::Gravity;

/// Block identifier as written in scene lists and directory names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockId {
    O1,
    O2,
    O3,
    O4,
    O5,
}

impl BlockId {
    pub const ALL: [BlockId; 5] = [BlockId::O1, BlockId::O2, BlockId::O3, BlockId::O4, BlockId::O5];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockId::O1 => "O1",
            BlockId::O2 => "O2",
            BlockId::O3 => "O3",
            BlockId::O4 => "O4",
            BlockId::O5 => "O5",
        }
    }

    pub fn block(self) -> Box<dyn Block> {
        match self {
            BlockId::O1 => Box::new(ObjectPermanence),
            BlockId::O2 => Box::new(ShapeConstancy),
            BlockId::O3 => Box::new(SpatioTemporalContinuity),
            BlockId::O4 => Box::new(EnergyConservation),
            BlockId::O5 => Box::new(Gravity),
        }
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockId {
    type Err = PhysclipError;

    /// Accepts `O1` as well as the legacy `scenario_O1` spelling.
    fn from_str(s: &str) -> PhysclipResult<Self> {
        let name = s.strip_prefix("scenario_").unwrap_or(s);
        BlockId::ALL
            .into_iter()
            .find(|b| b.as_str() == name)
            .ok_or_else(|| PhysclipError::validation(format!("unknown block '{s}'")))
    }
}

/// Reference configuration of a test scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Configuration {
    A,
    B,
}

/// Scenario family strategy.
pub trait Block: std::fmt::Debug + Send + Sync {
    fn id(&self) -> BlockId;

    fn description(&self) -> &'static str;

    fn customize_train(&self, _params: &mut SceneParams, _rng: &mut dyn RngCore) {}

    /// Adjust a generated test scene and set its magic variant.
    fn customize_test(&self, params: &mut SceneParams, class: TestClass, rng: &mut dyn RngCore);

    /// Whether the magic actor's transform is expected to match between configurations A and B.
    fn compares_magic_actor(&self) -> bool {
        true
    }

    /// Scene parameters for one reference configuration.
    fn configure(&self, params: &SceneParams, config: Configuration) -> PhysclipResult<SceneParams> {
        let mut out = params.clone();
        if config == Configuration::A {
            return Ok(out);
        }
        let Some(magic) = params.magic.as_ref() else {
            return Err(PhysclipError::validation("configuration B needs a magic actor"));
        };
        let variant = magic.variant;
        let actor = out.actor_mut(&magic.actor).ok_or_else(|| {
            PhysclipError::validation(format!("magic actor '{}' is not in the scene", magic.actor))
        })?;
        match variant {
            MagicVariant::None => actor.hidden = !actor.hidden,
            MagicVariant::Mesh { alternative } => actor.mesh = alternative,
            MagicVariant::Displacement { offset } => actor.location += offset,
            MagicVariant::Impulse { impulse } => actor.force += impulse,
        }
        Ok(out)
    }

    /// Apply the trick in-world, at the `phase`-th magic tick.
    ///
    /// Even phases switch the magic actor from configuration A to B, odd phases switch back.
    fn apply_trick(
        &self,
        params: &SceneParams,
        run: &mut Run,
        world: &mut dyn World,
        phase: usize,
    ) -> PhysclipResult<()> {
        let Some(magic) = params.magic.as_ref() else {
            return Err(PhysclipError::validation("trick needs a magic actor"));
        };
        let original = params.actor(&magic.actor).ok_or_else(|| {
            PhysclipError::validation(format!("magic actor '{}' is not in the scene", magic.actor))
        })?;
        let towards_b = phase % 2 == 0;
        let sign = if towards_b { 1.0 } else { -1.0 };
        match magic.variant {
            MagicVariant::None => {
                let hidden = if towards_b { !original.hidden } else { original.hidden };
                run.set_magic_hidden(world, hidden)
            }
            MagicVariant::Mesh { alternative } => {
                let mesh = if towards_b { alternative } else { original.mesh };
                run.set_magic_mesh(world, mesh)
            }
            MagicVariant::Displacement { offset } => run.displace_magic(world, offset * sign),
            MagicVariant::Impulse { impulse } => run.push_magic(world, impulse * sign),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/block/mod.rs"]
mod tests;
