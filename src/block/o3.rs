use crate::block::{Block, BlockId};
use crate::foundation::core::Vec3;
use crate::scene::class::{Motion, TestClass};
use crate::scene::params::{MagicVariant, SceneParams};
use rand::{Rng, RngCore};

/// O3: objects move along continuous paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatioTemporalContinuity;

impl Block for SpatioTemporalContinuity {
    fn id(&self) -> BlockId {
        BlockId::O3
    }

    fn description(&self) -> &'static str {
        "spatio-temporal continuity: the magic actor teleports"
    }

    fn customize_test(&self, params: &mut SceneParams, class: TestClass, rng: &mut dyn RngCore) {
        let offset = match class.motion {
            Motion::Static => Vec3::new(rng.random_range(10.0..100.0), 0.0, 0.0),
            Motion::Dynamic1 => Vec3::new(0.0, 50.0, 0.0),
            Motion::Dynamic2 => Vec3::new(0.0, 200.0, 0.0),
        };
        if let Some(magic) = params.magic.as_mut() {
            magic.variant = MagicVariant::Displacement { offset };
        }
    }

    fn compares_magic_actor(&self) -> bool {
        false
    }
}
