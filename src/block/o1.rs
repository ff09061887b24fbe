use crate::block::{Block, BlockId};
use crate::scene::class::TestClass;
use crate::scene::params::{MagicVariant, SceneParams};
use rand::RngCore;

/// O1: objects do not vanish or appear.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectPermanence;

impl Block for ObjectPermanence {
    fn id(&self) -> BlockId {
        BlockId::O1
    }

    fn description(&self) -> &'static str {
        "object permanence: the magic actor disappears or appears"
    }

    fn customize_test(&self, params: &mut SceneParams, _class: TestClass, _rng: &mut dyn RngCore) {
        if let Some(magic) = params.magic.as_mut() {
            magic.variant = MagicVariant::None;
        }
    }
}
