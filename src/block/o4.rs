use crate::block::{Block, BlockId};
use crate::foundation::core::Vec3;
use crate::scene::class::TestClass;
use crate::scene::params::{ActorRole, MagicVariant, SceneParams};
use rand::RngCore;

/// Occluder `(y, width scale)` pairs for occluded two-trick scenes.
///
/// The slowed configuration covers half the course of the original one, so both are behind the
/// wide left wall early on, and behind different walls later. The gap between the walls stays
/// narrow so the run carrying both tricks is hidden at its second tick too.
const TWO_TRICK_OCCLUDERS: [(f64, f64); 2] = [(-390.0, 1.55), (300.0, 1.5)];

/// O4: objects keep their momentum.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyConservation;

impl Block for EnergyConservation {
    fn id(&self) -> BlockId {
        BlockId::O4
    }

    fn description(&self) -> &'static str {
        "energy conservation: the magic actor changes speed"
    }

    fn customize_test(&self, params: &mut SceneParams, class: TestClass, _rng: &mut dyn RngCore) {
        let cameras: Vec<String> = params
            .names_with_role(ActorRole::Camera)
            .map(str::to_string)
            .collect();
        for name in cameras {
            if let Some(camera) = params.actor_mut(&name) {
                camera.location.x = -1000.0;
            }
        }

        if class.occluded && class.motion.trick_count() > 1 {
            let occluders: Vec<String> = params
                .names_with_role(ActorRole::Occluder)
                .map(str::to_string)
                .collect();
            for (name, (y, width)) in occluders.iter().zip(TWO_TRICK_OCCLUDERS) {
                if let Some(occluder) = params.actor_mut(name) {
                    occluder.location.y = y;
                    occluder.scale.y = width;
                }
            }
        }

        let Some(actor) = params.magic_actor_name().and_then(|m| params.actor(m)) else {
            return;
        };
        let impulse = if class.motion.is_dynamic() {
            actor.force * -0.5
        } else {
            Vec3::new(0.0, 200.0 * actor.mass, 0.0)
        };
        if let Some(magic) = params.magic.as_mut() {
            magic.variant = MagicVariant::Impulse { impulse };
        }
    }

    fn compares_magic_actor(&self) -> bool {
        false
    }
}
