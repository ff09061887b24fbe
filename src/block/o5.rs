use crate::block::{Block, BlockId};
use crate::foundation::core::Vec3;
use crate::scene::class::TestClass;
use crate::scene::params::{ActorRole, MagicVariant, SceneParams};
use rand::RngCore;

const OCCLUDER_HEIGHT_SCALE: f64 = 2.5;

/// O5: unsupported objects fall.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gravity;

impl Block for Gravity {
    fn id(&self) -> BlockId {
        BlockId::O5
    }

    fn description(&self) -> &'static str {
        "gravity: the magic actor is kicked upwards"
    }

    fn customize_test(&self, params: &mut SceneParams, class: TestClass, _rng: &mut dyn RngCore) {
        if class.motion.is_dynamic() {
            for actor in params.actors.values_mut() {
                match actor.role() {
                    ActorRole::Object => actor.force.z += 500.0 * actor.mass,
                    // Tall enough to cover a kicked object at the top of its flight.
                    ActorRole::Occluder if class.occluded => actor.scale.z = OCCLUDER_HEIGHT_SCALE,
                    _ => {}
                }
            }
        }
        let Some(mass) = params
            .magic_actor_name()
            .and_then(|m| params.actor(m))
            .map(|a| a.mass)
        else {
            return;
        };
        if let Some(magic) = params.magic.as_mut() {
            magic.variant = MagicVariant::Impulse {
                impulse: Vec3::new(0.0, 0.0, 300.0 * mass),
            };
        }
    }

    fn compares_magic_actor(&self) -> bool {
        false
    }
}
