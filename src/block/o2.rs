use crate::block::{Block, BlockId};
use crate::foundation::core::Rotator;
use crate::scene::class::TestClass;
use crate::scene::params::{ActorRole, MagicVariant, Mesh, SceneParams};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

/// O2: objects keep their shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeConstancy;

fn randomize_meshes(params: &mut SceneParams, rng: &mut dyn RngCore, pin_rotation: bool) {
    for actor in params.actors.values_mut() {
        if actor.role() != ActorRole::Object {
            continue;
        }
        actor.mesh = *Mesh::ALL.choose(rng).unwrap_or(&Mesh::Sphere);
        if pin_rotation {
            actor.rotation = Rotator::new(0.0, 0.0, 360.0 * rng.random::<f64>());
        }
    }
}

impl Block for ShapeConstancy {
    fn id(&self) -> BlockId {
        BlockId::O2
    }

    fn description(&self) -> &'static str {
        "shape constancy: the magic actor changes mesh"
    }

    fn customize_train(&self, params: &mut SceneParams, rng: &mut dyn RngCore) {
        randomize_meshes(params, rng, false);
    }

    fn customize_test(&self, params: &mut SceneParams, _class: TestClass, rng: &mut dyn RngCore) {
        randomize_meshes(params, rng, true);
        let Some(current) = params
            .magic_actor_name()
            .and_then(|m| params.actor(m))
            .map(|a| a.mesh)
        else {
            return;
        };
        let others: Vec<Mesh> = Mesh::ALL.into_iter().filter(|&m| m != current).collect();
        let alternative = *others.choose(rng).unwrap_or(&Mesh::Cube);
        if let Some(magic) = params.magic.as_mut() {
            magic.variant = MagicVariant::Mesh { alternative };
        }
    }
}
