use crate::foundation::core::{Rotator, TICK_SECONDS, Vec3};
use crate::scene::class::{Motion, TestClass};
use crate::scene::materials::{MaterialCatalog, MaterialCategory};
use crate::scene::params::{ActorKind, ActorParams, MagicSpec, MagicVariant, Mesh, SceneParams};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

const OBJECT_MASS: f64 = 100.0;
const DYNAMIC_LANES: [f64; 3] = [700.0, 1000.0, 1300.0];
const DYNAMIC_START_Y: f64 = -1200.0;
const STATIC_SLOTS_Y: [f64; 3] = [-500.0, 0.0, 500.0];
const OCCLUDER_X: f64 = 400.0;

/// Random scene-parameter generator.
///
/// Every method is a pure function of the random source: calling it again with an rng in the
/// same state yields identical parameters.
#[derive(Debug, Clone, Copy)]
pub struct SceneGenerator<'a> {
    catalog: &'a MaterialCatalog,
    frames: usize,
}

impl<'a> SceneGenerator<'a> {
    pub fn new(catalog: &'a MaterialCatalog, frames: usize) -> Self {
        Self {
            catalog,
            frames: frames.max(1),
        }
    }

    pub fn catalog(&self) -> &'a MaterialCatalog {
        self.catalog
    }

    /// Camera, floor, light and walls.
    pub fn base(&self, rng: &mut dyn RngCore) -> SceneParams {
        let mut p = SceneParams::default();
        p.insert(
            "camera",
            ActorParams::new(ActorKind::Camera {
                field_of_view: 90.0,
                aspect_ratio: 1.0,
            })
            .with_location(Vec3::new(0.0, 0.0, 200.0)),
        );

        let mut floor = ActorParams::new(ActorKind::Floor).with_scale(Vec3::new(50.0, 50.0, 1.0));
        floor.material = Some(self.catalog.random(MaterialCategory::Floor, rng).to_string());
        p.insert("floor", floor);

        p.insert(
            "light",
            ActorParams::new(ActorKind::Light {
                light_type: "SkyLight".to_string(),
            })
            .with_location(Vec3::new(0.0, 0.0, 1000.0)),
        );

        let mut walls = ActorParams::new(ActorKind::Walls {
            length: rng.random_range(3000.0..5000.0),
            depth: rng.random_range(1500.0..3000.0),
            height: rng.random_range(1.0..5.0),
        });
        walls.material = Some(self.catalog.random(MaterialCategory::Wall, rng).to_string());
        p.insert("walls", walls);
        p
    }

    /// Possible-only scene: free-falling spheres and randomly animated occluders.
    pub fn train(&self, rng: &mut dyn RngCore) -> SceneParams {
        let mut p = self.base(rng);

        let nobjects = rng.random_range(1..=3usize);
        let mut lanes = DYNAMIC_LANES;
        lanes.shuffle(rng);
        for (n, &x) in lanes.iter().take(nobjects).enumerate() {
            let scale = 1.0 + rng.random::<f64>() * 0.5;
            let location = Vec3::new(
                x,
                rng.random_range(-500.0..500.0),
                rng.random_range(0.0..200.0),
            );
            let mut object = ActorParams::object(
                Mesh::Sphere,
                self.catalog.random(MaterialCategory::Object, rng),
            )
            .with_location(location)
            .with_rotation(random_rotation(rng))
            .with_scale(Vec3::splat(scale));
            object.mass = OBJECT_MASS;
            p.insert(format!("object_{}", n + 1), object);
        }

        let noccluders = rng.random_range(0..=2usize);
        for n in 0..noccluders {
            let nmoves = rng.random_range(0..=3usize);
            let mut moves: Vec<u32> = (0..nmoves)
                .map(|_| rng.random_range(0..self.frames as u32))
                .collect();
            moves.sort_unstable();
            let location = Vec3::new(
                rng.random_range(300.0..500.0),
                rng.random_range(-500.0..500.0),
                0.0,
            );
            let roll = if rng.random_bool(0.5) { 0.0 } else { 90.0 };
            p.insert(
                format!("occluder_{}", n + 1),
                ActorParams::occluder(
                    self.catalog.random(MaterialCategory::Wall, rng),
                    moves,
                    self.occluder_speed(),
                )
                .with_location(location)
                .with_rotation(Rotator::new(0.0, 0.0, roll)),
            );
        }
        p
    }

    /// Test scene for `class` with its magic actor picked among the objects.
    ///
    /// `actor_count` pins the number of objects (clamped to the three available slots).
    pub fn test(
        &self,
        class: TestClass,
        actor_count: Option<u8>,
        rng: &mut dyn RngCore,
    ) -> SceneParams {
        let mut p = self.base(rng);

        let nobjects = match actor_count {
            Some(n) => usize::from(n).clamp(1, 3),
            None => rng.random_range(1..=3usize),
        };
        let mut slots: Vec<Vec3> = if class.motion.is_dynamic() {
            DYNAMIC_LANES
                .iter()
                .map(|&x| Vec3::new(x, DYNAMIC_START_Y, 0.0))
                .collect()
        } else {
            STATIC_SLOTS_Y
                .iter()
                .map(|&y| Vec3::new(1000.0, y, 0.0))
                .collect()
        };
        slots.shuffle(rng);

        let launch = self.crossing_speed();
        for (n, &location) in slots.iter().take(nobjects).enumerate() {
            let scale = 1.0 + rng.random::<f64>() * 0.5;
            let mut object = ActorParams::object(
                Mesh::Sphere,
                self.catalog.random(MaterialCategory::Object, rng),
            )
            .with_location(location)
            .with_rotation(random_rotation(rng))
            .with_scale(Vec3::splat(scale));
            object.mass = OBJECT_MASS;
            if class.motion.is_dynamic() {
                object.force = Vec3::new(0.0, launch * OBJECT_MASS, 0.0);
            }
            p.insert(format!("object_{}", n + 1), object);
        }

        let magic_actor = format!("object_{}", rng.random_range(1..=nobjects));
        let magic_y = p.actor(&magic_actor).map(|a| a.location.y).unwrap_or(0.0);
        p.magic = Some(MagicSpec {
            actor: magic_actor,
            ticks: None,
            variant: MagicVariant::None,
        });

        if class.occluded {
            self.add_occluders(&mut p, class.motion, magic_y, rng);
        }
        p
    }

    fn add_occluders(&self, p: &mut SceneParams, motion: Motion, magic_y: f64, rng: &mut dyn RngCore) {
        let speed = self.occluder_speed();
        match motion {
            Motion::Static => {
                let rise = self.frames / 10 + rng.random_range(0..(self.frames / 12).max(1));
                let fall = self.frames / 2 + rng.random_range(0..(self.frames / 10).max(1));
                p.insert(
                    "occluder_1",
                    ActorParams::occluder(
                        self.catalog.random(MaterialCategory::Wall, rng),
                        vec![rise as u32, fall as u32],
                        speed,
                    )
                    .with_location(Vec3::new(OCCLUDER_X, magic_y / 2.0, 0.0))
                    .with_rotation(Rotator::new(0.0, 0.0, 90.0))
                    .with_scale(Vec3::new(1.0, 1.0, 1.5)),
                );
            }
            Motion::Dynamic1 => {
                p.insert(
                    "occluder_1",
                    ActorParams::occluder(
                        self.catalog.random(MaterialCategory::Wall, rng),
                        Vec::new(),
                        speed,
                    )
                    .with_location(Vec3::new(OCCLUDER_X, 0.0, 0.0)),
                );
            }
            Motion::Dynamic2 => {
                for (name, y) in [("occluder_1", -180.0), ("occluder_2", 180.0)] {
                    p.insert(
                        name,
                        ActorParams::occluder(
                            self.catalog.random(MaterialCategory::Wall, rng),
                            Vec::new(),
                            speed,
                        )
                        .with_location(Vec3::new(OCCLUDER_X, y, 0.0))
                        .with_scale(Vec3::new(1.0, 0.5, 1.0)),
                    );
                }
            }
        }
    }

    /// Roll degrees per tick so a fall takes about a fifth of the run.
    fn occluder_speed(&self) -> f64 {
        450.0 / self.frames as f64
    }

    /// Speed along +y that brings a dynamic object from its start to the mirrored side in one run.
    fn crossing_speed(&self) -> f64 {
        (2.0 * DYNAMIC_START_Y.abs()) / (self.frames as f64 * TICK_SECONDS)
    }
}

fn random_rotation(rng: &mut dyn RngCore) -> Rotator {
    Rotator::new(
        360.0 * rng.random::<f64>(),
        360.0 * rng.random::<f64>(),
        360.0 * rng.random::<f64>(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scene/generate.rs"]
mod tests;
