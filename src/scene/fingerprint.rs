use crate::foundation::core::{Rotator, Vec3};
use crate::scene::params::{ActorKind, ActorParams, MagicVariant, SceneParams};
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5c3e_9a17_d24b_60f3;

/// Stable 128-bit identity of a [`SceneParams`] value.
///
/// Magic ticks are not hashed: they are resolved after the observer runs and do not change the
/// generated scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamsFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for ParamsFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl SceneParams {
    pub fn fingerprint(&self) -> ParamsFingerprint {
        let mut h = StableHasher::new();
        h.write_u32(self.actors.len() as u32);
        for (name, actor) in &self.actors {
            h.write_str(name);
            write_actor(&mut h, actor);
        }
        match &self.magic {
            None => h.write_u8(0),
            Some(m) => {
                h.write_u8(1);
                h.write_str(&m.actor);
                match m.variant {
                    MagicVariant::None => h.write_u8(0),
                    MagicVariant::Mesh { alternative } => {
                        h.write_u8(1);
                        h.write_u8(alternative as u8);
                    }
                    MagicVariant::Displacement { offset } => {
                        h.write_u8(2);
                        h.write_vec3(offset);
                    }
                    MagicVariant::Impulse { impulse } => {
                        h.write_u8(3);
                        h.write_vec3(impulse);
                    }
                }
            }
        }
        h.finish()
    }
}

fn write_actor(h: &mut StableHasher, a: &ActorParams) {
    h.write_u8(a.role() as u8);
    match &a.kind {
        ActorKind::Camera {
            field_of_view,
            aspect_ratio,
        } => {
            h.write_f64(*field_of_view);
            h.write_f64(*aspect_ratio);
        }
        ActorKind::Light { light_type } => h.write_str(light_type),
        ActorKind::Walls {
            length,
            depth,
            height,
        } => {
            h.write_f64(*length);
            h.write_f64(*depth);
            h.write_f64(*height);
        }
        ActorKind::Occluder { moves, speed } => {
            h.write_u32(moves.len() as u32);
            for m in moves {
                h.write_u32(*m);
            }
            h.write_f64(*speed);
        }
        ActorKind::Floor | ActorKind::Object => {}
    }
    h.write_str(a.material.as_deref().unwrap_or(""));
    h.write_u8(a.mesh as u8);
    h.write_vec3(a.location);
    h.write_rotator(a.rotation);
    h.write_vec3(a.scale);
    h.write_f64(a.mass);
    h.write_f64(a.friction);
    h.write_f64(a.restitution);
    h.write_vec3(a.force);
    h.write_bool(a.hidden);
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn write_vec3(&mut self, v: Vec3) {
        self.write_f64(v.x);
        self.write_f64(v.y);
        self.write_f64(v.z);
    }

    fn write_rotator(&mut self, r: Rotator) {
        self.write_f64(r.yaw);
        self.write_f64(r.pitch);
        self.write_f64(r.roll);
    }

    fn finish(self) -> ParamsFingerprint {
        let v = self.inner.digest128();
        ParamsFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/fingerprint.rs"]
mod tests;
