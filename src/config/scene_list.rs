use crate::block::BlockId;
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::scene::class::{Motion, ScenarioKind, TestClass};
use serde_json::{Map, Value};
use std::path::Path;

/// One scene to generate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioSpec {
    pub block: BlockId,
    pub kind: ScenarioKind,
    /// Pinned number of objects, from an actor-count map.
    pub actor_count: Option<u8>,
}

impl std::fmt::Display for ScenarioSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.block, self.kind)?;
        if let Some(n) = self.actor_count {
            write!(f, " ({n} objects)")?;
        }
        Ok(())
    }
}

/// Ordered list of scenes parsed from a JSON scene list.
///
/// ```json
/// {
///   "O1": {"train": 2, "test": {"occluded": {"static": 1}, "visible": {"dynamic_2": {"3": 1}}}},
///   "scenario_O2": {"test_visible": {"dynamic_1": 2}}
/// }
/// ```
///
/// Test classes may be nested under `test` or written as `test_occluded` / `test_visible`. A
/// motion entry is either a scene count or a map from object count to scene count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneList {
    scenes: Vec<ScenarioSpec>,
}

impl SceneList {
    pub fn from_reader<R: std::io::Read>(reader: R) -> PhysclipResult<Self> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| PhysclipError::serde(format!("scene list parse failed: {e}")))?;
        Self::from_value(&value)
    }

    pub fn from_path(path: &Path) -> PhysclipResult<Self> {
        let f = std::fs::File::open(path).map_err(|e| {
            PhysclipError::validation(format!("open scene list {}: {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn from_value(value: &Value) -> PhysclipResult<Self> {
        let blocks = as_object(value, "scene list")?;
        let mut scenes = Vec::new();
        for (block_name, entries) in blocks {
            let block: BlockId = block_name.parse()?;
            for (key, entry) in as_object(entries, block_name)? {
                let ctx = format!("{block_name}.{key}");
                if key.contains("train") {
                    let n = as_count(entry, &ctx)?;
                    scenes.extend((0..n).map(|_| ScenarioSpec {
                        block,
                        kind: ScenarioKind::Train,
                        actor_count: None,
                    }));
                } else if key.contains("test") {
                    match occlusion_of(key) {
                        Some(occluded) => push_motions(&mut scenes, block, occluded, entry, &ctx)?,
                        None => {
                            for (class_key, motions) in as_object(entry, &ctx)? {
                                let ctx = format!("{ctx}.{class_key}");
                                let occluded = occlusion_of(class_key).ok_or_else(|| {
                                    PhysclipError::validation(format!(
                                        "{ctx}: expected 'occluded' or 'visible'"
                                    ))
                                })?;
                                push_motions(&mut scenes, block, occluded, motions, &ctx)?;
                            }
                        }
                    }
                } else {
                    return Err(PhysclipError::validation(format!(
                        "{ctx}: expected 'train' or 'test'"
                    )));
                }
            }
        }
        Ok(Self { scenes })
    }

    pub fn from_specs(scenes: Vec<ScenarioSpec>) -> Self {
        Self { scenes }
    }

    pub fn scenes(&self) -> &[ScenarioSpec] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Runs rendered or synthesized over the whole list: 1 per train scene, 4 per test scene.
    pub fn total_runs(&self) -> usize {
        self.scenes
            .iter()
            .map(|s| if s.kind.is_train() { 1 } else { 4 })
            .sum()
    }
}

fn occlusion_of(key: &str) -> Option<bool> {
    if key.contains("occluded") {
        Some(true)
    } else if key.contains("visible") {
        Some(false)
    } else {
        None
    }
}

fn push_motions(
    scenes: &mut Vec<ScenarioSpec>,
    block: BlockId,
    occluded: bool,
    motions: &Value,
    ctx: &str,
) -> PhysclipResult<()> {
    for (motion_key, count) in as_object(motions, ctx)? {
        let ctx = format!("{ctx}.{motion_key}");
        let motion: Motion = motion_key
            .parse()
            .map_err(|_| PhysclipError::validation(format!("{ctx}: unknown motion class")))?;
        let kind = ScenarioKind::Test(TestClass::new(occluded, motion));

        let per_actor_count: Vec<(Option<u8>, usize)> = match count {
            Value::Object(map) => map
                .iter()
                .map(|(actors, n)| {
                    let actors: u8 = actors.parse().map_err(|_| {
                        PhysclipError::validation(format!("{ctx}: bad object count '{actors}'"))
                    })?;
                    if !(1..=3).contains(&actors) {
                        return Err(PhysclipError::validation(format!(
                            "{ctx}: object count must be 1..=3, got {actors}"
                        )));
                    }
                    Ok((Some(actors), as_count(n, &ctx)?))
                })
                .collect::<PhysclipResult<_>>()?,
            other => vec![(None, as_count(other, &ctx)?)],
        };

        for (actor_count, n) in per_actor_count {
            scenes.extend((0..n).map(|_| ScenarioSpec {
                block,
                kind,
                actor_count,
            }));
        }
    }
    Ok(())
}

fn as_object<'a>(value: &'a Value, ctx: &str) -> PhysclipResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| PhysclipError::validation(format!("{ctx}: expected an object")))
}

fn as_count(value: &Value, ctx: &str) -> PhysclipResult<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| PhysclipError::validation(format!("{ctx}: expected a scene count")))
}

#[cfg(test)]
#[path = "../../tests/unit/config/scene_list.rs"]
mod tests;
