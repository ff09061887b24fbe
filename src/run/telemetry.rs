use crate::foundation::core::Transform;
use crate::foundation::error::{PhysclipError, PhysclipResult};
use std::collections::BTreeMap;

/// One tracked actor at one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSample {
    pub transform: Transform,
    /// Visible in the frame captured at this tick.
    pub visible: bool,
}

/// Samples of every tracked actor at one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetryFrame {
    pub tick: usize,
    pub actors: BTreeMap<String, ActorSample>,
}

/// Append-only per-tick log of a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetryLog {
    frames: Vec<TelemetryFrame>,
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame; its tick must equal the current length.
    pub fn push(&mut self, frame: TelemetryFrame) -> PhysclipResult<()> {
        if frame.tick != self.frames.len() {
            return Err(PhysclipError::length_mismatch(format!(
                "telemetry frame {} appended at position {}",
                frame.tick,
                self.frames.len()
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&TelemetryFrame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[TelemetryFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&TelemetryFrame> {
        self.frames.last()
    }

    /// Visibility series of one actor; frames without the actor count as not visible.
    pub fn visibility_of(&self, actor: &str) -> Vec<bool> {
        self.frames
            .iter()
            .map(|f| f.actors.get(actor).is_some_and(|s| s.visible))
            .collect()
    }
}

/// Observer run slot used for magic-tick discovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Observer {
    First,
    Second,
}

impl Observer {
    pub fn from_run_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Observer::First),
            1 => Some(Observer::Second),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Observer::First => 0,
            Observer::Second => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckCategory {
    /// Magic actor visibility, one bool per frame.
    Visibility,
    /// Tracked actor transforms, one map per frame.
    Location,
}

/// Per-observer check series of a scenario attempt.
///
/// Writes are validated as they happen: ticks are appended in order and the second observer can
/// never record more frames than the first.
#[derive(Clone, Debug, Default)]
pub struct TelemetryStore {
    visibility: [Vec<bool>; 2],
    location: [TelemetryLog; 2],
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of an observer run.
    pub fn record(
        &mut self,
        observer: Observer,
        magic_visible: bool,
        frame: TelemetryFrame,
    ) -> PhysclipResult<()> {
        let slot = observer.slot();
        if observer == Observer::Second && self.visibility[1].len() >= self.visibility[0].len() {
            return Err(PhysclipError::length_mismatch(format!(
                "second observer run exceeds the first ({} frames)",
                self.visibility[0].len()
            )));
        }
        self.location[slot].push(frame)?;
        self.visibility[slot].push(magic_visible);
        Ok(())
    }

    pub fn len(&self, category: CheckCategory, observer: Observer) -> usize {
        match category {
            CheckCategory::Visibility => self.visibility[observer.slot()].len(),
            CheckCategory::Location => self.location[observer.slot()].len(),
        }
    }

    pub fn visibility(&self, observer: Observer) -> &[bool] {
        &self.visibility[observer.slot()]
    }

    pub fn locations(&self, observer: Observer) -> &TelemetryLog {
        &self.location[observer.slot()]
    }

    /// Both visibility series, which must have equal length.
    pub fn visibility_pair(&self) -> PhysclipResult<(&[bool], &[bool])> {
        let (a, b) = (&self.visibility[0], &self.visibility[1]);
        if a.len() != b.len() {
            return Err(PhysclipError::length_mismatch(format!(
                "observer visibility series differ ({} vs {})",
                a.len(),
                b.len()
            )));
        }
        Ok((a, b))
    }

    /// Both location logs, which must have equal length.
    pub fn location_pair(&self) -> PhysclipResult<(&TelemetryLog, &TelemetryLog)> {
        let (a, b) = (&self.location[0], &self.location[1]);
        if a.len() != b.len() {
            return Err(PhysclipError::length_mismatch(format!(
                "observer location logs differ ({} vs {})",
                a.len(),
                b.len()
            )));
        }
        Ok((a, b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/run/telemetry.rs"]
mod tests;
