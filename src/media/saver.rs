use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::media::layout::STATUS_FILE;
use crate::media::status::{FrameStatus, RunStatus, ScenarioHeader, StatusHeader};
use crate::scene::params::{ActorParams, MagicSpec};
use crate::world::capture::NullCapture;
use crate::world::{ActorHandle, CaptureBackend, CaptureRequest};
use std::collections::BTreeMap;
use std::path::Path;

/// Collects captures and frame statuses during a run and persists them at its end.
///
/// In dry mode nothing reaches the capture backend or the filesystem; frame statuses are still
/// collected so synthetic runs can be derived in memory.
pub struct Saver {
    backend: Box<dyn CaptureBackend>,
    dry: bool,
    frames: Vec<FrameStatus>,
}

impl std::fmt::Debug for Saver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Saver")
            .field("dry", &self.dry)
            .field("frames", &self.frames.len())
            .finish_non_exhaustive()
    }
}

impl Saver {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            dry: false,
            frames: Vec::new(),
        }
    }

    pub fn dry() -> Self {
        Self {
            backend: Box::new(NullCapture::default()),
            dry: true,
            frames: Vec::new(),
        }
    }

    pub fn is_dry_mode(&self) -> bool {
        self.dry
    }

    pub fn begin_run(&mut self, camera: ActorHandle, frame_count: usize) -> PhysclipResult<()> {
        self.frames.clear();
        if self.dry {
            return Ok(());
        }
        self.backend.reset_buffers();
        self.backend.begin_capture(camera, frame_count)
    }

    pub fn capture(&mut self, request: &CaptureRequest<'_>, status: FrameStatus) -> PhysclipResult<()> {
        if !self.dry {
            self.backend.capture_frame(request)?;
        }
        self.frames.push(status);
        Ok(())
    }

    pub fn captured_frames(&self) -> usize {
        self.frames.len()
    }

    /// Close the current run and return its status.
    ///
    /// Outside dry mode the captured images and `status.json` are written to `dir`.
    pub fn finish_run(
        &mut self,
        dir: Option<&Path>,
        scenario: ScenarioHeader,
        static_actors: BTreeMap<String, ActorParams>,
        magic: Option<MagicSpec>,
    ) -> PhysclipResult<RunStatus> {
        let mut header = StatusHeader {
            scenario,
            static_actors,
            magic,
            max_depth: 0.0,
            masks: BTreeMap::new(),
        };

        if let (false, Some(dir)) = (self.dry, dir) {
            tracing::info!(dir = %dir.display(), frames = self.frames.len(), "saving capture");
            let report = self.backend.save_run(dir)?;
            if !report.ok {
                return Err(PhysclipError::media_save(format!(
                    "failed to save images to {}",
                    dir.display()
                )));
            }
            header.max_depth = report.max_depth;
            header.masks = report.masks;
        }

        let status = RunStatus {
            header,
            frames: std::mem::take(&mut self.frames),
        };
        if let (false, Some(dir)) = (self.dry, dir) {
            status.write(&dir.join(STATUS_FILE))?;
        }
        self.backend.reset_buffers();
        Ok(status)
    }

    /// Drop everything captured since the last [`Saver::begin_run`].
    pub fn reset(&mut self) {
        self.frames.clear();
        self.backend.reset_buffers();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/saver.rs"]
mod tests;
