use super::*;
use crate::media::status::ActorStatus;
use crate::world::{CameraView, SaveReport};
use crate::foundation::core::{Rotator, Vec3};
use crate::scene::params::Mesh;

struct FailingBackend;

impl CaptureBackend for FailingBackend {
    fn begin_capture(&mut self, _camera: ActorHandle, _frame_count: usize) -> PhysclipResult<()> {
        Ok(())
    }

    fn capture_frame(&mut self, _request: &CaptureRequest<'_>) -> PhysclipResult<()> {
        Ok(())
    }

    fn save_run(&mut self, _output_dir: &Path) -> PhysclipResult<SaveReport> {
        Ok(SaveReport::default())
    }

    fn reset_buffers(&mut self) {}

    fn captured_frames(&self) -> usize {
        0
    }
}

fn header() -> ScenarioHeader {
    ScenarioHeader {
        name: "O1".into(),
        kind: "test".into(),
        is_possible: true,
    }
}

fn request() -> CaptureRequest<'static> {
    CaptureRequest {
        frame: 0,
        camera: CameraView {
            location: Vec3::new(0.0, 0.0, 200.0),
            field_of_view: 90.0,
            aspect_ratio: 1.0,
        },
        ignored: &[],
        actors: Vec::new(),
    }
}

fn frame() -> FrameStatus {
    let mut f = FrameStatus::new();
    f.insert(
        "object_1".into(),
        ActorStatus {
            location: Vec3::new(1.0, 2.0, 3.0),
            rotation: Rotator::default(),
            visible: true,
            hidden: false,
            mesh: Mesh::Sphere,
            material: None,
        },
    );
    f
}

#[test]
fn failed_save_is_a_media_error() {
    let dir = std::env::temp_dir().join("physclip_saver_fail");
    let mut saver = Saver::new(Box::new(FailingBackend));
    saver.begin_run(ActorHandle(0), 1).unwrap();
    saver.capture(&request(), frame()).unwrap();
    let err = saver
        .finish_run(Some(&dir), header(), BTreeMap::new(), None)
        .unwrap_err();
    assert!(matches!(err, PhysclipError::MediaSave(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn dry_mode_keeps_status_in_memory_only() {
    let dir = std::env::temp_dir().join("physclip_saver_dry_never_written");
    let _ = std::fs::remove_dir_all(&dir);

    let mut saver = Saver::dry();
    saver.begin_run(ActorHandle(0), 2).unwrap();
    saver.capture(&request(), frame()).unwrap();
    saver.capture(&request(), frame()).unwrap();
    let status = saver
        .finish_run(Some(&dir), header(), BTreeMap::new(), None)
        .unwrap();

    assert_eq!(status.frames.len(), 2);
    assert_eq!(saver.captured_frames(), 0);
    assert!(!dir.exists());
}

#[test]
fn status_json_round_trips_from_disk() {
    let dir = std::env::temp_dir().join("physclip_saver_status");
    let _ = std::fs::remove_dir_all(&dir);

    let mut saver = Saver::new(Box::new(NullCapture::default()));
    saver.begin_run(ActorHandle(0), 1).unwrap();
    saver.capture(&request(), frame()).unwrap();
    let status = saver
        .finish_run(Some(&dir), header(), BTreeMap::new(), None)
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join(STATUS_FILE)).unwrap()).unwrap();
    assert_eq!(json["header"]["type"], "test");
    assert_eq!(json["header"]["is_possible"], true);
    assert_eq!(RunStatus::from_path(&dir.join(STATUS_FILE)).unwrap(), status);
}
