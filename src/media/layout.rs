use std::path::{Path, PathBuf};

/// Image categories written for every captured frame.
pub const MEDIA_CATEGORIES: [&str; 3] = ["scene", "depth", "masks"];

/// Per-run metadata file name.
pub const STATUS_FILE: &str = "status.json";

/// Scene directory name, e.g. `007_test_O3`.
///
/// `index` is 0-based; the printed index is 1-based and zero-padded to the width of `total`.
pub fn scene_dir_name(index: usize, total: usize, kind: &str, block: &str) -> String {
    let width = total.max(1).to_string().len();
    format!("{:0width$}_{kind}_{block}", index + 1)
}

/// Directory of run `run_index` (0-based) inside a scene directory.
///
/// Train scenes have a single run stored directly in the scene directory; test runs go to
/// `1/` .. `4/`.
pub fn run_dir(scene_dir: &Path, is_train: bool, run_index: usize) -> PathBuf {
    if is_train {
        scene_dir.to_path_buf()
    } else {
        scene_dir.join((run_index + 1).to_string())
    }
}

/// Relative path of frame `frame` (0-based) of a category, e.g. `scene/scene_001.png`.
pub fn frame_file(category: &str, frame: usize) -> PathBuf {
    Path::new(category).join(format!("{category}_{:03}.png", frame + 1))
}

#[cfg(test)]
#[path = "../../tests/unit/media/layout.rs"]
mod tests;
