use crate::foundation::core::{Resolution, Vec3};
use crate::foundation::error::{PhysclipError, PhysclipResult};
use crate::media::layout::{MEDIA_CATEGORIES, frame_file};
use crate::scene::materials::MaterialCatalog;
use crate::scene::params::{ActorRole, Mesh};
use crate::world::{ActorHandle, CameraView, CaptureBackend, CaptureRequest, SaveReport};
use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

const SKY: [u8; 3] = [150, 180, 215];
const FLOOR: [u8; 3] = [95, 90, 80];

struct FrameBuffers {
    scene: RgbImage,
    depth: Vec<f32>,
    masks: GrayImage,
}

/// Flat-shaded rasterizer writing PNG `scene`/`depth`/`masks` images.
///
/// Objects are drawn as discs (squares for cubes, triangles for cones), occluders as upright
/// rectangles shortened by their current roll. Frames are kept in memory until [`save_run`].
///
/// [`save_run`]: CaptureBackend::save_run
pub struct HeadlessCapture {
    resolution: Resolution,
    catalog: MaterialCatalog,
    frames: Vec<FrameBuffers>,
    masks: BTreeMap<String, u8>,
    expected: usize,
}

impl HeadlessCapture {
    pub fn new(resolution: Resolution, catalog: MaterialCatalog) -> Self {
        Self {
            resolution,
            catalog,
            frames: Vec::new(),
            masks: BTreeMap::new(),
            expected: 0,
        }
    }

    fn project(&self, view: &CameraView, p: Vec3) -> Option<(f64, f64, f64)> {
        let d = p - view.location;
        if d.x <= 1.0 {
            return None;
        }
        let half = (view.field_of_view.to_radians() / 2.0).tan();
        let w = f64::from(self.resolution.width);
        let h = f64::from(self.resolution.height);
        let u = d.y / (d.x * half);
        let v = d.z / (d.x * half / view.aspect_ratio.max(f64::EPSILON));
        Some(((u + 1.0) * 0.5 * w, (1.0 - v) * 0.5 * h, d.x))
    }

    /// Pixel scale of one world unit at depth `dist`.
    fn pixels_per_unit(&self, view: &CameraView, dist: f64) -> f64 {
        let half = (view.field_of_view.to_radians() / 2.0).tan();
        f64::from(self.resolution.width) * 0.5 / (dist * half)
    }
}

impl CaptureBackend for HeadlessCapture {
    fn begin_capture(&mut self, camera: ActorHandle, frame_count: usize) -> PhysclipResult<()> {
        tracing::debug!(camera = camera.0, frame_count, "begin capture");
        self.frames.clear();
        self.frames.reserve(frame_count);
        self.masks.clear();
        self.expected = frame_count;
        Ok(())
    }

    fn capture_frame(&mut self, request: &CaptureRequest<'_>) -> PhysclipResult<()> {
        if self.expected > 0 && self.frames.len() >= self.expected {
            return Err(PhysclipError::media_save(format!(
                "capture buffer full ({} frames)",
                self.expected
            )));
        }
        let (w, h) = (self.resolution.width, self.resolution.height);
        let horizon = h / 2;
        let mut scene = RgbImage::from_fn(w, h, |_, y| Rgb(if y < horizon { SKY } else { FLOOR }));
        let mut depth = vec![f32::INFINITY; (w as usize) * (h as usize)];
        let mut masks = GrayImage::new(w, h);

        for a in &request.actors {
            if !a.role.is_moving() || self.masks.contains_key(a.name) {
                continue;
            }
            let next = self.masks.len() as u32 + 1;
            self.masks
                .insert(a.name.to_string(), (next * 255 / 8).min(255) as u8);
        }

        // Painter's order: far to near.
        let mut drawn: Vec<_> = request
            .actors
            .iter()
            .filter(|a| a.role.is_moving() && !a.hidden)
            .collect();
        drawn.sort_by(|a, b| {
            let da = a.transform.location.x;
            let db = b.transform.location.x;
            db.total_cmp(&da)
        });

        for a in drawn {
            let color = self
                .catalog
                .color(a.params.material.as_deref().unwrap_or_default());
            let mask = if request.ignored.contains(&a.handle) {
                0
            } else {
                self.masks.get(a.name).copied().unwrap_or(0)
            };
            let loc = a.transform.location;

            let (x0, y0, x1, y1, dist, shape) = match a.role {
                ActorRole::Occluder => {
                    let half_w = 200.0 * a.params.scale.y;
                    let height = 200.0
                        * a.params.scale.z
                        * a.transform.rotation.roll.to_radians().cos().max(0.0);
                    let Some((lx, ty, dist)) =
                        self.project(&request.camera, loc + Vec3::new(0.0, -half_w, height))
                    else {
                        continue;
                    };
                    let Some((rx, by, _)) =
                        self.project(&request.camera, loc + Vec3::new(0.0, half_w, 0.0))
                    else {
                        continue;
                    };
                    (lx, ty, rx, by, dist, None)
                }
                _ => {
                    let Some((cx, cy, dist)) = self.project(&request.camera, loc) else {
                        continue;
                    };
                    let r = 50.0 * a.params.scale.max_element() * self.pixels_per_unit(&request.camera, dist);
                    (cx - r, cy - r, cx + r, cy + r, dist, Some(a.mesh))
                }
            };

            let px0 = x0.floor().max(0.0) as u32;
            let py0 = y0.floor().max(0.0) as u32;
            let px1 = (x1.ceil().max(0.0) as u32).min(w);
            let py1 = (y1.ceil().max(0.0) as u32).min(h);
            let (cx, cy) = ((x0 + x1) * 0.5, (y0 + y1) * 0.5);
            let r = (x1 - x0) * 0.5;

            for py in py0..py1 {
                for px in px0..px1 {
                    let fx = f64::from(px) + 0.5;
                    let fy = f64::from(py) + 0.5;
                    let inside = match shape {
                        None | Some(Mesh::Cube) => true,
                        Some(Mesh::Sphere) => (fx - cx).powi(2) + (fy - cy).powi(2) <= r * r,
                        Some(Mesh::Cone) => {
                            let t = (fy - y0) / (y1 - y0).max(f64::EPSILON);
                            (fx - cx).abs() <= r * t
                        }
                    };
                    if !inside {
                        continue;
                    }
                    let idx = (py * w + px) as usize;
                    scene.put_pixel(px, py, Rgb(color));
                    depth[idx] = dist as f32;
                    masks.put_pixel(px, py, Luma([mask]));
                }
            }
        }

        self.frames.push(FrameBuffers {
            scene,
            depth,
            masks,
        });
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(frames = self.frames.len()))]
    fn save_run(&mut self, output_dir: &Path) -> PhysclipResult<SaveReport> {
        for category in MEDIA_CATEGORIES {
            std::fs::create_dir_all(output_dir.join(category)).map_err(|e| {
                PhysclipError::media_save(format!("create {}: {e}", output_dir.display()))
            })?;
        }

        let max_depth = self
            .frames
            .iter()
            .flat_map(|f| f.depth.iter().copied())
            .filter(|d| d.is_finite())
            .fold(0.0f32, f32::max);
        let (w, h) = (self.resolution.width, self.resolution.height);

        self.frames
            .par_iter()
            .enumerate()
            .try_for_each(|(i, f)| -> PhysclipResult<()> {
                let depth = GrayImage::from_fn(w, h, |x, y| {
                    let d = f.depth[(y * w + x) as usize];
                    let v = if d.is_finite() && max_depth > 0.0 {
                        255.0 * (1.0 - d / max_depth)
                    } else {
                        0.0
                    };
                    Luma([v.clamp(0.0, 255.0) as u8])
                });
                let save = |path: std::path::PathBuf, r: image::ImageResult<()>| {
                    r.map_err(|e| PhysclipError::media_save(format!("{}: {e}", path.display())))
                };
                let p = output_dir.join(frame_file("scene", i));
                save(p.clone(), f.scene.save(&p))?;
                let p = output_dir.join(frame_file("depth", i));
                save(p.clone(), depth.save(&p))?;
                let p = output_dir.join(frame_file("masks", i));
                save(p.clone(), f.masks.save(&p))?;
                Ok(())
            })?;

        Ok(SaveReport {
            ok: true,
            max_depth: f64::from(max_depth),
            masks: self.masks.clone(),
        })
    }

    fn reset_buffers(&mut self) {
        self.frames.clear();
        self.masks.clear();
    }

    fn captured_frames(&self) -> usize {
        self.frames.len()
    }
}

/// Backend that counts frames and writes nothing; `save_run` reports success.
#[derive(Debug, Default)]
pub struct NullCapture {
    frames: usize,
}

impl CaptureBackend for NullCapture {
    fn begin_capture(&mut self, _camera: ActorHandle, _frame_count: usize) -> PhysclipResult<()> {
        self.frames = 0;
        Ok(())
    }

    fn capture_frame(&mut self, _request: &CaptureRequest<'_>) -> PhysclipResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn save_run(&mut self, _output_dir: &Path) -> PhysclipResult<SaveReport> {
        Ok(SaveReport {
            ok: true,
            ..SaveReport::default()
        })
    }

    fn reset_buffers(&mut self) {
        self.frames = 0;
    }

    fn captured_frames(&self) -> usize {
        self.frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/world/capture.rs"]
mod tests;
