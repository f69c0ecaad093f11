use glam::{Mat4, Vec3};
use meadowrun_camera::Camera;
use std::fmt::Write;

use crate::scene::FrameScene;

/// Snapshot of the camera a frame is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    /// Field of view in degrees, taken from the camera zoom.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&Camera::default(), 16.0 / 9.0)
    }
}

impl RenderView {
    /// Read the camera after the frame's updates have been applied.
    pub fn from_camera(camera: &Camera, aspect: f32) -> Self {
        Self {
            eye: camera.position(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect),
            fov_degrees: camera.zoom(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Renderer-agnostic interface.
///
/// A renderer consumes a prepared [`FrameScene`] and a view. It never sees the
/// session, so it cannot change game state.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &FrameScene, view: &RenderView) -> Self::Output;
}

/// Plain-text renderer for the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &FrameScene, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (opaque={}, markers={}, billboards={}) ===",
            scene.opaque.len(),
            scene.markers.len(),
            scene.billboards.len()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.fov_degrees
        );
        for (i, light) in scene.lights.iter().enumerate() {
            let p = light.position;
            let _ = writeln!(out, "  light[{i}] pos=({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
        }
        for item in &scene.billboards {
            let p = item.translation();
            let _ = writeln!(
                out,
                "  grass pos=({:.2}, {:.2}, {:.2}) dist={:.2}",
                p.x,
                p.y,
                p.z,
                p.distance(view.eye)
            );
        }
        out
    }
}
