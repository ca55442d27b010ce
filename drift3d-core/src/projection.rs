//! Perspective projection from scene space to the 2D drawing surface
use nalgebra::Point3;

use crate::config::{CameraConfig, Viewport};

/// A projected point: screen position and the depth-derived scale factor.
///
/// `scale` drives both positional shrink toward the center and the
/// size/alpha falloff of whatever is drawn there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Pinhole projector with a fixed camera distance and focal constant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub camera_z: f32,
    pub focal: f32,
    pub near_epsilon: f32,
}

impl Projector {
    pub fn new(camera_z: f32, focal: f32, near_epsilon: f32) -> Self {
        Self {
            camera_z,
            focal,
            near_epsilon,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.camera_z, config.focal, config.near_epsilon)
    }

    /// Scale factor at depth `z`, or `None` when the point sits behind or
    /// too close to the camera
    pub fn scale_at(&self, z: f32) -> Option<f32> {
        let depth = self.camera_z + z;
        if !(depth > self.near_epsilon) {
            return None;
        }
        Some(self.focal / depth)
    }

    /// Project a world-space point around the screen center `(cx, cy)`.
    ///
    /// Returns `None` for points the caller must skip drawing.
    pub fn project(&self, point: &Point3<f32>, center: (f32, f32)) -> Option<ProjectedPoint> {
        let scale = self.scale_at(point.z)?;
        let (cx, cy) = center;
        Some(ProjectedPoint {
            x: (point.x - cx) * scale + cx,
            y: (point.y - cy) * scale + cy,
            scale,
        })
    }

    /// Project around the viewport's center
    pub fn project_in(&self, point: &Point3<f32>, viewport: &Viewport) -> Option<ProjectedPoint> {
        self.project(point, viewport.center())
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
