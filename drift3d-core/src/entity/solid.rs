//! Rotating, bobbing wireframe solids
use nalgebra::Point3;
use std::cmp::Ordering;

use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, Rgb};
use crate::config::SolidConfig;
use crate::geometry::{generate, Shape, ShapeKind};
use crate::projection::ProjectedPoint;
use crate::surface::{scoped, Surface};
use crate::transform::RotationState;

/// How a solid sways over time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float {
    pub amplitude: f32,
    pub speed: f32,
    pub offset: f32,
}

#[derive(Debug, Clone)]
pub struct Solid {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub position: Point3<f32>,
    pub base_y: f32,
    pub rotation: RotationState,
    /// Angle increments applied every tick
    pub spin: RotationState,
    pub float: Float,
    pub color: Rgb,
    alpha_band: (f32, f32),
    min_line_width: f32,
    line_width_scale: f32,
}

impl Solid {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: ShapeKind,
        size: f32,
        position: Point3<f32>,
        rotation: RotationState,
        spin: RotationState,
        float: Float,
        color: Rgb,
        config: &SolidConfig,
    ) -> Self {
        Self {
            kind,
            shape: generate(kind, size),
            position,
            base_y: position.y,
            rotation,
            spin,
            float,
            color,
            alpha_band: (config.alpha_min, config.alpha_max),
            min_line_width: config.min_line_width,
            line_width_scale: config.line_width_scale,
        }
    }

    pub fn depth(&self) -> f32 {
        self.position.z
    }

    /// Rotate then project every vertex; `None` marks vertices to skip
    pub fn project(&self, frame: &Frame) -> Vec<Option<ProjectedPoint>> {
        let rotation = self.rotation.rotation();
        let center = frame.viewport.center();
        self.shape
            .vertices
            .iter()
            .map(|v| {
                let world = self.position + (rotation * v).coords;
                frame.projector.project(&world, center)
            })
            .collect()
    }

    /// Stroke alpha and width for a reference scale, clamped to the band
    pub fn stroke_style(&self, scale: f32) -> (f32, f32) {
        let (lo, hi) = self.alpha_band;
        let alpha = scale.clamp(lo, hi);
        let width = (scale * self.line_width_scale).max(self.min_line_width);
        (alpha, width)
    }
}

impl Entity for Solid {
    fn update(&mut self, frame: &Frame, _rng: &mut SceneRng) {
        self.rotation.advance(&self.spin);
        let phase = frame.time * self.float.speed + self.float.offset;
        self.position.y = self.base_y + phase.sin() * self.float.amplitude;
    }

    fn draw(&self, surface: &mut dyn Surface, frame: &Frame) {
        let projected = self.project(frame);
        let Some(reference) = projected.first().copied().flatten() else {
            return;
        };
        let (alpha, width) = self.stroke_style(reference.scale);

        scoped(surface, |s| {
            s.set_global_alpha(alpha);
            s.set_stroke(&Paint::from(self.color));
            s.set_line_width(width);
            s.begin_path();
            for edge in &self.shape.edges {
                if let (Some(a), Some(b)) = (projected[edge.0], projected[edge.1]) {
                    s.move_to(a.x, a.y);
                    s.line_to(b.x, b.y);
                }
            }
            s.stroke();
        });
    }
}

/// Order solids farthest first so nearer ones paint over them
pub fn depth_sort(solids: &mut [Solid]) {
    solids.sort_by(|a, b| b.depth().partial_cmp(&a.depth()).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::testing::{frame, rng};
    use crate::surface::{Command, Composite, PathOp, RecordingSurface};

    fn solid_at(z: f32) -> Solid {
        Solid::new(
            ShapeKind::Cube,
            20.0,
            Point3::new(400.0, 300.0, z),
            RotationState::zero(),
            RotationState::new(0.01, 0.02, 0.005),
            Float {
                amplitude: 10.0,
                speed: 1.0,
                offset: 0.0,
            },
            Rgb::new(0, 242, 255),
            &SolidConfig::default(),
        )
    }

    #[test]
    fn test_update_spins_and_bobs() {
        let mut solid = solid_at(300.0);
        let mut rng = rng();
        solid.update(&frame(std::f32::consts::FRAC_PI_2), &mut rng);
        assert!((solid.rotation.x - 0.01).abs() < 1e-6);
        assert!((solid.rotation.y - 0.02).abs() < 1e-6);
        assert!((solid.position.y - 310.0).abs() < 1e-3);

        solid.update(&frame(0.0), &mut rng);
        assert!((solid.rotation.x - 0.02).abs() < 1e-6);
        assert!((solid.position.y - 300.0).abs() < 1e-3);
        assert_eq!(solid.depth(), 300.0);
    }

    #[test]
    fn test_stroke_style_is_clamped() {
        let solid = solid_at(0.0);
        assert_eq!(solid.stroke_style(5.0), (0.75, 10.0));
        assert_eq!(solid.stroke_style(0.01), (0.18, 1.0));
        let (alpha, width) = solid.stroke_style(0.5);
        assert_eq!(alpha, 0.5);
        assert_eq!(width, 1.0);
    }

    #[test]
    fn test_draw_strokes_every_edge() {
        let solid = solid_at(300.0);
        let mut surface = RecordingSurface::new();
        solid.draw(&mut surface, &frame(0.0));

        assert_eq!(surface.commands.len(), 1);
        match &surface.commands[0] {
            Command::Stroke { path, state } => {
                let moves = path.iter().filter(|op| matches!(op, PathOp::MoveTo(..))).count();
                assert_eq!(moves, 12);
                // scale at z=300 is 0.75
                assert!((state.alpha - 0.75).abs() < 1e-4);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(surface.state().alpha, 1.0);
        assert_eq!(surface.state().composite, Composite::SourceOver);
    }

    #[test]
    fn test_behind_camera_draws_nothing() {
        let solid = solid_at(-950.0);
        let mut surface = RecordingSurface::new();
        solid.draw(&mut surface, &frame(0.0));
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_depth_sort_farthest_first() {
        let mut solids = vec![solid_at(300.0), solid_at(100.0), solid_at(450.0)];
        depth_sort(&mut solids);
        let order: Vec<f32> = solids.iter().map(Solid::depth).collect();
        assert_eq!(order, vec![450.0, 300.0, 100.0]);
    }
}
