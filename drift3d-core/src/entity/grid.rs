//! Perspective ground grid scrolling toward the viewer
use nalgebra::Point3;

use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, Rgb};
use crate::config::GridConfig;
use crate::surface::{scoped, Surface};

/// Spacing below this draws nothing
const MIN_SPACING: f32 = 1.0;
const MAX_ROWS: usize = 512;

#[derive(Debug, Clone)]
pub struct GridGround {
    pub color: Rgb,
    pub pulse_color: Rgb,
    /// Scroll offset in `[0, spacing)`
    pub offset: f32,
    /// Depth of the bright sweep line
    pub pulse_depth: f32,
    config: GridConfig,
}

impl GridGround {
    pub fn new(color: Rgb, pulse_color: Rgb, config: &GridConfig) -> Self {
        Self {
            color,
            pulse_color,
            offset: 0.0,
            pulse_depth: config.depth_far,
            config: config.clone(),
        }
    }

    /// Depths of the cross lines, nearest first
    pub fn row_depths(&self) -> impl Iterator<Item = f32> + '_ {
        let c = &self.config;
        let rows = if c.spacing >= MIN_SPACING {
            ((c.depth_far - c.depth_near) / c.spacing).ceil().clamp(0.0, MAX_ROWS as f32) as usize + 1
        } else {
            0
        };
        (0..rows)
            .map(move |i| c.depth_near + i as f32 * c.spacing - self.offset)
            .filter(move |z| *z >= c.depth_near - c.spacing && *z <= c.depth_far)
    }

    fn stroke_row(&self, s: &mut dyn Surface, frame: &Frame, z: f32, ground: f32) {
        let w = frame.viewport.width;
        let center = frame.viewport.center();
        let left = frame.projector.project(&Point3::new(-w, ground, z), center);
        let right = frame.projector.project(&Point3::new(2.0 * w, ground, z), center);
        if let (Some(a), Some(b)) = (left, right) {
            s.begin_path();
            s.move_to(a.x, a.y);
            s.line_to(b.x, b.y);
            s.stroke();
        }
    }
}

impl Entity for GridGround {
    fn update(&mut self, frame: &Frame, _rng: &mut SceneRng) {
        let c = &self.config;
        self.offset = (frame.time * c.scroll_speed).rem_euclid(c.spacing);
        let sweep = (frame.time / c.pulse_period).rem_euclid(1.0);
        self.pulse_depth = c.depth_far - sweep * (c.depth_far - c.depth_near);
    }

    fn draw(&self, surface: &mut dyn Surface, frame: &Frame) {
        let c = &self.config;
        let w = frame.viewport.width;
        let ground = frame.viewport.height * c.ground_y;
        let center = frame.viewport.center();
        if c.spacing < MIN_SPACING || c.column_spacing < MIN_SPACING {
            return;
        }

        scoped(surface, |s| {
            s.set_stroke(&Paint::from(self.color));
            s.set_line_width(1.0);

            // Rails running into the distance
            s.set_global_alpha(c.alpha);
            s.begin_path();
            let mut x = -w;
            while x <= 2.0 * w {
                let near = frame.projector.project(&Point3::new(x, ground, c.depth_near), center);
                let far = frame.projector.project(&Point3::new(x, ground, c.depth_far), center);
                if let (Some(a), Some(b)) = (near, far) {
                    s.move_to(a.x, a.y);
                    s.line_to(b.x, b.y);
                }
                x += c.column_spacing;
            }
            s.stroke();

            // Cross lines fade with distance
            for z in self.row_depths() {
                let Some(scale) = frame.projector.scale_at(z) else {
                    continue;
                };
                s.set_global_alpha(c.alpha * scale.min(1.0));
                self.stroke_row(s, frame, z, ground);
            }

            s.set_stroke(&Paint::from(self.pulse_color));
            s.set_line_width(2.0);
            s.set_global_alpha(c.pulse_alpha);
            self.stroke_row(s, frame, self.pulse_depth, ground);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::testing::{frame, rng};
    use crate::surface::RecordingSurface;

    #[test]
    fn test_degenerate_spacing_draws_nothing() {
        let mut rng = rng();
        for config in [
            GridConfig { spacing: 0.0, ..GridConfig::default() },
            GridConfig { column_spacing: 0.0, ..GridConfig::default() },
            GridConfig { spacing: -5.0, ..GridConfig::default() },
        ] {
            let mut grid = GridGround::new(Rgb::new(112, 0, 255), Rgb::new(0, 242, 255), &config);
            let now = frame(2.0);
            grid.update(&now, &mut rng);
            let mut surface = RecordingSurface::new();
            grid.draw(&mut surface, &now);
            assert!(surface.commands.is_empty());
            assert_eq!(surface.save_depth(), 0);
        }

        let huge = GridConfig { depth_far: 1.0e30, ..GridConfig::default() };
        let grid = GridGround::new(Rgb::new(112, 0, 255), Rgb::new(0, 242, 255), &huge);
        assert!(grid.row_depths().count() <= MAX_ROWS + 1);
    }

    fn grid() -> GridGround {
        GridGround::new(Rgb::new(112, 0, 255), Rgb::new(0, 242, 255), &GridConfig::default())
    }

    #[test]
    fn test_offset_wraps_with_spacing() {
        let config = GridConfig::default();
        let mut grid = grid();
        let mut rng = rng();
        for i in 0..300 {
            grid.update(&frame(i as f32 * 0.37), &mut rng);
            assert!(grid.offset >= 0.0 && grid.offset < config.spacing);
            assert!(grid.pulse_depth <= config.depth_far && grid.pulse_depth >= config.depth_near);
        }
        // 1.5 spacings in
        grid.update(&frame(1.5 * config.spacing / config.scroll_speed), &mut rng);
        assert!((grid.offset - config.spacing * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_pulse_sweeps_toward_viewer() {
        let config = GridConfig::default();
        let mut grid = grid();
        let mut rng = rng();
        grid.update(&frame(0.0), &mut rng);
        assert_eq!(grid.pulse_depth, config.depth_far);
        grid.update(&frame(config.pulse_period * 0.5), &mut rng);
        let mid = grid.pulse_depth;
        grid.update(&frame(config.pulse_period * 0.9), &mut rng);
        assert!(grid.pulse_depth < mid);
    }

    #[test]
    fn test_rows_scroll_toward_viewer() {
        let mut grid = grid();
        let mut rng = rng();
        grid.update(&frame(0.0), &mut rng);
        let before: Vec<f32> = grid.row_depths().collect();
        grid.update(&frame(0.5), &mut rng);
        let after: Vec<f32> = grid.row_depths().collect();
        assert_eq!(before.len(), after.len());
        assert!(after[0] < before[0]);
    }

    #[test]
    fn test_draw_leaves_neutral_state() {
        let mut surface = RecordingSurface::new();
        grid().draw(&mut surface, &frame(0.0));
        assert!(surface.commands.len() > 2);
        assert_eq!(surface.state().alpha, 1.0);
        assert_eq!(surface.save_depth(), 0);
    }
}
