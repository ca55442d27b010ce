//! Slanted light shafts with a breathing alpha
use rand::Rng;
use std::f32::consts::TAU;

use super::{Entity, Frame, SceneRng};
use crate::color::{LinearGradient, Paint, Rgb, Rgba};
use crate::config::BeamConfig;
use crate::surface::{scoped, Surface};

#[derive(Debug, Clone)]
pub struct LightBeam {
    pub x: f32,
    /// +1 leans right, -1 leans left
    pub direction: f32,
    pub color: Rgb,
    pub speed: f32,
    pub offset: f32,
    pub width: f32,
    pub alpha: f32,
    alpha_base: f32,
    alpha_swing: f32,
    slant: f32,
}

impl LightBeam {
    pub fn spawn(x: f32, color: Rgb, config: &BeamConfig, rng: &mut SceneRng) -> Self {
        let mut beam = Self {
            x,
            direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            color,
            speed: config.speed.sample(rng),
            offset: rng.gen_range(0.0..TAU),
            width: config.width.sample(rng),
            alpha: 0.0,
            alpha_base: config.alpha_base,
            alpha_swing: config.alpha_swing,
            slant: 0.0,
        };
        beam.slant = config.slant + beam.width * config.slant_width_mul;
        beam.alpha = beam.alpha_at(0.0);
        beam
    }

    /// Oscillates within `[alpha_base, alpha_base + 2 * alpha_swing]`
    pub fn alpha_at(&self, t: f32) -> f32 {
        self.alpha_base + (t * self.speed + self.offset).sin() * self.alpha_swing + self.alpha_swing
    }

    /// Horizontal offset of the beam's foot relative to its top
    pub fn lean(&self) -> f32 {
        self.direction * self.slant
    }
}

impl Entity for LightBeam {
    fn update(&mut self, frame: &Frame, _rng: &mut SceneRng) {
        self.alpha = self.alpha_at(frame.time);
    }

    fn draw(&self, surface: &mut dyn Surface, frame: &Frame) {
        let height = frame.viewport.height;
        let dx = self.lean();
        let band = self.color.with_alpha(self.alpha);
        let gradient = LinearGradient::new(self.x, 0.0, self.x + dx, height)
            .stop(0.0, Rgba::TRANSPARENT)
            .stop(0.35, band)
            .stop(0.65, band)
            .stop(1.0, Rgba::TRANSPARENT);

        scoped(surface, |s| {
            s.set_fill(&Paint::Linear(gradient));
            s.begin_path();
            s.move_to(self.x, 0.0);
            s.line_to(self.x + self.width, 0.0);
            s.line_to(self.x + dx + self.width, height);
            s.line_to(self.x + dx, height);
            s.close_path();
            s.fill();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::testing::{frame, rng};
    use crate::surface::{Command, PathOp, RecordingSurface};

    #[test]
    fn test_alpha_stays_in_band() {
        let mut rng = rng();
        let config = BeamConfig::default();
        let mut beam = LightBeam::spawn(200.0, Rgb::new(0, 242, 255), &config, &mut rng);
        for i in 0..500 {
            beam.update(&frame(i as f32 * 0.05), &mut rng);
            assert!(beam.alpha >= config.alpha_base - 1e-6);
            assert!(beam.alpha <= config.alpha_base + 2.0 * config.alpha_swing + 1e-6);
        }
    }

    #[test]
    fn test_draws_closed_quad() {
        let mut rng = rng();
        let beam = LightBeam::spawn(200.0, Rgb::new(112, 0, 255), &BeamConfig::default(), &mut rng);
        let mut surface = RecordingSurface::new();
        beam.draw(&mut surface, &frame(0.0));
        match &surface.commands[0] {
            Command::Fill { path, state } => {
                assert_eq!(path.len(), 5);
                assert_eq!(path.last(), Some(&PathOp::Close));
                assert!(matches!(state.fill, Paint::Linear(_)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
