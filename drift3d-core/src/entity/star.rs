//! Distant twinkling stars drifting slowly toward the camera
use nalgebra::Point3;
use rand::Rng;
use std::f32::consts::TAU;

use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, Rgb};
use crate::config::{StarConfig, Viewport};
use crate::projection::Projector;
use crate::surface::{scoped, Surface};

#[derive(Debug, Clone)]
pub struct Star {
    pub position: Point3<f32>,
    /// Depth travelled per tick
    pub speed: f32,
    pub size: f32,
    pub twinkle_speed: f32,
    pub twinkle_phase: f32,
    pub color: Rgb,
    pub alpha: f32,
    recycles: u32,
    config: StarConfig,
}

impl Star {
    pub fn spawn(
        viewport: &Viewport,
        projector: &Projector,
        color: Rgb,
        config: &StarConfig,
        rng: &mut SceneRng,
    ) -> Self {
        let mut star = Self {
            position: Point3::origin(),
            speed: 0.0,
            size: 0.0,
            twinkle_speed: 0.0,
            twinkle_phase: 0.0,
            color,
            alpha: 0.0,
            recycles: 0,
            config: config.clone(),
        };
        let z = config.depth.sample(rng);
        star.randomize(viewport, projector, z, rng);
        star
    }

    pub fn recycles(&self) -> u32 {
        self.recycles
    }

    /// Brightness multiplier in `[0.25, 1]`
    pub fn twinkle(&self, t: f32) -> f32 {
        0.625 + 0.375 * (t * self.twinkle_speed + self.twinkle_phase).sin()
    }

    /// Place the star at depth `z`, anywhere that projects onto the viewport
    fn randomize(&mut self, viewport: &Viewport, projector: &Projector, z: f32, rng: &mut SceneRng) {
        let spread = projector.scale_at(z).map_or(1.0, |scale| 1.0 / scale);
        let (cx, cy) = viewport.center();
        self.position.z = z;
        self.position.x = cx + rng.gen_range(-0.5..=0.5) * viewport.width * spread;
        self.position.y = cy + rng.gen_range(-0.5..=0.5) * viewport.height * spread;
        self.speed = self.config.speed.sample(rng);
        self.size = self.config.size.sample(rng);
        self.twinkle_speed = self.config.twinkle_speed.sample(rng);
        self.twinkle_phase = rng.gen_range(0.0..TAU);
    }

    fn recycle(&mut self, frame: &Frame, rng: &mut SceneRng) {
        let far = self.config.depth.max;
        self.randomize(&frame.viewport, &frame.projector, far, rng);
        self.recycles += 1;
    }
}

impl Entity for Star {
    fn update(&mut self, frame: &Frame, rng: &mut SceneRng) {
        self.position.z -= self.speed;
        if self.position.z < self.config.near_z {
            self.recycle(frame, rng);
        } else {
            let on_screen = frame
                .projector
                .project_in(&self.position, &frame.viewport)
                .is_some_and(|p| frame.viewport.contains(p.x, p.y, self.config.bound_margin));
            if !on_screen {
                self.recycle(frame, rng);
            }
        }
        self.alpha = self.config.alpha * self.twinkle(frame.time);
    }

    fn draw(&self, surface: &mut dyn Surface, frame: &Frame) {
        let Some(p) = frame.projector.project_in(&self.position, &frame.viewport) else {
            return;
        };
        let side = (self.size * p.scale).max(0.5);
        scoped(surface, |s| {
            s.set_global_alpha(self.alpha * p.scale.min(1.0));
            s.set_fill(&Paint::from(self.color));
            s.fill_rect(p.x - side * 0.5, p.y - side * 0.5, side, side);
        });
    }
}
