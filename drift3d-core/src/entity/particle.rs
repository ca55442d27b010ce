//! Depth particles streaming toward the camera
use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::collections::VecDeque;

use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, RadialGradient, Rgb, Rgba};
use crate::config::{ParticleConfig, Viewport};
use crate::surface::{scoped, Composite, Surface};

/// Alpha per unit of projected scale, before `alpha_max`
const ALPHA_PER_SCALE: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    pub size: f32,
    pub color: Rgb,
    /// Recent screen positions, oldest first
    pub trail: VecDeque<(f32, f32)>,
    recycles: u32,
    config: ParticleConfig,
}

impl Particle {
    /// Spawn anywhere within the depth range so the field starts populated
    pub fn spawn(viewport: &Viewport, color: Rgb, config: &ParticleConfig, rng: &mut SceneRng) -> Self {
        let mut particle = Self::with_state(Point3::origin(), Vector3::zeros(), 1.0, color, config);
        particle.randomize(viewport, rng);
        particle.position.z = config.spawn_depth.sample(rng);
        particle
    }

    pub fn with_state(
        position: Point3<f32>,
        velocity: Vector3<f32>,
        size: f32,
        color: Rgb,
        config: &ParticleConfig,
    ) -> Self {
        Self {
            position,
            velocity,
            size,
            color,
            trail: VecDeque::with_capacity(config.trail_len),
            recycles: 0,
            config: config.clone(),
        }
    }

    /// Times this particle has been recycled in place
    pub fn recycles(&self) -> u32 {
        self.recycles
    }

    /// Fresh kinematics at the far end of the spawn range
    fn recycle(&mut self, viewport: &Viewport, rng: &mut SceneRng) {
        self.randomize(viewport, rng);
        self.position.z = self.config.spawn_depth.max;
        self.recycles += 1;
    }

    fn randomize(&mut self, viewport: &Viewport, rng: &mut SceneRng) {
        let drift = self.config.drift;
        self.position.x = rng.gen_range(0.0..=viewport.width);
        self.position.y = rng.gen_range(0.0..=viewport.height);
        self.velocity = Vector3::new(
            rng.gen_range(-drift..=drift),
            rng.gen_range(-drift..=drift),
            -self.config.speed.sample(rng),
        );
        self.size = self.config.size.sample(rng);
        self.trail.clear();
    }

    fn alpha(&self, scale: f32) -> f32 {
        (scale * ALPHA_PER_SCALE).min(self.config.alpha_max)
    }
}

impl Entity for Particle {
    fn update(&mut self, frame: &Frame, rng: &mut SceneRng) {
        self.position += self.velocity;

        if self.position.z < self.config.near_z {
            self.recycle(&frame.viewport, rng);
            return;
        }

        match frame.projector.project_in(&self.position, &frame.viewport) {
            Some(p) if frame.viewport.contains(p.x, p.y, self.config.bound_margin) => {
                if self.config.trail_len == 0 {
                    return;
                }
                if self.trail.len() == self.config.trail_len {
                    self.trail.pop_front();
                }
                self.trail.push_back((p.x, p.y));
            }
            _ => self.recycle(&frame.viewport, rng),
        }
    }

    fn draw(&self, surface: &mut dyn Surface, frame: &Frame) {
        let Some(p) = frame.projector.project_in(&self.position, &frame.viewport) else {
            return;
        };
        let alpha = self.alpha(p.scale);
        let radius = (self.size * p.scale).max(0.3);

        scoped(surface, |s| {
            if self.trail.len() > 1 {
                s.set_stroke(&Paint::from(self.color));
                s.set_line_width(radius * 0.6);
                let steps = self.trail.len() as f32;
                let segments = self.trail.iter().zip(self.trail.iter().skip(1));
                for (i, (from, to)) in segments.enumerate() {
                    s.set_global_alpha(alpha * (i + 1) as f32 / steps * 0.5);
                    s.begin_path();
                    s.move_to(from.0, from.1);
                    s.line_to(to.0, to.1);
                    s.stroke();
                }
            }

            let glow = RadialGradient::centered(p.x, p.y, 0.0, radius * self.config.glow_factor)
                .stop(0.0, self.color.with_alpha(0.5))
                .stop(1.0, Rgba::TRANSPARENT);
            s.set_composite(Composite::Lighter);
            s.set_global_alpha(alpha);
            s.set_fill(&Paint::Radial(glow));
            s.begin_path();
            s.circle(p.x, p.y, radius * self.config.glow_factor);
            s.fill();

            s.set_composite(Composite::SourceOver);
            s.set_fill(&Paint::from(self.color));
            s.begin_path();
            s.circle(p.x, p.y, radius);
            s.fill();
        });
    }
}
