//! Glowing orbs circling a fixed anchor
use rand::Rng;
use std::f32::consts::TAU;

use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, RadialGradient, Rgb, Rgba};
use crate::config::{OrbConfig, Viewport};
use crate::surface::{scoped, Composite, Surface};

#[derive(Debug, Clone)]
pub struct Orb {
    pub anchor: (f32, f32),
    /// Ellipse semi-axes
    pub orbit: (f32, f32),
    /// Radians per second
    pub angular_speed: f32,
    pub phase: f32,
    pub base_radius: f32,
    pub pulse_speed: f32,
    pub pulse_amount: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub position: (f32, f32),
    pub radius: f32,
}

impl Orb {
    pub fn spawn(viewport: &Viewport, color: Rgb, config: &OrbConfig, rng: &mut SceneRng) -> Self {
        let anchor = (
            rng.gen_range(0.15..=0.85) * viewport.width,
            rng.gen_range(0.15..=0.85) * viewport.height,
        );
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let mut orb = Self {
            anchor,
            orbit: (config.orbit_x.sample(rng), config.orbit_y.sample(rng)),
            angular_speed: config.angular_speed.sample(rng) * direction,
            phase: rng.gen_range(0.0..TAU),
            base_radius: config.radius.sample(rng),
            pulse_speed: config.pulse_speed.sample(rng),
            pulse_amount: config.pulse_amount,
            color,
            alpha: config.alpha,
            position: anchor,
            radius: 0.0,
        };
        orb.advance_to(0.0);
        orb
    }

    /// Point on the orbit at time `t`
    pub fn position_at(&self, t: f32) -> (f32, f32) {
        let angle = self.phase + t * self.angular_speed;
        (
            self.anchor.0 + angle.cos() * self.orbit.0,
            self.anchor.1 + angle.sin() * self.orbit.1,
        )
    }

    pub fn radius_at(&self, t: f32) -> f32 {
        self.base_radius * (1.0 + (t * self.pulse_speed + self.phase).sin() * self.pulse_amount)
    }

    /// Seconds for one full lap
    pub fn period(&self) -> f32 {
        TAU / self.angular_speed.abs()
    }

    fn advance_to(&mut self, t: f32) {
        self.position = self.position_at(t);
        self.radius = self.radius_at(t);
    }
}

impl Entity for Orb {
    fn update(&mut self, frame: &Frame, _rng: &mut SceneRng) {
        self.advance_to(frame.time);
    }

    fn draw(&self, surface: &mut dyn Surface, _frame: &Frame) {
        if self.radius <= 0.0 {
            return;
        }
        let (x, y) = self.position;
        let glow = RadialGradient::centered(x, y, 0.0, self.radius)
            .stop(0.0, self.color.with_alpha(0.9))
            .stop(0.4, self.color.with_alpha(0.35))
            .stop(1.0, Rgba::TRANSPARENT);

        scoped(surface, |s| {
            s.set_composite(Composite::Lighter);
            s.set_global_alpha(self.alpha);
            s.set_fill(&Paint::Radial(glow));
            s.begin_path();
            s.circle(x, y, self.radius);
            s.fill();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::testing::{frame, rng};
    use crate::surface::RecordingSurface;

    #[test]
    fn test_orbit_is_periodic() {
        let frame = frame(0.0);
        let mut rng = rng();
        let orb = Orb::spawn(&frame.viewport, Rgb::new(0, 242, 255), &OrbConfig::default(), &mut rng);
        let t = 3.7;
        let (x0, y0) = orb.position_at(t);
        let (x1, y1) = orb.position_at(t + orb.period());
        assert!((x0 - x1).abs() < 1e-2);
        assert!((y0 - y1).abs() < 1e-2);
    }

    #[test]
    fn test_stays_on_ellipse_and_pulses_within_band() {
        let frame0 = frame(0.0);
        let mut rng = rng();
        let config = OrbConfig::default();
        let mut orb = Orb::spawn(&frame0.viewport, Rgb::new(112, 0, 255), &config, &mut rng);
        for i in 0..200 {
            orb.update(&frame(i as f32 * 0.1), &mut rng);
            let dx = (orb.position.0 - orb.anchor.0) / orb.orbit.0;
            let dy = (orb.position.1 - orb.anchor.1) / orb.orbit.1;
            assert!((dx * dx + dy * dy - 1.0).abs() < 1e-3);
            let lo = orb.base_radius * (1.0 - config.pulse_amount) - 1e-3;
            let hi = orb.base_radius * (1.0 + config.pulse_amount) + 1e-3;
            assert!(orb.radius >= lo && orb.radius <= hi);
        }
    }

    #[test]
    fn test_draw_is_additive_and_scoped() {
        let frame = frame(0.0);
        let mut rng = rng();
        let orb = Orb::spawn(&frame.viewport, Rgb::new(255, 0, 200), &OrbConfig::default(), &mut rng);
        let mut surface = RecordingSurface::new();
        orb.draw(&mut surface, &frame);
        assert_eq!(surface.commands.len(), 1);
        assert_eq!(surface.commands[0].state().composite, Composite::Lighter);
        assert_eq!(surface.state().composite, Composite::SourceOver);
    }
}
