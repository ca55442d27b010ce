//! Expanding ripple pulse
//!
//! `Inactive -> trigger -> Pending(delay) -> Expanding -> Inactive`. The
//! expanding phase grows by a fixed step per tick while intensity falls
//! linearly with radius; it ends once the radius passes `max_radius` or the
//! intensity drops under the threshold.
use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, Rgb};
use crate::config::RippleConfig;
use crate::surface::{scoped, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RippleState {
    Inactive,
    /// Ticks left before expansion starts
    Pending { remaining: u32 },
    Expanding { radius: f32, intensity: f32 },
}

#[derive(Debug, Clone)]
pub struct RippleWave {
    pub origin: (f32, f32),
    pub color: Rgb,
    state: RippleState,
    config: RippleConfig,
}

impl RippleWave {
    pub fn new(color: Rgb, config: &RippleConfig) -> Self {
        Self {
            origin: (0.0, 0.0),
            color,
            state: RippleState::Inactive,
            config: config.clone(),
        }
    }

    pub fn state(&self) -> RippleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, RippleState::Inactive)
    }

    /// Start a new pulse at `origin` after `delay` ticks, replacing any
    /// pulse in flight
    pub fn trigger(&mut self, origin: (f32, f32), delay: u32) {
        tracing::trace!(x = origin.0, y = origin.1, delay, "ripple triggered");
        self.origin = origin;
        self.state = RippleState::Pending { remaining: delay };
    }

    /// Upper bound on ticks spent expanding
    pub fn max_expanding_ticks(&self) -> u32 {
        (self.config.max_radius / self.config.step).ceil() as u32
    }

    /// Advance the state machine by one tick
    pub fn step(&mut self) {
        let c = &self.config;
        self.state = match self.state {
            RippleState::Inactive => RippleState::Inactive,
            RippleState::Pending { remaining: 0 } => RippleState::Expanding {
                radius: 0.0,
                intensity: 1.0,
            },
            RippleState::Pending { remaining } => RippleState::Pending {
                remaining: remaining - 1,
            },
            RippleState::Expanding { radius, .. } => {
                let radius = radius + c.step;
                let intensity = (1.0 - radius / c.max_radius).max(0.0);
                if radius >= c.max_radius || intensity < c.threshold {
                    RippleState::Inactive
                } else {
                    RippleState::Expanding { radius, intensity }
                }
            }
        };
    }
}

impl Entity for RippleWave {
    fn update(&mut self, _frame: &Frame, _rng: &mut SceneRng) {
        self.step();
    }

    fn draw(&self, surface: &mut dyn Surface, _frame: &Frame) {
        let RippleState::Expanding { radius, intensity } = self.state else {
            return;
        };
        if radius <= 0.0 {
            return;
        }
        let (x, y) = self.origin;
        scoped(surface, |s| {
            s.set_stroke(&Paint::from(self.color));
            s.set_line_width(self.config.line_width);
            s.set_global_alpha(self.config.alpha * intensity);
            s.begin_path();
            s.circle(x, y, radius);
            s.stroke();

            // Faint echo ring trailing the front
            let echo = radius * 0.7;
            if echo > 1.0 {
                s.set_global_alpha(self.config.alpha * intensity * 0.4);
                s.begin_path();
                s.circle(x, y, echo);
                s.stroke();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::testing::{frame, rng};
    use crate::surface::RecordingSurface;

    fn ripple() -> RippleWave {
        RippleWave::new(Rgb::new(0, 242, 255), &RippleConfig::default())
    }

    #[test]
    fn test_zero_delay_expands_on_next_update() {
        let mut ripple = ripple();
        assert_eq!(ripple.state(), RippleState::Inactive);
        ripple.trigger((100.0, 100.0), 0);
        ripple.update(&frame(0.0), &mut rng());
        assert!(matches!(ripple.state(), RippleState::Expanding { .. }));
    }

    #[test]
    fn test_delay_counts_down() {
        let mut ripple = ripple();
        ripple.trigger((0.0, 0.0), 3);
        for remaining in [2, 1, 0] {
            ripple.step();
            assert_eq!(ripple.state(), RippleState::Pending { remaining });
        }
        ripple.step();
        assert!(matches!(ripple.state(), RippleState::Expanding { .. }));
    }

    #[test]
    fn test_radius_grows_and_machine_terminates() {
        let mut ripple = ripple();
        ripple.trigger((0.0, 0.0), 0);
        ripple.step();

        let bound = ripple.max_expanding_ticks();
        let mut last_radius = 0.0;
        let mut last_intensity = 1.0;
        let mut ticks = 0;
        while let RippleState::Expanding { radius, intensity } = ripple.state() {
            assert!(radius >= last_radius);
            assert!(intensity <= last_intensity);
            last_radius = radius;
            last_intensity = intensity;
            ripple.step();
            ticks += 1;
            assert!(ticks <= bound, "ripple outlived {bound} ticks");
        }
        assert_eq!(ripple.state(), RippleState::Inactive);
        assert!(!ripple.is_active());
    }

    #[test]
    fn test_retrigger_restarts() {
        let mut ripple = ripple();
        ripple.trigger((0.0, 0.0), 0);
        for _ in 0..10 {
            ripple.step();
        }
        ripple.trigger((50.0, 60.0), 2);
        assert_eq!(ripple.state(), RippleState::Pending { remaining: 2 });
        assert_eq!(ripple.origin, (50.0, 60.0));
    }

    #[test]
    fn test_draw_only_while_expanding() {
        let f = frame(0.0);
        let mut ripple = ripple();
        let mut surface = RecordingSurface::new();
        ripple.draw(&mut surface, &f);
        assert!(surface.commands.is_empty());

        ripple.trigger((400.0, 300.0), 0);
        for _ in 0..20 {
            ripple.step();
        }
        ripple.draw(&mut surface, &f);
        assert_eq!(surface.commands.len(), 2);
        assert_eq!(surface.state().alpha, 1.0);
    }
}
