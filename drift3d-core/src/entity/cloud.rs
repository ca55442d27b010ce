//! Energy clouds: a bounded, self-renewing swarm around a drifting center
use rand::Rng;
use std::f32::consts::TAU;

use super::{Entity, Frame, SceneRng};
use crate::color::{Paint, RadialGradient, Rgb, Rgba};
use crate::config::{CloudConfig, Viewport};
use crate::surface::{scoped, Composite, Surface};

/// One point of an energy cloud, orbiting the cloud center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudMote {
    pub angle: f32,
    pub distance: f32,
    /// Radians per tick
    pub orbit_speed: f32,
    pub size: f32,
    /// Ticks left before the mote respawns
    pub life: u32,
    pub max_life: u32,
}

impl CloudMote {
    fn spawn(radius: f32, config: &CloudConfig, rng: &mut SceneRng) -> Self {
        let max_life = config.mote_life.sample(rng).round().max(1.0) as u32;
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            angle: rng.gen_range(0.0..TAU),
            distance: rng.gen_range(0.0..=radius),
            orbit_speed: config.orbit_speed.sample(rng) * direction,
            size: config.mote_size.sample(rng),
            life: rng.gen_range(1..=max_life),
            max_life,
        }
    }

    /// Fades in and out over its lifetime
    pub fn opacity(&self) -> f32 {
        let t = self.life as f32 / self.max_life as f32;
        (t * std::f32::consts::PI).sin()
    }
}

#[derive(Debug, Clone)]
pub struct EnergyCloud {
    pub anchor: (f32, f32),
    pub center: (f32, f32),
    pub radius: f32,
    pub color: Rgb,
    pub motes: Vec<CloudMote>,
    drift_phase: f32,
    respawns: u64,
    config: CloudConfig,
}

impl EnergyCloud {
    pub fn spawn(
        viewport: &Viewport,
        color: Rgb,
        mote_count: usize,
        config: &CloudConfig,
        rng: &mut SceneRng,
    ) -> Self {
        let anchor = (
            rng.gen_range(0.1..=0.9) * viewport.width,
            rng.gen_range(0.2..=0.8) * viewport.height,
        );
        let radius = config.radius.sample(rng);
        let motes = (0..mote_count)
            .map(|_| CloudMote::spawn(radius, config, rng))
            .collect();
        Self {
            anchor,
            center: anchor,
            radius,
            color,
            motes,
            drift_phase: rng.gen_range(0.0..TAU),
            respawns: 0,
            config: config.clone(),
        }
    }

    /// Total mote respawns since the cloud was built
    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    pub fn mote_position(&self, mote: &CloudMote) -> (f32, f32) {
        (
            self.center.0 + mote.angle.cos() * mote.distance,
            self.center.1 + mote.angle.sin() * mote.distance,
        )
    }
}

impl Entity for EnergyCloud {
    fn update(&mut self, frame: &Frame, rng: &mut SceneRng) {
        let phase = frame.time * self.config.drift_speed + self.drift_phase;
        self.center = (
            self.anchor.0 + phase.sin() * self.config.drift_amp,
            self.anchor.1 + (phase * 0.7).cos() * self.config.drift_amp * 0.6,
        );

        for mote in &mut self.motes {
            mote.angle += mote.orbit_speed;
            mote.life = mote.life.saturating_sub(1);
            if mote.life == 0 {
                *mote = CloudMote::spawn(self.radius, &self.config, rng);
                mote.life = mote.max_life;
                self.respawns += 1;
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface, _frame: &Frame) {
        let (cx, cy) = self.center;
        let haze = RadialGradient::centered(cx, cy, 0.0, self.radius)
            .stop(0.0, self.color.with_alpha(0.12))
            .stop(1.0, Rgba::TRANSPARENT);

        scoped(surface, |s| {
            s.set_composite(Composite::Lighter);
            s.set_fill(&Paint::Radial(haze));
            s.begin_path();
            s.circle(cx, cy, self.radius);
            s.fill();

            s.set_fill(&Paint::from(self.color));
            for mote in &self.motes {
                let (x, y) = self.mote_position(mote);
                s.set_global_alpha(self.config.alpha * mote.opacity());
                s.begin_path();
                s.circle(x, y, mote.size);
                s.fill();
            }
        });
    }
}
