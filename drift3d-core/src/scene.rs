//! Scene composer: owns every entity collection and the layer order
use nalgebra::Point3;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::color::{RadialGradient, Rgb};
use crate::config::{DeviceTier, SceneConfig, Span, TierProfile, Viewport};
use crate::entity::solid::Float;
use crate::entity::{
    depth_sort, draw_all, update_all, EnergyCloud, Entity, Frame, GridGround, LightBeam, Orb,
    Particle, RippleWave, SceneRng, Solid, Star,
};
use crate::geometry::ShapeKind;
use crate::overlay;
use crate::projection::Projector;
use crate::surface::Surface;
use crate::transform::RotationState;

/// Star tint; stars ignore the palette
const STAR_COLOR: Rgb = Rgb::new(220, 235, 255);

/// Compositing layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    DeepBackground,
    Solids,
    Atmosphere,
    Lighting,
    Particles,
    Overlays,
    Vignette,
}

impl Layer {
    pub const ORDER: [Layer; 8] = [
        Layer::Background,
        Layer::DeepBackground,
        Layer::Solids,
        Layer::Atmosphere,
        Layer::Lighting,
        Layer::Particles,
        Layer::Overlays,
        Layer::Vignette,
    ];
}

/// Entity totals, mostly for logging and status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneCounts {
    pub solids: usize,
    pub particles: usize,
    pub stars: usize,
    pub orbs: usize,
    pub beams: usize,
    pub clouds: usize,
    pub motes: usize,
}

impl SceneCounts {
    pub fn total(&self) -> usize {
        self.solids + self.particles + self.stars + self.orbs + self.beams + self.clouds + self.motes
    }
}

pub struct Scene {
    viewport: Viewport,
    tier: DeviceTier,
    config: SceneConfig,
    projector: Projector,
    generation: u64,
    rng: SceneRng,

    pub solids: Vec<Solid>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub orbs: Vec<Orb>,
    pub beams: Vec<LightBeam>,
    pub clouds: Vec<EnergyCloud>,
    pub grid: GridGround,
    pub ripple: RippleWave,
    vignette: RadialGradient,
    next_ripple: f32,
}

impl Scene {
    pub fn new(viewport: Viewport, tier: DeviceTier, config: SceneConfig, seed: u64) -> Self {
        let palette = config.palette;
        let mut scene = Self {
            viewport,
            tier,
            projector: Projector::from_config(&config.camera),
            generation: 0,
            rng: SceneRng::seed_from_u64(seed),
            solids: Vec::new(),
            particles: Vec::new(),
            stars: Vec::new(),
            orbs: Vec::new(),
            beams: Vec::new(),
            clouds: Vec::new(),
            grid: GridGround::new(palette.secondary, palette.primary, &config.grid),
            ripple: RippleWave::new(palette.primary, &config.ripple),
            vignette: overlay::vignette(&viewport, &config.overlay),
            next_ripple: config.ripple.interval,
            config,
        };
        scene.populate();
        scene
    }

    /// Discard every entity and rebuild for a new viewport
    pub fn rebuild(&mut self, viewport: Viewport, tier: DeviceTier) {
        self.viewport = viewport;
        self.tier = tier;
        self.populate();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tier(&self) -> DeviceTier {
        self.tier
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Incremented on every (re)build
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn profile(&self) -> &TierProfile {
        self.config.tiers.profile(self.tier)
    }

    pub fn counts(&self) -> SceneCounts {
        SceneCounts {
            solids: self.solids.len(),
            particles: self.particles.len(),
            stars: self.stars.len(),
            orbs: self.orbs.len(),
            beams: self.beams.len(),
            clouds: self.clouds.len(),
            motes: self.clouds.iter().map(|c| c.motes.len()).sum(),
        }
    }

    pub fn frame(&self, time: f32, tick: u64) -> Frame {
        Frame::new(time, tick, self.viewport, self.projector)
    }

    fn populate(&mut self) {
        let profile = self.profile().clone();
        let palette = self.config.palette;
        let viewport = self.viewport;

        self.solids = self.build_solids(&profile);
        self.beams = self.build_beams(&profile);

        let colors = palette.cycle();
        let rng = &mut self.rng;
        let config = &self.config;

        self.particles = (0..profile.particle_count(&viewport))
            .map(|_| {
                let color = *colors.choose(rng).unwrap_or(&palette.primary);
                Particle::spawn(&viewport, color, &config.particles, rng)
            })
            .collect();
        self.stars = (0..profile.star_count(&viewport))
            .map(|_| Star::spawn(&viewport, &self.projector, STAR_COLOR, &config.stars, rng))
            .collect();
        self.orbs = (0..profile.orb_count)
            .map(|i| Orb::spawn(&viewport, colors[i % colors.len()], &config.orbs, rng))
            .collect();
        self.clouds = (0..profile.cloud_count)
            .map(|i| {
                let color = colors[(i + 1) % colors.len()];
                EnergyCloud::spawn(&viewport, color, profile.cloud_motes, &config.clouds, rng)
            })
            .collect();

        self.grid = GridGround::new(palette.secondary, palette.primary, &config.grid);
        self.ripple = RippleWave::new(palette.primary, &config.ripple);
        self.vignette = overlay::vignette(&viewport, &config.overlay);
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            tier = self.tier.name(),
            width = viewport.width,
            height = viewport.height,
            entities = self.counts().total(),
            counts = ?self.counts(),
            "scene built"
        );
    }

    fn build_solids(&mut self, profile: &TierProfile) -> Vec<Solid> {
        let c = &self.config.solids;
        let (w, h) = (self.viewport.width, self.viewport.height);
        let colors = self.config.palette.cycle();
        let rng = &mut self.rng;
        let count = profile.solid_count;

        let signed = |span: &Span, rng: &mut SceneRng| {
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            span.sample(rng) * sign * profile.speed_mul
        };

        let mut solids: Vec<Solid> = (0..count)
            .map(|i| {
                let layer = i as f32 / count.saturating_sub(1).max(1) as f32;
                let position = Point3::new(
                    w * 0.5 + rng.gen_range(-1.0..=1.0) * w * c.spread_x,
                    h * c.center_y + rng.gen_range(-1.0..=1.0) * h * c.spread_y,
                    c.depth_near + layer * c.depth_span,
                );
                let size =
                    profile.size_base * c.size_factor.sample(rng) * (1.05 - layer * c.layer_shrink);
                let rotation = RotationState::new(
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.0..TAU),
                    rng.gen_range(0.0..TAU),
                );
                let spin = RotationState::new(
                    signed(&c.spin_xy, rng),
                    signed(&c.spin_xy, rng),
                    signed(&c.spin_z, rng),
                );
                let float = Float {
                    amplitude: profile.float_amp * c.float_amp_factor.sample(rng),
                    speed: profile.float_speed + c.float_speed_extra.sample(rng),
                    offset: rng.gen_range(0.0..TAU),
                };
                let kind = *ShapeKind::ALL.choose(rng).unwrap_or(&ShapeKind::Cube);
                Solid::new(kind, size, position, rotation, spin, float, colors[i % colors.len()], c)
            })
            .collect();

        depth_sort(&mut solids);
        solids
    }

    fn build_beams(&mut self, profile: &TierProfile) -> Vec<LightBeam> {
        let palette = self.config.palette;
        let slot = self.viewport.width / profile.beam_count.max(1) as f32;
        (0..profile.beam_count)
            .map(|i| {
                let x = slot * (i as f32 + 0.3 + self.rng.gen_range(0.0..=0.4));
                let color = if i % 2 == 0 { palette.primary } else { palette.secondary };
                LightBeam::spawn(x, color, &self.config.beams, &mut self.rng)
            })
            .collect()
    }

    fn maybe_trigger_ripple(&mut self, frame: &Frame) {
        if frame.time < self.next_ripple {
            return;
        }
        let c = &self.config.ripple;
        let origin = (
            self.rng.gen_range(0.0..=self.viewport.width),
            self.rng.gen_range(0.0..=self.viewport.height),
        );
        let delay = self.rng.gen_range(0..=c.max_delay_ticks);
        self.next_ripple = frame.time + c.interval;
        self.ripple.trigger(origin, delay);
    }

    /// Advance one layer's entities
    pub fn update_layer(&mut self, layer: Layer, frame: &Frame) {
        let rng = &mut self.rng;
        match layer {
            Layer::Background | Layer::Vignette => {}
            Layer::DeepBackground => {
                update_all(&mut self.stars, frame, rng);
                self.grid.update(frame, rng);
            }
            Layer::Solids => {
                update_all(&mut self.solids, frame, rng);
                depth_sort(&mut self.solids);
            }
            Layer::Atmosphere => {
                update_all(&mut self.clouds, frame, rng);
                update_all(&mut self.beams, frame, rng);
            }
            Layer::Lighting => update_all(&mut self.orbs, frame, rng),
            Layer::Particles => update_all(&mut self.particles, frame, rng),
            Layer::Overlays => {
                self.maybe_trigger_ripple(frame);
                self.ripple.update(frame, &mut self.rng);
            }
        }
    }

    /// Paint one layer
    pub fn draw_layer(&self, layer: Layer, surface: &mut dyn Surface, frame: &Frame) {
        match layer {
            Layer::Background => overlay::draw_background(surface, &self.viewport, self.config.palette.bg),
            Layer::DeepBackground => {
                draw_all(&self.stars, surface, frame);
                self.grid.draw(surface, frame);
            }
            Layer::Solids => draw_all(&self.solids, surface, frame),
            Layer::Atmosphere => {
                draw_all(&self.clouds, surface, frame);
                draw_all(&self.beams, surface, frame);
            }
            Layer::Lighting => draw_all(&self.orbs, surface, frame),
            Layer::Particles => draw_all(&self.particles, surface, frame),
            Layer::Overlays => {
                if self.profile().scanlines {
                    overlay::draw_scanlines(surface, &self.viewport, &self.config.overlay);
                }
                self.ripple.draw(surface, frame);
            }
            Layer::Vignette => overlay::draw_vignette(surface, &self.viewport, &self.vignette),
        }
    }

    pub fn update(&mut self, frame: &Frame) {
        for layer in Layer::ORDER {
            self.update_layer(layer, frame);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, frame: &Frame) {
        for layer in Layer::ORDER {
            self.draw_layer(layer, surface, frame);
        }
    }

    /// Update then draw each layer in turn, back to front
    pub fn render(&mut self, surface: &mut dyn Surface, frame: &Frame) {
        for layer in Layer::ORDER {
            self.update_layer(layer, frame);
            self.draw_layer(layer, surface, frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn scene(width: f32, height: f32, tier: DeviceTier) -> Scene {
        let viewport = Viewport::new(width, height, 1.0).unwrap();
        Scene::new(viewport, tier, SceneConfig::default(), 42)
    }

    #[test]
    fn test_counts_total() {
        let scene = scene(1400.0, 900.0, DeviceTier::Desktop);
        let counts = scene.counts();
        let sum = scene.solids.len()
            + scene.particles.len()
            + scene.stars.len()
            + scene.orbs.len()
            + scene.beams.len()
            + scene.clouds.len()
            + counts.motes;
        assert_eq!(counts.total(), sum);
        assert_eq!(SceneCounts::default().total(), 0);
    }

    #[test]
    fn test_solids_start_depth_sorted() {
        let scene = scene(1400.0, 900.0, DeviceTier::Desktop);
        let depths: Vec<f32> = scene.solids.iter().map(Solid::depth).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]), "{depths:?}");
        assert_eq!(depths.first().copied(), Some(640.0));
        assert_eq!(depths.last().copied(), Some(120.0));
    }

    #[test]
    fn test_ripple_triggers_on_interval() {
        let mut scene = scene(800.0, 600.0, DeviceTier::Tablet);
        let interval = scene.config().ripple.interval;
        scene.update(&scene.frame(interval * 0.5, 0));
        assert!(!scene.ripple.is_active());
        scene.update(&scene.frame(interval, 1));
        assert!(scene.ripple.is_active());
    }

    #[test]
    fn test_scanlines_follow_tier() {
        let mobile = scene(500.0, 800.0, DeviceTier::Mobile);
        let desktop = scene(500.0, 800.0, DeviceTier::Desktop);
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        mobile.draw_layer(Layer::Overlays, &mut a, &mobile.frame(0.0, 0));
        desktop.draw_layer(Layer::Overlays, &mut b, &desktop.frame(0.0, 0));
        assert!(a.commands.is_empty());
        assert_eq!(b.commands.len(), 1);
    }
}
