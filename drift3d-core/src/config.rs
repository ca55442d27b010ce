//! Scene configuration: viewport, device tiers and every tuning constant
//!
//! The engine treats all of these as injected inputs. Defaults reproduce the
//! stock look; a host may override any subset from JSON.
use rand::Rng;
use serde::Deserialize;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Logical drawing area plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    /// Maximum device pixel ratio honored; denser screens are downsampled
    pub const MAX_DPR: f32 = 2.0;

    pub fn new(width: f32, height: f32, dpr: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(Error::InvalidViewport { width, height });
        }
        let dpr = if dpr.is_finite() { dpr.clamp(1.0, Self::MAX_DPR) } else { 1.0 };
        Ok(Self { width, height, dpr })
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when `(x, y)` lies inside the viewport grown by `margin` on each side
    pub fn contains(&self, x: f32, y: f32, margin: f32) -> bool {
        x >= -margin && x <= self.width + margin && y >= -margin && y <= self.height + margin
    }
}

/// Coarse device classification driving entity counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceTier {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceTier {
    pub fn classify(width: f32, mobile_agent: bool) -> Self {
        if mobile_agent || width < 768.0 {
            DeviceTier::Mobile
        } else if width < 1024.0 {
            DeviceTier::Tablet
        } else {
            DeviceTier::Desktop
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeviceTier::Mobile => "mobile",
            DeviceTier::Tablet => "tablet",
            DeviceTier::Desktop => "desktop",
        }
    }
}

/// Closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Finite bounds with `min <= max`
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "{name} must be a finite range with min <= max, got {}..{}",
                self.min, self.max
            )))
        }
    }
}

/// Per-tier liveliness knobs
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierProfile {
    pub solid_count: usize,
    pub beam_count: usize,
    pub size_base: f32,
    pub speed_mul: f32,
    pub float_amp: f32,
    pub float_speed: f32,
    /// Logical area per particle
    pub particle_area: f32,
    pub particle_base: usize,
    pub particle_max: usize,
    /// Logical area per star
    pub star_area: f32,
    pub star_base: usize,
    pub orb_count: usize,
    pub cloud_count: usize,
    pub cloud_motes: usize,
    pub scanlines: bool,
}

impl TierProfile {
    pub fn mobile() -> Self {
        Self {
            solid_count: 12,
            beam_count: 2,
            size_base: 24.0,
            speed_mul: 0.65,
            float_amp: 8.0,
            float_speed: 0.6,
            particle_area: 24_000.0,
            particle_base: 10,
            particle_max: 60,
            star_area: 9_000.0,
            star_base: 20,
            orb_count: 2,
            cloud_count: 1,
            cloud_motes: 24,
            scanlines: false,
        }
    }

    pub fn tablet() -> Self {
        Self {
            solid_count: 13,
            beam_count: 3,
            size_base: 30.0,
            speed_mul: 0.8,
            float_amp: 14.0,
            float_speed: 0.8,
            particle_area: 18_000.0,
            particle_base: 16,
            particle_max: 110,
            star_area: 7_000.0,
            star_base: 30,
            orb_count: 3,
            cloud_count: 2,
            cloud_motes: 32,
            scanlines: true,
        }
    }

    pub fn desktop() -> Self {
        Self {
            solid_count: 15,
            beam_count: 3,
            size_base: 34.0,
            speed_mul: 1.0,
            float_amp: 14.0,
            float_speed: 0.8,
            particle_area: 14_000.0,
            particle_base: 24,
            particle_max: 160,
            star_area: 5_000.0,
            star_base: 40,
            orb_count: 4,
            cloud_count: 3,
            cloud_motes: 40,
            scanlines: true,
        }
    }

    /// `min(floor(area / particle_area) + particle_base, particle_max)`
    pub fn particle_count(&self, viewport: &Viewport) -> usize {
        let dynamic = (viewport.area() / self.particle_area.max(1.0)).floor() as usize;
        (dynamic + self.particle_base).min(self.particle_max)
    }

    /// `floor(area / star_area) + star_base`
    pub fn star_count(&self, viewport: &Viewport) -> usize {
        (viewport.area() / self.star_area.max(1.0)).floor() as usize + self.star_base
    }
}

impl Default for TierProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub mobile: TierProfile,
    pub tablet: TierProfile,
    pub desktop: TierProfile,
}

impl TierTable {
    pub fn profile(&self, tier: DeviceTier) -> &TierProfile {
        match tier {
            DeviceTier::Mobile => &self.mobile,
            DeviceTier::Tablet => &self.tablet,
            DeviceTier::Desktop => &self.desktop,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            mobile: TierProfile::mobile(),
            tablet: TierProfile::tablet(),
            desktop: TierProfile::desktop(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub bg: Rgb,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

impl Palette {
    /// Colors cycled across solids, particles and orbs
    pub fn cycle(&self) -> [Rgb; 3] {
        [self.primary, self.secondary, self.accent]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: Rgb::new(0x05, 0x05, 0x05),
            primary: Rgb::new(0x00, 0xf2, 0xff),
            secondary: Rgb::new(0x70, 0x00, 0xff),
            accent: Rgb::new(0xff, 0x00, 0xc8),
        }
    }
}

/// Perspective constants shared by every projected entity
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub camera_z: f32,
    pub focal: f32,
    pub near_epsilon: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            camera_z: 900.0,
            focal: 900.0,
            near_epsilon: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolidConfig {
    /// Depth of the nearest layer; layers spread over `depth_span` behind it
    pub depth_near: f32,
    pub depth_span: f32,
    /// Placement spread as a fraction of the viewport
    pub spread_x: f32,
    pub spread_y: f32,
    pub center_y: f32,
    pub size_factor: Span,
    /// Far layers shrink by up to this fraction
    pub layer_shrink: f32,
    pub spin_xy: Span,
    pub spin_z: Span,
    pub float_amp_factor: Span,
    pub float_speed_extra: Span,
    pub alpha_min: f32,
    pub alpha_max: f32,
    pub min_line_width: f32,
    pub line_width_scale: f32,
}

impl Default for SolidConfig {
    fn default() -> Self {
        Self {
            depth_near: 120.0,
            depth_span: 520.0,
            spread_x: 0.38,
            spread_y: 0.28,
            center_y: 0.45,
            size_factor: Span::new(0.75, 2.1),
            layer_shrink: 0.35,
            spin_xy: Span::new(0.004, 0.016),
            spin_z: Span::new(0.002, 0.010),
            float_amp_factor: Span::new(0.6, 1.5),
            float_speed_extra: Span::new(0.0, 0.6),
            alpha_min: 0.18,
            alpha_max: 0.75,
            min_line_width: 1.0,
            line_width_scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub spawn_depth: Span,
    /// Particles closer than this depth are recycled
    pub near_z: f32,
    /// Depth travelled toward the camera per tick
    pub speed: Span,
    /// Maximum lateral drift per tick
    pub drift: f32,
    pub size: Span,
    pub trail_len: usize,
    /// Screen-space slack before an off-screen particle is recycled
    pub bound_margin: f32,
    pub glow_factor: f32,
    pub alpha_max: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_depth: Span::new(0.0, 900.0),
            near_z: -650.0,
            speed: Span::new(2.0, 5.0),
            drift: 0.35,
            size: Span::new(0.8, 2.2),
            trail_len: 8,
            bound_margin: 120.0,
            glow_factor: 4.0,
            alpha_max: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub depth: Span,
    pub near_z: f32,
    pub speed: Span,
    pub size: Span,
    pub twinkle_speed: Span,
    pub alpha: f32,
    pub bound_margin: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            depth: Span::new(200.0, 1600.0),
            near_z: -400.0,
            speed: Span::new(0.3, 1.2),
            size: Span::new(0.5, 1.6),
            twinkle_speed: Span::new(1.0, 4.0),
            alpha: 0.8,
            bound_margin: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub radius: Span,
    pub orbit_x: Span,
    pub orbit_y: Span,
    /// Radians per second
    pub angular_speed: Span,
    pub pulse_speed: Span,
    pub pulse_amount: f32,
    pub alpha: f32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            radius: Span::new(30.0, 90.0),
            orbit_x: Span::new(40.0, 160.0),
            orbit_y: Span::new(20.0, 90.0),
            angular_speed: Span::new(0.05, 0.2),
            pulse_speed: Span::new(0.5, 1.5),
            pulse_amount: 0.25,
            alpha: 0.22,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub speed: Span,
    pub width: Span,
    pub alpha_base: f32,
    pub alpha_swing: f32,
    /// Horizontal travel across the viewport height, before width is added
    pub slant: f32,
    pub slant_width_mul: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            speed: Span::new(0.6, 1.1),
            width: Span::new(18.0, 44.0),
            alpha_base: 0.06,
            alpha_swing: 0.04,
            slant: 120.0,
            slant_width_mul: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// World y of the ground plane as a fraction of viewport height
    pub ground_y: f32,
    pub spacing: f32,
    pub depth_near: f32,
    pub depth_far: f32,
    /// Depth units per second
    pub scroll_speed: f32,
    pub column_spacing: f32,
    /// Seconds for the pulse line to sweep from far to near
    pub pulse_period: f32,
    pub alpha: f32,
    pub pulse_alpha: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            ground_y: 1.05,
            spacing: 60.0,
            depth_near: 0.0,
            depth_far: 1800.0,
            scroll_speed: 40.0,
            column_spacing: 80.0,
            pulse_period: 6.0,
            alpha: 0.12,
            pulse_alpha: 0.45,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub radius: Span,
    /// Mote lifetime in ticks
    pub mote_life: Span,
    /// Radians per tick
    pub orbit_speed: Span,
    pub mote_size: Span,
    pub drift_amp: f32,
    pub drift_speed: f32,
    pub alpha: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            radius: Span::new(80.0, 180.0),
            mote_life: Span::new(60.0, 240.0),
            orbit_speed: Span::new(0.002, 0.010),
            mote_size: Span::new(0.8, 2.4),
            drift_amp: 30.0,
            drift_speed: 0.15,
            alpha: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Radius growth per tick
    pub step: f32,
    pub max_radius: f32,
    /// Intensity under which the ripple dies
    pub threshold: f32,
    /// Seconds between automatic triggers
    pub interval: f32,
    pub max_delay_ticks: u32,
    pub line_width: f32,
    pub alpha: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            step: 4.0,
            max_radius: 600.0,
            threshold: 0.02,
            interval: 7.0,
            max_delay_ticks: 30,
            line_width: 2.0,
            alpha: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub scanline_spacing: f32,
    pub scanline_alpha: f32,
    /// Vignette radii as fractions of viewport height
    pub vignette_inner: f32,
    pub vignette_outer: f32,
    pub vignette_alpha: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            scanline_spacing: 3.0,
            scanline_alpha: 0.035,
            vignette_inner: 0.25,
            vignette_outer: 0.9,
            vignette_alpha: 0.75,
        }
    }
}

/// Everything the scene composer reads when it (re)builds
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub palette: Palette,
    pub tiers: TierTable,
    pub solids: SolidConfig,
    pub particles: ParticleConfig,
    pub stars: StarConfig,
    pub orbs: OrbConfig,
    pub beams: BeamConfig,
    pub grid: GridConfig,
    pub clouds: CloudConfig,
    pub ripple: RippleConfig,
    pub overlay: OverlayConfig,
}

impl SceneConfig {
    /// Defaults with any fields present in `json` overridden
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the per-frame arithmetic is not defined for
    pub fn validate(&self) -> Result<()> {
        fn at_least(name: &str, value: f32, min: f32) -> Result<()> {
            if value.is_finite() && value >= min {
                Ok(())
            } else {
                Err(Error::Config(format!("{name} must be at least {min}, got {value}")))
            }
        }
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{name} must be positive, got {value}")))
            }
        }

        positive("camera.near_epsilon", self.camera.near_epsilon)?;
        at_least("grid.spacing", self.grid.spacing, 1.0)?;
        at_least("grid.column_spacing", self.grid.column_spacing, 1.0)?;
        positive("grid.pulse_period", self.grid.pulse_period)?;
        positive("ripple.step", self.ripple.step)?;
        at_least("particles.drift", self.particles.drift, 0.0)?;

        let (s, p, st, o, b, c) = (
            &self.solids,
            &self.particles,
            &self.stars,
            &self.orbs,
            &self.beams,
            &self.clouds,
        );
        let spans = [
            ("solids.size_factor", &s.size_factor),
            ("solids.spin_xy", &s.spin_xy),
            ("solids.spin_z", &s.spin_z),
            ("solids.float_amp_factor", &s.float_amp_factor),
            ("solids.float_speed_extra", &s.float_speed_extra),
            ("particles.spawn_depth", &p.spawn_depth),
            ("particles.speed", &p.speed),
            ("particles.size", &p.size),
            ("stars.depth", &st.depth),
            ("stars.speed", &st.speed),
            ("stars.size", &st.size),
            ("stars.twinkle_speed", &st.twinkle_speed),
            ("orbs.radius", &o.radius),
            ("orbs.orbit_x", &o.orbit_x),
            ("orbs.orbit_y", &o.orbit_y),
            ("orbs.angular_speed", &o.angular_speed),
            ("orbs.pulse_speed", &o.pulse_speed),
            ("beams.speed", &b.speed),
            ("beams.width", &b.width),
            ("clouds.radius", &c.radius),
            ("clouds.mote_life", &c.mote_life),
            ("clouds.orbit_speed", &c.orbit_speed),
            ("clouds.mote_size", &c.mote_size),
        ];
        for (name, span) in spans {
            span.validate(name)?;
        }
        at_least("clouds.radius.min", c.radius.min, 0.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_validation() {
        assert!(Viewport::new(0.0, 600.0, 1.0).is_err());
        assert!(Viewport::new(800.0, f32::NAN, 1.0).is_err());
        let vp = Viewport::new(800.0, 600.0, 3.0).unwrap();
        assert_eq!(vp.dpr, 2.0);
        assert_eq!(vp.center(), (400.0, 300.0));
    }

    #[test]
    fn test_classify() {
        assert_eq!(DeviceTier::classify(1440.0, false), DeviceTier::Desktop);
        assert_eq!(DeviceTier::classify(900.0, false), DeviceTier::Tablet);
        assert_eq!(DeviceTier::classify(500.0, false), DeviceTier::Mobile);
        assert_eq!(DeviceTier::classify(1440.0, true), DeviceTier::Mobile);
    }

    #[test]
    fn test_particle_count_formula() {
        let vp = Viewport::new(1400.0, 900.0, 1.0).unwrap();
        let desktop = TierProfile::desktop();
        // 1_260_000 / 14_000 = 90, plus 24
        assert_eq!(desktop.particle_count(&vp), 114);
        let huge = Viewport::new(4000.0, 3000.0, 1.0).unwrap();
        assert_eq!(desktop.particle_count(&huge), desktop.particle_max);
        assert_eq!(desktop.star_count(&vp), 252 + 40);
    }

    #[test]
    fn test_partial_json_override() {
        let config = SceneConfig::from_json(
            r##"{ "palette": { "primary": "#ffffff" }, "ripple": { "step": 8.0 } }"##,
        )
        .unwrap();
        assert_eq!(config.palette.primary, Rgb::new(255, 255, 255));
        assert_eq!(config.palette.bg, Palette::default().bg);
        assert_eq!(config.ripple.step, 8.0);
        assert_eq!(config.ripple.max_radius, 600.0);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = SceneConfig::from_json(r#"{ "palette": { "bg": "blue" } }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        for json in [
            r#"{ "camera": { "near_epsilon": 0.0 } }"#,
            r#"{ "grid": { "spacing": 0.0 } }"#,
            r#"{ "grid": { "column_spacing": 0.0 } }"#,
            r#"{ "grid": { "column_spacing": -80.0 } }"#,
            r#"{ "grid": { "pulse_period": 0.0 } }"#,
            r#"{ "ripple": { "step": 0.0 } }"#,
            r#"{ "particles": { "drift": -1.0 } }"#,
            r#"{ "particles": { "speed": { "min": 5.0, "max": 2.0 } } }"#,
            r#"{ "stars": { "depth": { "min": 0.0, "max": 1e39 } } }"#,
            r#"{ "clouds": { "radius": { "min": -10.0, "max": 40.0 } } }"#,
        ] {
            let err = SceneConfig::from_json(json).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{json}");
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(SceneConfig::default().validate().is_ok());
        let still_ok = SceneConfig::from_json(
            r#"{ "particles": { "drift": 0.0, "speed": { "min": 3.0, "max": 3.0 } } }"#,
        );
        assert!(still_ok.is_ok());
    }

    #[test]
    fn test_span_validate() {
        assert!(Span::new(1.0, 2.0).validate("x").is_ok());
        assert!(Span::new(2.0, 2.0).validate("x").is_ok());
        assert!(Span::new(2.0, 1.0).validate("x").is_err());
        assert!(Span::new(f32::NAN, 1.0).validate("x").is_err());
    }
}
