//! Colors, gradients and fill/stroke paints
use serde::{Deserialize, Deserializer};

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { rgb: self, a }
    }

    /// Relative luminance in `[0, 1]`
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

/// A color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        rgb: Rgb::new(0, 0, 0),
        a: 0.0,
    };

    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.rgb.r,
            self.rgb.g,
            self.rgb.b,
            self.a.clamp(0.0, 1.0)
        )
    }

    /// Linear interpolation; transparent endpoints take the other side's hue
    /// so fades don't darken through black.
    pub fn lerp(&self, other: &Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let (from, to) = match (self.a == 0.0, other.a == 0.0) {
            (true, false) => (other.rgb, other.rgb),
            (false, true) => (self.rgb, self.rgb),
            _ => (self.rgb, other.rgb),
        };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            rgb: Rgb::new(mix(from.r, to.r), mix(from.g, to.g), mix(from.b, to.b)),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// A gradient stop at `offset` in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            return a.color.lerp(&b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }

    pub fn sample(&self, x: f32, y: f32) -> Rgba {
        let (dx, dy) = (self.x1 - self.x0, self.y1 - self.y0);
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f32::EPSILON {
            return sample_stops(&self.stops, 0.0);
        }
        let t = ((x - self.x0) * dx + (y - self.y0) * dy) / len_sq;
        sample_stops(&self.stops, t)
    }
}

/// Two-circle radial gradient. Sampling assumes concentric circles, which is
/// how every gradient in the scene is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub x0: f32,
    pub y0: f32,
    pub r0: f32,
    pub x1: f32,
    pub y1: f32,
    pub r1: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn centered(x: f32, y: f32, r0: f32, r1: f32) -> Self {
        Self {
            x0: x,
            y0: y,
            r0,
            x1: x,
            y1: y,
            r1,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Rgba) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }

    pub fn sample(&self, x: f32, y: f32) -> Rgba {
        let dist = ((x - self.x1).powi(2) + (y - self.y1).powi(2)).sqrt();
        let span = (self.r1 - self.r0).max(f32::EPSILON);
        sample_stops(&self.stops, (dist - self.r0) / span)
    }
}

/// Fill or stroke style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    pub fn sample(&self, x: f32, y: f32) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => g.sample(x, y),
            Paint::Radial(g) => g.sample(x, y),
        }
    }
}

impl From<Rgb> for Paint {
    fn from(rgb: Rgb) -> Self {
        Paint::Solid(rgb.with_alpha(1.0))
    }
}

impl From<Rgba> for Paint {
    fn from(rgba: Rgba) -> Self {
        Paint::Solid(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::from_hex("#00f2ff"), Some(Rgb::new(0, 0xf2, 0xff)));
        assert_eq!(Rgb::from_hex("7000ff"), Some(Rgb::new(0x70, 0, 0xff)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_css_output() {
        let c = Rgb::new(255, 0, 200).with_alpha(0.5);
        assert_eq!(c.to_css(), "rgba(255, 0, 200, 0.500)");
    }

    #[test]
    fn test_radial_sample_fades_outward() {
        let g = RadialGradient::centered(0.0, 0.0, 10.0, 110.0)
            .stop(0.0, Rgba::TRANSPARENT)
            .stop(1.0, Rgb::new(0, 0, 0).with_alpha(0.75));
        assert_eq!(g.sample(0.0, 0.0).a, 0.0);
        assert!((g.sample(60.0, 0.0).a - 0.375).abs() < 1e-4);
        assert!((g.sample(500.0, 0.0).a - 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_transparent_stop_keeps_hue() {
        let cyan = Rgb::new(0, 242, 255);
        let g = LinearGradient::new(0.0, 0.0, 0.0, 100.0)
            .stop(0.0, Rgba::TRANSPARENT)
            .stop(1.0, cyan.with_alpha(1.0));
        let mid = g.sample(0.0, 50.0);
        assert_eq!(mid.rgb, cyan);
        assert!((mid.a - 0.5).abs() < 1e-4);
    }
}
