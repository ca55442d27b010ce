//! Screen-space washes drawn under and over the scene
use crate::color::{Paint, RadialGradient, Rgb, Rgba};
use crate::config::{OverlayConfig, Viewport};
use crate::surface::{scoped, Surface};

/// Opaque background fill; also serves as the per-frame clear
pub fn draw_background(surface: &mut dyn Surface, viewport: &Viewport, bg: Rgb) {
    scoped(surface, |s| {
        s.set_fill(&Paint::from(bg));
        s.fill_rect(0.0, 0.0, viewport.width, viewport.height);
    });
}

/// Horizontal CRT-style lines across the whole viewport
pub fn draw_scanlines(surface: &mut dyn Surface, viewport: &Viewport, config: &OverlayConfig) {
    if config.scanline_spacing < 1.0 {
        return;
    }
    scoped(surface, |s| {
        s.set_global_alpha(config.scanline_alpha);
        s.set_stroke(&Paint::from(Rgb::new(0, 0, 0)));
        s.set_line_width(1.0);
        s.begin_path();
        let mut y = 0.5;
        while y < viewport.height {
            s.move_to(0.0, y);
            s.line_to(viewport.width, y);
            y += config.scanline_spacing;
        }
        s.stroke();
    });
}

/// Radial darkening toward the corners, built once per viewport
pub fn vignette(viewport: &Viewport, config: &OverlayConfig) -> RadialGradient {
    let (cx, cy) = viewport.center();
    RadialGradient::centered(
        cx,
        cy,
        viewport.height * config.vignette_inner,
        viewport.height * config.vignette_outer,
    )
    .stop(0.0, Rgba::TRANSPARENT)
    .stop(1.0, Rgb::new(0, 0, 0).with_alpha(config.vignette_alpha))
}

pub fn draw_vignette(surface: &mut dyn Surface, viewport: &Viewport, gradient: &RadialGradient) {
    scoped(surface, |s| {
        s.set_fill(&Paint::Radial(gradient.clone()));
        s.fill_rect(0.0, 0.0, viewport.width, viewport.height);
    });
}
