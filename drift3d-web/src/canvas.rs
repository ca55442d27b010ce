//! 2D canvas surface
//!
//! Forwards every drawing call to a `CanvasRenderingContext2d`. Gradients are
//! rebuilt on the context each time a paint is set.

use drift3d_core::color::{LinearGradient, RadialGradient};
use drift3d_core::surface::{Composite, Surface};
use drift3d_core::{Error, Paint, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Opaque, low-latency 2D context on `canvas`
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"alpha".into(), &JsValue::FALSE)
            .and_then(|_| js_sys::Reflect::set(&options, &"desynchronized".into(), &JsValue::TRUE))
            .map_err(|e| Error::SurfaceUnavailable(format!("{:?}", e)))?;

        let ctx = canvas
            .get_context_with_context_options("2d", &options)
            .map_err(|e| Error::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| Error::SurfaceUnavailable("2d context not available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::SurfaceUnavailable("not a CanvasRenderingContext2d".into()))?;

        Ok(Self { ctx })
    }

    fn linear(&self, gradient: &LinearGradient) -> CanvasGradient {
        let g = self.ctx.create_linear_gradient(
            gradient.x0 as f64,
            gradient.y0 as f64,
            gradient.x1 as f64,
            gradient.y1 as f64,
        );
        for stop in &gradient.stops {
            g.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css()).ok();
        }
        g
    }

    fn radial(&self, gradient: &RadialGradient) -> Option<CanvasGradient> {
        let g = self
            .ctx
            .create_radial_gradient(
                gradient.x0 as f64,
                gradient.y0 as f64,
                gradient.r0.max(0.0) as f64,
                gradient.x1 as f64,
                gradient.y1 as f64,
                gradient.r1.max(0.0) as f64,
            )
            .ok()?;
        for stop in &gradient.stops {
            g.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css()).ok();
        }
        Some(g)
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        // Negative radii throw; the entities clamp but projection can round below zero
        self.ctx
            .arc(x as f64, y as f64, radius.max(0.0) as f64, start as f64, end as f64)
            .ok();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::Linear(g) => self.ctx.set_fill_style_canvas_gradient(&self.linear(g)),
            Paint::Radial(g) => {
                if let Some(g) = self.radial(g) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_stroke_style_str(&color.to_css()),
            Paint::Linear(g) => self.ctx.set_stroke_style_canvas_gradient(&self.linear(g)),
            Paint::Radial(g) => {
                if let Some(g) = self.radial(g) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_composite(&mut self, mode: Composite) {
        self.ctx.set_global_composite_operation(mode.as_css()).ok();
    }

    fn set_scale(&mut self, sx: f32, sy: f32) {
        self.ctx
            .set_transform(sx as f64, 0.0, 0.0, sy as f64, 0.0, 0.0)
            .ok();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }
}
