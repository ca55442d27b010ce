//! drift3d web: the ambient background on an HTML canvas
//!
//! `Background.start("bg-canvas")` sizes the canvas to the window, builds the
//! scene for the detected device tier and drives it from
//! `requestAnimationFrame` until `stop()` is called. Window resizes rebuild
//! the whole scene.

use std::cell::RefCell;
use std::rc::Rc;

use drift3d_core::{DeviceTier, Error, SceneConfig, Scheduler, Surface, Tick, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

pub mod canvas;

pub use canvas::CanvasSurface;

/// User-agent fragments that mark a phone or tablet browser
const MOBILE_AGENTS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

pub fn is_mobile_agent(user_agent: &str) -> bool {
    let agent = user_agent.to_ascii_lowercase();
    MOBILE_AGENTS.iter().any(|needle| agent.contains(needle))
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| to_js(Error::SurfaceUnavailable("no window".into())))
}

/// Scene seed from the browser's RNG
fn seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Logical window size, pixel ratio and tier
fn measure(window: &Window) -> Result<(Viewport, DeviceTier), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0) as f32;
    let height = window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
    let viewport = Viewport::new(width, height, window.device_pixel_ratio() as f32).map_err(to_js)?;
    let mobile = window
        .navigator()
        .user_agent()
        .map(|agent| is_mobile_agent(&agent))
        .unwrap_or(false);
    Ok((viewport, DeviceTier::classify(width, mobile)))
}

/// Size the backing store to logical size * dpr and scale drawing to match
fn fit_canvas(canvas: &HtmlCanvasElement, surface: &mut CanvasSurface, viewport: &Viewport) {
    canvas.set_width((viewport.width * viewport.dpr).floor() as u32);
    canvas.set_height((viewport.height * viewport.dpr).floor() as u32);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", viewport.width)).ok();
    style.set_property("height", &format!("{}px", viewport.height)).ok();
    surface.set_scale(viewport.dpr, viewport.dpr);
}

struct Runtime {
    scheduler: Scheduler,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
}

impl Runtime {
    fn resize(&mut self, window: &Window) {
        // The listener outlives `stop`; a stopped background keeps its canvas
        if !self.scheduler.is_running() {
            return;
        }
        match measure(window) {
            Ok((viewport, tier)) => {
                fit_canvas(&self.canvas, &mut self.surface, &viewport);
                self.scheduler.resize(viewport, tier);
            }
            Err(e) => tracing::warn!(error = ?e, "ignoring resize"),
        }
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// A running background attached to one canvas
#[wasm_bindgen]
pub struct Background {
    runtime: Rc<RefCell<Runtime>>,
}

#[wasm_bindgen]
impl Background {
    /// Start on the canvas with id `canvas_id` using the default look
    pub fn start(canvas_id: &str) -> Result<Background, JsValue> {
        Self::launch(canvas_id, SceneConfig::default())
    }

    /// Start with a JSON object overriding scene settings
    #[wasm_bindgen(js_name = startWithConfig)]
    pub fn start_with_config(canvas_id: &str, config_json: &str) -> Result<Background, JsValue> {
        let config = SceneConfig::from_json(config_json).map_err(to_js)?;
        Self::launch(canvas_id, config)
    }

    /// Stop the loop; the pending animation frame is the last one requested
    pub fn stop(&self) {
        self.runtime.borrow_mut().scheduler.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.runtime.borrow().scheduler.is_running()
    }

    /// Frames rendered so far
    pub fn frames(&self) -> f64 {
        self.runtime.borrow().scheduler.frames() as f64
    }

    /// Device tier the current scene was built for
    pub fn tier(&self) -> String {
        self.runtime.borrow().scheduler.scene().tier().name().to_string()
    }
}

impl Background {
    fn launch(canvas_id: &str, config: SceneConfig) -> Result<Background, JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| to_js(Error::SurfaceUnavailable("no document".into())))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| to_js(Error::SurfaceUnavailable(format!("no element #{canvas_id}"))))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| to_js(Error::SurfaceUnavailable(format!("#{canvas_id} is not a canvas"))))?;

        // Without a context nothing is scheduled
        let mut surface = CanvasSurface::new(&canvas).map_err(to_js)?;

        let (viewport, tier) = measure(&window)?;
        fit_canvas(&canvas, &mut surface, &viewport);
        let runtime = Rc::new(RefCell::new(Runtime {
            scheduler: Scheduler::new(viewport, tier, config, seed()),
            surface,
            canvas,
        }));

        // Resize canvas and rebuild the scene whenever the window changes.
        let resize_closure = {
            let runtime = runtime.clone();
            Closure::wrap(Box::new(move || {
                if let Some(window) = web_sys::window() {
                    runtime.borrow_mut().resize(&window);
                }
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
        resize_closure.forget();

        // `f` holds the frame closure so it can request itself again.
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let frame_runtime = runtime.clone();

        *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(window) = web_sys::window() else {
                return;
            };
            let now = window.performance().map_or(0.0, |p| p.now());
            let tick = {
                let mut rt = frame_runtime.borrow_mut();
                let Runtime {
                    scheduler, surface, ..
                } = &mut *rt;
                scheduler.tick(now, surface)
            };
            match tick {
                Tick::Continue => {
                    if let Some(next) = f.borrow().as_ref() {
                        window.request_animation_frame(next.as_ref().unchecked_ref()).ok();
                    }
                }
                // No further frame is requested
                Tick::Stopped => {}
            }
        }) as Box<dyn FnMut()>));

        if let Some(first) = g.borrow().as_ref() {
            window.request_animation_frame(first.as_ref().unchecked_ref())?;
        }

        Ok(Background { runtime })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_agents() {
        assert!(is_mobile_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(is_mobile_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
        assert!(is_mobile_agent("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)"));
        assert!(!is_mobile_agent(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/126.0"
        ));
    }
}
