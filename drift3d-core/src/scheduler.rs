//! Frame scheduler: one update/draw pass per display refresh
//!
//! The host owns the actual refresh callback (a terminal sleep loop,
//! `requestAnimationFrame`, ...) and calls [`Scheduler::tick`] from it. Once
//! stopped, ticks become no-ops and the host simply stops asking for more.
use crate::config::{DeviceTier, SceneConfig, Viewport};
use crate::scene::Scene;
use crate::surface::Surface;

/// Whether the host should schedule another tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Stopped,
}

pub struct Scheduler {
    scene: Scene,
    /// Host timestamp (ms) of the first tick
    origin_ms: Option<f64>,
    frames: u64,
    running: bool,
}

impl Scheduler {
    pub fn new(viewport: Viewport, tier: DeviceTier, config: SceneConfig, seed: u64) -> Self {
        tracing::info!(
            tier = tier.name(),
            width = viewport.width,
            height = viewport.height,
            seed,
            "scheduler starting"
        );
        Self {
            scene: Scene::new(viewport, tier, config, seed),
            origin_ms: None,
            frames: 0,
            running: true,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds elapsed at host time `now_ms`
    pub fn elapsed(&self, now_ms: f64) -> f32 {
        self.origin_ms
            .map_or(0.0, |origin| ((now_ms - origin).max(0.0) * 0.001) as f32)
    }

    /// Render one frame at host time `now_ms` (milliseconds, monotonic)
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn Surface) -> Tick {
        if !self.running {
            return Tick::Stopped;
        }
        if self.origin_ms.is_none() {
            self.origin_ms = Some(now_ms);
        }
        let frame = self.scene.frame(self.elapsed(now_ms), self.frames);
        self.scene.render(surface, &frame);
        self.frames += 1;
        Tick::Continue
    }

    /// Rebuild the whole scene for a new viewport. Ignored once stopped.
    pub fn resize(&mut self, viewport: Viewport, tier: DeviceTier) {
        if !self.running {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "resize");
        self.scene.rebuild(viewport, tier);
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::info!(frames = self.frames, "scheduler stopped");
        }
        self.running = false;
    }
}
