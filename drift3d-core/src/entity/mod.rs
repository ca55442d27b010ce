//! Animated scene entities
//!
//! Each entity owns its kinematic state, advances it in `update` and paints
//! itself in `draw`. Drawing is always wrapped in [`crate::surface::scoped`],
//! so no entity leaks alpha or blend mode into the next one.
use rand::rngs::StdRng;

use crate::config::Viewport;
use crate::projection::Projector;
use crate::surface::Surface;

pub mod beam;
pub mod cloud;
pub mod grid;
pub mod orb;
pub mod particle;
pub mod ripple;
pub mod solid;
pub mod star;

pub use beam::LightBeam;
pub use cloud::{CloudMote, EnergyCloud};
pub use grid::GridGround;
pub use orb::Orb;
pub use particle::Particle;
pub use ripple::{RippleState, RippleWave};
pub use solid::{depth_sort, Solid};
pub use star::Star;

/// Random source used for spawning and recycling
pub type SceneRng = StdRng;

/// Per-tick inputs shared by every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds since the scheduler started
    pub time: f32,
    /// Frames rendered so far
    pub tick: u64,
    pub viewport: Viewport,
    pub projector: Projector,
}

impl Frame {
    pub fn new(time: f32, tick: u64, viewport: Viewport, projector: Projector) -> Self {
        Self {
            time,
            tick,
            viewport,
            projector,
        }
    }
}

pub trait Entity {
    fn update(&mut self, frame: &Frame, rng: &mut SceneRng);
    fn draw(&self, surface: &mut dyn Surface, frame: &Frame);
}

/// Update every entity in a collection, in order
pub fn update_all<E: Entity>(entities: &mut [E], frame: &Frame, rng: &mut SceneRng) {
    for entity in entities {
        entity.update(frame, rng);
    }
}

/// Draw every entity in a collection, in order
pub fn draw_all<E: Entity>(entities: &[E], surface: &mut dyn Surface, frame: &Frame) {
    for entity in entities {
        entity.draw(surface, frame);
    }
}
