//! drift3d core: ambient 3D background engine
//!
//! Perspective projection, the rotation pipeline and procedural wireframes,
//! plus the animated entities, scene composer and frame scheduler built on
//! them. Drawing goes through the [`Surface`] trait; front ends supply the
//! real canvas.

pub mod color;
pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod projection;
pub mod scene;
pub mod scheduler;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use color::{Paint, Rgb, Rgba};
pub use config::{DeviceTier, SceneConfig, Viewport};
pub use error::{Error, Result};
pub use geometry::{generate, Edge, Shape, ShapeKind};
pub use projection::{ProjectedPoint, Projector};
pub use scene::{Layer, Scene, SceneCounts};
pub use scheduler::{Scheduler, Tick};
pub use surface::{Composite, RecordingSurface, Surface};
pub use transform::RotationState;
