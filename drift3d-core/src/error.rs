//! Error type shared by the engine and its front ends

use thiserror::Error;

/// Errors raised at the boundary of the engine.
///
/// Everything inside a running frame is infallible; the only failures are
/// startup-time ones (no drawing surface, nonsense viewport, bad overrides).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The host could not provide a 2D drawing surface
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Viewport dimensions must be finite and positive
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// A configuration override could not be applied
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
