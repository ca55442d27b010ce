//! Immediate-mode 2D drawing surface consumed by the engine
//!
//! Front ends implement [`Surface`] over a real canvas or a character grid.
//! [`RecordingSurface`] keeps every command in memory and is what the tests
//! draw into.
use crate::color::{Paint, Rgba};

/// How new pixels combine with what is already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    #[default]
    SourceOver,
    /// Additive blending for glows
    Lighter,
}

impl Composite {
    pub fn as_css(&self) -> &'static str {
        match self {
            Composite::SourceOver => "source-over",
            Composite::Lighter => "lighter",
        }
    }
}

/// One segment of the current path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc {
        x: f32,
        y: f32,
        radius: f32,
        start: f32,
        end: f32,
    },
    Close,
}

pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, mode: Composite);

    /// Scale every later coordinate (device pixel ratio)
    fn set_scale(&mut self, sx: f32, sy: f32);

    fn save(&mut self);
    fn restore(&mut self);

    /// Full circle path helper
    fn circle(&mut self, x: f32, y: f32, radius: f32) {
        self.arc(x, y, radius, 0.0, std::f32::consts::TAU);
    }
}

/// Run `draw` with its own paint state.
///
/// State is saved before and restored after, then alpha and composite are
/// forced back to neutral so the next drawer never inherits them.
pub fn scoped<S, F>(surface: &mut S, draw: F)
where
    S: Surface + ?Sized,
    F: FnOnce(&mut S),
{
    surface.save();
    draw(surface);
    surface.restore();
    surface.set_global_alpha(1.0);
    surface.set_composite(Composite::SourceOver);
}

/// Paint state tracked by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq)]
pub struct PaintState {
    pub fill: Paint,
    pub stroke: Paint,
    pub line_width: f32,
    pub alpha: f32,
    pub composite: Composite,
    pub scale: (f32, f32),
}

impl Default for PaintState {
    fn default() -> Self {
        let black = Paint::Solid(Rgba {
            rgb: crate::color::Rgb::new(0, 0, 0),
            a: 1.0,
        });
        Self {
            fill: black.clone(),
            stroke: black,
            line_width: 1.0,
            alpha: 1.0,
            composite: Composite::SourceOver,
            scale: (1.0, 1.0),
        }
    }
}

/// A drawing operation plus the paint state it was issued under
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        state: PaintState,
    },
    Fill {
        path: Vec<PathOp>,
        state: PaintState,
    },
    Stroke {
        path: Vec<PathOp>,
        state: PaintState,
    },
}

impl Command {
    pub fn state(&self) -> &PaintState {
        match self {
            Command::FillRect { state, .. } | Command::Fill { state, .. } | Command::Stroke { state, .. } => state,
        }
    }
}

/// In-memory surface that records instead of rasterizing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<Command>,
    state: PaintState,
    stack: Vec<PaintState>,
    path: Vec<PathOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PaintState {
        &self.state
    }

    /// Depth of unmatched `save` calls
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(Command::FillRect {
            x,
            y,
            w,
            h,
            state: self.state.clone(),
        });
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.push(PathOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.push(PathOp::LineTo(x, y));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        self.path.push(PathOp::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn close_path(&mut self) {
        self.path.push(PathOp::Close);
    }

    fn fill(&mut self) {
        self.commands.push(Command::Fill {
            path: self.path.clone(),
            state: self.state.clone(),
        });
    }

    fn stroke(&mut self) {
        self.commands.push(Command::Stroke {
            path: self.path.clone(),
            state: self.state.clone(),
        });
    }

    fn set_fill(&mut self, paint: &Paint) {
        self.state.fill = paint.clone();
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.state.stroke = paint.clone();
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
    }

    fn set_composite(&mut self, mode: Composite) {
        self.state.composite = mode;
    }

    fn set_scale(&mut self, sx: f32, sy: f32) {
        self.state.scale = (sx, sy);
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_scoped_restores_neutral_state() {
        let mut surface = RecordingSurface::new();
        scoped(&mut surface, |s| {
            s.set_global_alpha(0.3);
            s.set_composite(Composite::Lighter);
            s.set_stroke(&Rgb::new(255, 0, 0).into());
            s.begin_path();
            s.move_to(0.0, 0.0);
            s.line_to(10.0, 10.0);
            s.stroke();
        });

        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.state().alpha, 1.0);
        assert_eq!(surface.state().composite, Composite::SourceOver);
        assert_eq!(surface.state().stroke, PaintState::default().stroke);

        let recorded = surface.commands[0].state();
        assert_eq!(recorded.alpha, 0.3);
        assert_eq!(recorded.composite, Composite::Lighter);
    }

    #[test]
    fn test_scoped_through_trait_object() {
        let mut recording = RecordingSurface::new();
        let surface: &mut dyn Surface = &mut recording;
        scoped(surface, |s| {
            s.set_global_alpha(0.5);
            s.fill_rect(0.0, 0.0, 1.0, 1.0);
        });
        assert_eq!(recording.commands.len(), 1);
        assert_eq!(recording.state().alpha, 1.0);
    }

    #[test]
    fn test_path_is_reset_by_begin_path() {
        let mut surface = RecordingSurface::new();
        surface.begin_path();
        surface.circle(5.0, 5.0, 2.0);
        surface.fill();
        surface.begin_path();
        surface.move_to(1.0, 1.0);
        surface.line_to(2.0, 2.0);
        surface.stroke();

        match &surface.commands[1] {
            Command::Stroke { path, .. } => assert_eq!(path.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
