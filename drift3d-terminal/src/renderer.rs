/// Character-cell rasterizer implementing the drawing surface
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use drift3d_core::surface::{Composite, PaintState, PathOp, Surface};
use drift3d_core::{Paint, Rgb};
use std::io::Write;

/// Character luminosity ramp for brightness (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Logical units covered by one terminal cell
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

/// Segments used to flatten a full circle
const ARC_SEGMENTS: usize = 24;

/// Renders surface commands into a grid of colored characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    /// Linear RGB per cell, each channel in `[0, 1]`
    light: Vec<[f32; 3]>,
    state: PaintState,
    stack: Vec<PaintState>,
    path: Vec<PathOp>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            light: vec![[0.0; 3]; width * height],
            state: PaintState::default(),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.light = vec![[0.0; 3]; width * height];
    }

    pub fn clear(&mut self) {
        for cell in &mut self.light {
            *cell = [0.0; 3];
        }
        self.state = PaintState::default();
        self.stack.clear();
        self.path.clear();
    }

    /// Cell-space position of a logical point
    fn to_cell(&self, x: f32, y: f32) -> (f32, f32) {
        let (sx, sy) = self.state.scale;
        (x * sx / CELL_WIDTH, y * sy / CELL_HEIGHT)
    }

    /// Logical position of a cell's center
    fn cell_center(&self, col: usize, row: usize) -> (f32, f32) {
        let (sx, sy) = self.state.scale;
        (
            (col as f32 + 0.5) * CELL_WIDTH / sx,
            (row as f32 + 0.5) * CELL_HEIGHT / sy,
        )
    }

    fn blend(&mut self, col: usize, row: usize, paint: &Paint, coverage: f32) {
        if col >= self.width || row >= self.height {
            return;
        }
        let (lx, ly) = self.cell_center(col, row);
        let src = paint.sample(lx, ly);
        let a = (src.a * self.state.alpha * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let rgb = [
            src.rgb.r as f32 / 255.0,
            src.rgb.g as f32 / 255.0,
            src.rgb.b as f32 / 255.0,
        ];
        let cell = &mut self.light[row * self.width + col];
        for (dst, src) in cell.iter_mut().zip(rgb) {
            *dst = match self.state.composite {
                Composite::SourceOver => *dst * (1.0 - a) + src * a,
                Composite::Lighter => (*dst + src * a).min(1.0),
            };
        }
    }

    /// Current path as cell-space polylines
    fn flatten(&self) -> Vec<Vec<(f32, f32)>> {
        let mut polylines: Vec<Vec<(f32, f32)>> = Vec::new();
        for op in &self.path {
            match *op {
                PathOp::MoveTo(x, y) => polylines.push(vec![self.to_cell(x, y)]),
                PathOp::LineTo(x, y) => {
                    let point = self.to_cell(x, y);
                    match polylines.last_mut() {
                        Some(line) => line.push(point),
                        None => polylines.push(vec![point]),
                    }
                }
                PathOp::Arc {
                    x,
                    y,
                    radius,
                    start,
                    end,
                } => {
                    let sweep = end - start;
                    let steps = ((sweep.abs() / std::f32::consts::TAU) * ARC_SEGMENTS as f32)
                        .ceil()
                        .max(1.0) as usize;
                    let points = (0..=steps).map(|i| {
                        let a = start + sweep * i as f32 / steps as f32;
                        self.to_cell(x + a.cos() * radius, y + a.sin() * radius)
                    });
                    polylines.push(points.collect());
                }
                PathOp::Close => {
                    if let Some(line) = polylines.last_mut() {
                        if let Some(&first) = line.first() {
                            line.push(first);
                        }
                    }
                }
            }
        }
        polylines
    }

    fn rasterize_line(&mut self, from: (f32, f32), to: (f32, f32), paint: &Paint, coverage: f32) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        // Cap work for segments flung far off-screen
        let steps = steps.min(4 * (self.width + self.height).max(1));
        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let (x, y) = (from.0 + dx * t, from.1 + dy * t);
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let cell = (x as usize, y as usize);
            if last != Some(cell) {
                self.blend(cell.0, cell.1, paint, coverage);
                last = Some(cell);
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<Color> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let rgb = self.color_at(x, y);
                let character = ramp(rgb);

                let color = Color::Rgb {
                    r: rgb.r,
                    g: rgb.g,
                    b: rgb.b,
                };
                if character != ' ' && current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Character at a cell, for tests and status overlays
    pub fn char_at(&self, col: usize, row: usize) -> char {
        ramp(self.color_at(col, row))
    }

    /// Dominant color of a cell
    pub fn color_at(&self, col: usize, row: usize) -> Rgb {
        let [r, g, b] = self.light[row * self.width + col];
        Rgb::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }
}

impl Surface for AsciiRenderer {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let paint = self.state.fill.clone();
        let (c0, r0) = self.to_cell(x, y);
        let (c1, r1) = self.to_cell(x + w, y + h);
        let cols = (c0.max(0.0).floor() as usize)..(c1.max(0.0).ceil() as usize).min(self.width);
        let rows = (r0.max(0.0).floor() as usize)..(r1.max(0.0).ceil() as usize).min(self.height);
        for row in rows {
            for col in cols.clone() {
                self.blend(col, row, &paint, 1.0);
            }
        }
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
        let paint = self.state.fill.clone();
        for polygon in self.flatten() {
            if polygon.len() < 3 {
                continue;
            }
            let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
            let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
            for &(x, y) in &polygon {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
            let cols = (min_x.max(0.0) as usize)..(max_x.max(0.0).ceil() as usize).min(self.width);
            let rows = (min_y.max(0.0) as usize)..(max_y.max(0.0).ceil() as usize).min(self.height);

            // Polygons smaller than a cell still light the cell they sit in
            if cols.is_empty() || rows.is_empty() {
                let (cx, cy) = ((min_x + max_x) * 0.5, (min_y + max_y) * 0.5);
                if cx >= 0.0 && cy >= 0.0 {
                    let area = (max_x - min_x) * (max_y - min_y);
                    self.blend(cx as usize, cy as usize, &paint, area.clamp(0.2, 1.0));
                }
                continue;
            }
            for row in rows {
                for col in cols.clone() {
                    if contains(&polygon, col as f32 + 0.5, row as f32 + 0.5) {
                        self.blend(col, row, &paint, 1.0);
                    }
                }
            }
        }
    }

    fn stroke(&mut self) {
        let paint = self.state.stroke.clone();
        let coverage = (self.state.line_width * self.state.scale.0 / CELL_WIDTH).clamp(0.35, 1.0);
        for polyline in self.flatten() {
            for pair in polyline.windows(2) {
                self.rasterize_line(pair[0], pair[1], &paint, coverage);
            }
        }
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

/// Ramp character for a cell color; the gamma lifts faint lines while the
/// near-black wash stays blank
fn ramp(color: Rgb) -> char {
    let index = (color.luminance().powf(0.75) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Even-odd point-in-polygon test
fn contains(polygon: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
