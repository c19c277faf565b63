//! In-process drawing surface
//!
//! [`StrokeCanvas`] is the [`DrawingSurface`] the desktop shell draws on. It
//! keeps strokes as vectors in surface-local coordinates and turns pointer
//! input into strokes (free-draw) or removals (erase mode).

use crate::annotation::{Brush, Color, LineCap, LineJoin, Stroke, SurfacePoint};
use crate::surface::{DrawingSurface, SurfaceBounds, SurfaceFactory};
use tracing::debug;

/// Vector stroke surface driven by pointer events
#[derive(Debug)]
pub struct StrokeCanvas {
    bounds: SurfaceBounds,
    drawing_mode: bool,
    erase_mode: bool,
    brush: Brush,
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
    /// Last eraser position while the pointer is down
    last_erase: Option<SurfacePoint>,
    disposed: bool,
}

impl StrokeCanvas {
    pub fn new(bounds: SurfaceBounds) -> Self {
        Self {
            bounds,
            drawing_mode: false,
            erase_mode: false,
            brush: Brush::default(),
            strokes: Vec::new(),
            active: None,
            last_erase: None,
            disposed: false,
        }
    }

    /// Pointer pressed at `point`
    pub fn pointer_down(&mut self, point: SurfacePoint) {
        if !self.accepts_input() {
            return;
        }

        if self.erase_mode {
            self.erase_along(point, point);
        } else {
            self.commit_active();
            self.active = Some(Stroke::start(point, self.brush));
        }
    }

    /// Pointer dragged to `point`
    pub fn pointer_move(&mut self, point: SurfacePoint) {
        if !self.accepts_input() {
            return;
        }

        if self.erase_mode {
            let from = self.last_erase.unwrap_or(point);
            self.erase_along(from, point);
        } else if let Some(stroke) = &mut self.active {
            stroke.extend_to(point);
        }
    }

    /// Pointer released; finishes the stroke in progress
    pub fn pointer_up(&mut self) {
        self.last_erase = None;
        self.commit_active();
    }

    /// Committed strokes, oldest first
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Stroke currently being drawn, if any
    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Remove every stroke
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    fn accepts_input(&self) -> bool {
        self.drawing_mode && !self.disposed
    }

    fn commit_active(&mut self) {
        if let Some(stroke) = self.active.take() {
            self.strokes.push(stroke);
        }
    }

    /// Remove strokes touched by the eraser moving from `from` to `to`
    fn erase_along(&mut self, from: SurfacePoint, to: SurfacePoint) {
        self.last_erase = Some(to);

        let radius = self.brush.width as f32 / 2.0;
        let before = self.strokes.len();
        self.strokes
            .retain(|stroke| !stroke.intersects_sweep(&from, &to, radius));

        let removed = before - self.strokes.len();
        if removed > 0 {
            debug!(removed, "erased strokes");
        }
    }
}

impl DrawingSurface for StrokeCanvas {
    fn set_drawing_mode(&mut self, enabled: bool) {
        if !enabled {
            self.commit_active();
        }
        self.drawing_mode = enabled;
    }

    fn set_brush_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    fn set_brush_width(&mut self, width: u32) {
        self.brush.width = width;
    }

    fn set_brush_opacity(&mut self, opacity: f32) {
        self.brush.opacity = opacity.clamp(0.0, 1.0);
    }

    fn set_line_style(&mut self, cap: LineCap, join: LineJoin) {
        self.brush.cap = cap;
        self.brush.join = join;
    }

    fn set_erase_mode(&mut self, erase: bool) {
        if erase {
            self.commit_active();
        }
        self.last_erase = None;
        self.erase_mode = erase;
    }

    fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    fn dispose(&mut self) {
        self.clear();
        self.last_erase = None;
        self.drawing_mode = false;
        self.disposed = true;
    }
}

/// Creates [`StrokeCanvas`] surfaces
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasFactory;

impl SurfaceFactory for CanvasFactory {
    type Surface = StrokeCanvas;

    fn create(&mut self, bounds: SurfaceBounds) -> StrokeCanvas {
        StrokeCanvas::new(bounds)
    }
}
