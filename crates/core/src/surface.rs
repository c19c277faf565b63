//! Drawing surface lifecycle
//!
//! The overlay drawn on top of the rendered page is owned by a
//! [`SurfaceManager`]. The drawing library itself is reached only through the
//! small [`DrawingSurface`] capability trait, so the rest of the crate never
//! depends on its exact shape.
//!
//! Lifecycle: `Uninitialized -> Active -> (teardown + initialize on page or
//! file change) -> Active -> Disposed`. Changing the tool configuration never
//! moves between states; it only reconfigures the active surface.

use crate::annotation::{Brush, Color, LineCap, LineJoin};
use tracing::{debug, warn};

/// Rectangle the overlay covers, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceBounds {
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or NaN (e.g. before layout)
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Interactive behaviour of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SurfaceMode {
    /// Pointer input passes through without drawing
    #[default]
    Passthrough,
    /// Free-draw with the given brush
    Draw(Brush),
    /// Free-draw that removes intersecting strokes
    Erase { width: u32 },
}

impl SurfaceMode {
    /// Whether the surface is in free-draw mode (drawing or erasing)
    pub fn is_free_draw(&self) -> bool {
        !matches!(self, SurfaceMode::Passthrough)
    }
}

/// Capabilities the drawing library must expose
pub trait DrawingSurface {
    /// Enter or leave free-draw mode
    fn set_drawing_mode(&mut self, enabled: bool);
    fn set_brush_color(&mut self, color: Color);
    fn set_brush_width(&mut self, width: u32);
    fn set_brush_opacity(&mut self, opacity: f32);
    fn set_line_style(&mut self, cap: LineCap, join: LineJoin);
    /// In erase mode free-draw removes strokes instead of adding them
    fn set_erase_mode(&mut self, erase: bool);
    /// Update the covered rectangle; existing strokes keep their coordinates
    fn set_bounds(&mut self, bounds: SurfaceBounds);
    fn bounds(&self) -> SurfaceBounds;
    /// Release the surface and every stroke it holds
    fn dispose(&mut self);
}

/// Creates drawing surfaces for a given rectangle
pub trait SurfaceFactory {
    type Surface: DrawingSurface;

    fn create(&mut self, bounds: SurfaceBounds) -> Self::Surface;
}

/// Push a mode into a surface through the capability interface
pub fn apply_mode<S: DrawingSurface + ?Sized>(surface: &mut S, mode: &SurfaceMode) {
    match mode {
        SurfaceMode::Passthrough => {
            surface.set_erase_mode(false);
            surface.set_drawing_mode(false);
        }
        SurfaceMode::Draw(brush) => {
            surface.set_erase_mode(false);
            surface.set_brush_color(brush.color);
            surface.set_brush_width(brush.width);
            surface.set_brush_opacity(brush.opacity);
            surface.set_line_style(brush.cap, brush.join);
            surface.set_drawing_mode(true);
        }
        SurfaceMode::Erase { width } => {
            surface.set_erase_mode(true);
            surface.set_brush_width(*width);
            surface.set_drawing_mode(true);
        }
    }
}

/// Lifecycle state of the managed surface
#[derive(Debug)]
pub enum SurfaceState<S> {
    /// No surface exists yet (or the last one was torn down)
    Uninitialized,
    /// A surface is bound to the current page
    Active(S),
    /// Final state after shutdown; every operation is ignored
    Disposed,
}

/// Owns the one drawing surface bound to the currently rendered page
pub struct SurfaceManager<F: SurfaceFactory> {
    factory: F,
    state: SurfaceState<F::Surface>,
    /// Mode applied to the active surface and to every new one
    mode: SurfaceMode,
    /// Set when `initialize` ran before layout produced non-empty bounds
    awaiting_layout: bool,
}

impl<F: SurfaceFactory> SurfaceManager<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            state: SurfaceState::Uninitialized,
            mode: SurfaceMode::default(),
            awaiting_layout: false,
        }
    }

    /// Create a new surface sized to `bounds`
    ///
    /// Any active surface is torn down first. Empty bounds are a silent
    /// no-op; the next non-empty [`resize`](Self::resize) creates the surface.
    /// Returns whether a surface was created.
    pub fn initialize(&mut self, bounds: SurfaceBounds) -> bool {
        if matches!(self.state, SurfaceState::Disposed) {
            warn!("initialize called on a disposed surface manager");
            return false;
        }

        self.teardown();

        if bounds.is_empty() {
            debug!(?bounds, "surface bounds not laid out yet, deferring");
            self.awaiting_layout = true;
            return false;
        }

        let mut surface = self.factory.create(bounds);
        apply_mode(&mut surface, &self.mode);
        debug!(?bounds, mode = ?self.mode, "surface initialized");
        self.state = SurfaceState::Active(surface);
        true
    }

    /// Apply a new mode to the active surface without discarding strokes
    pub fn reconfigure(&mut self, mode: SurfaceMode) {
        if matches!(self.state, SurfaceState::Disposed) {
            return;
        }

        self.mode = mode;
        if let SurfaceState::Active(surface) = &mut self.state {
            apply_mode(surface, &mode);
            debug!(?mode, "surface reconfigured");
        }
    }

    /// Match the surface rectangle to new bounds
    ///
    /// Idempotent. Strokes are never rescaled or moved. If initialization was
    /// deferred for lack of layout, non-empty bounds create the surface now.
    pub fn resize(&mut self, bounds: SurfaceBounds) {
        if matches!(self.state, SurfaceState::Uninitialized) {
            if self.awaiting_layout && !bounds.is_empty() {
                self.initialize(bounds);
            }
            return;
        }

        match &mut self.state {
            SurfaceState::Uninitialized | SurfaceState::Disposed => {}
            SurfaceState::Active(surface) => {
                if bounds.is_empty() || surface.bounds() == bounds {
                    return;
                }
                surface.set_bounds(bounds);
                debug!(?bounds, "surface resized");
            }
        }
    }

    /// Release the active surface and all its strokes
    pub fn teardown(&mut self) {
        self.awaiting_layout = false;
        if matches!(self.state, SurfaceState::Disposed) {
            return;
        }
        if let SurfaceState::Active(mut surface) =
            std::mem::replace(&mut self.state, SurfaceState::Uninitialized)
        {
            surface.dispose();
            debug!("surface torn down");
        }
    }

    /// Final teardown; the manager ignores every later call
    pub fn dispose(&mut self) {
        if matches!(self.state, SurfaceState::Disposed) {
            return;
        }
        self.teardown();
        self.state = SurfaceState::Disposed;
        debug!("surface manager disposed");
    }

    pub fn state(&self) -> &SurfaceState<F::Surface> {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SurfaceState::Active(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.state, SurfaceState::Disposed)
    }

    pub fn is_awaiting_layout(&self) -> bool {
        self.awaiting_layout
    }

    pub fn mode(&self) -> &SurfaceMode {
        &self.mode
    }

    pub fn surface(&self) -> Option<&F::Surface> {
        match &self.state {
            SurfaceState::Active(surface) => Some(surface),
            _ => None,
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut F::Surface> {
        match &mut self.state {
            SurfaceState::Active(surface) => Some(surface),
            _ => None,
        }
    }
}
