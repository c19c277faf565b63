//! Event-driven coordinator
//!
//! [`Annotator`] owns the document session, the tool controller, the surface
//! manager and the page renderer, and turns discrete UI events into the
//! state transitions between them:
//!
//! - file or page change: tear down the overlay, then create a new one for
//!   the page's display bounds
//! - tool, color or width change: reconfigure the overlay in place
//! - viewport resize: resize the overlay to the refitted page

use crate::annotation::Color;
use crate::config::AnnotatorConfig;
use crate::error::{RenderError, RenderResult};
use crate::renderer::{PageRenderer, PageSize, RenderedPage};
use crate::session::{DocumentSession, FileHandle};
use crate::surface::{SurfaceBounds, SurfaceFactory, SurfaceManager};
use crate::tool::{AnnotationController, Tool};
use tracing::{info, warn};

/// Non-blocking message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Page navigation affordances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub can_previous: bool,
    pub can_next: bool,
    /// "current / total"
    pub indicator: String,
}

pub struct Annotator<R: PageRenderer, F: SurfaceFactory> {
    renderer: R,
    session: DocumentSession,
    tools: AnnotationController,
    surfaces: SurfaceManager<F>,
    viewport: SurfaceBounds,
    page_padding: f32,
    /// Size of the current page, known once a page is bound
    page_size: Option<PageSize>,
    notice: Option<Notice>,
}

impl<R: PageRenderer, F: SurfaceFactory> Annotator<R, F> {
    pub fn new(renderer: R, factory: F, config: &AnnotatorConfig) -> Self {
        let tools = AnnotationController::from_config(config);
        let mut surfaces = SurfaceManager::new(factory);
        surfaces.reconfigure(tools.surface_mode());

        Self {
            renderer,
            session: DocumentSession::new(),
            tools,
            surfaces,
            viewport: SurfaceBounds::default(),
            page_padding: config.page_padding,
            page_size: None,
            notice: None,
        }
    }

    /// Open `file` and bind a fresh overlay to its first page
    ///
    /// On failure a notice is raised and the session, the overlay and the
    /// previously open document are left as they were.
    pub fn open_file(&mut self, file: FileHandle) -> RenderResult<u32> {
        let page_count = match self.renderer.open(&file) {
            Ok(count) => count,
            Err(err) => {
                warn!(file = %file.path().display(), error = %err, "failed to load document");
                self.notice = Some(Notice {
                    title: "Could not open PDF".to_string(),
                    message: format!("{}: {}", file.display_name(), err),
                });
                return Err(err);
            }
        };

        info!(file = %file.path().display(), page_count, "document loaded");
        self.notice = None;
        self.surfaces.teardown();
        self.session.load_file(file);
        self.session.set_total_pages(page_count);
        self.bind_current_page();
        Ok(page_count)
    }

    /// Go to a 1-based page; out-of-range targets are ignored
    ///
    /// Every accepted target replaces the overlay, discarding its strokes.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        if !self.session.go_to_page(page) {
            return false;
        }
        self.surfaces.teardown();
        self.bind_current_page();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.session.current_page().saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.session.current_page().saturating_sub(1))
    }

    pub fn select_tool(&mut self, tool: Option<Tool>) {
        if self.tools.select_tool(tool) {
            self.push_surface_mode();
        }
    }

    pub fn set_pen_color(&mut self, color: Color) {
        if self.tools.set_pen_color(color) {
            self.push_surface_mode();
        }
    }

    pub fn set_pen_width(&mut self, width: u32) {
        if self.tools.set_pen_width(width) {
            self.push_surface_mode();
        }
    }

    pub fn set_highlighter_color(&mut self, color: Color) {
        if self.tools.set_highlighter_color(color) {
            self.push_surface_mode();
        }
    }

    pub fn set_highlighter_width(&mut self, width: u32) {
        if self.tools.set_highlighter_width(width) {
            self.push_surface_mode();
        }
    }

    /// The area available for the page changed
    ///
    /// Idempotent: repeated calls with the same size leave the overlay alone.
    pub fn viewport_resized(&mut self, width: f32, height: f32) {
        let viewport = SurfaceBounds::new(width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;

        if let Some(bounds) = self.page_bounds() {
            self.surfaces.resize(bounds);
        }
    }

    /// Close the document and release the overlay
    pub fn close_document(&mut self) {
        self.surfaces.teardown();
        self.renderer.close();
        self.session.close();
        self.page_size = None;
    }

    /// Final cleanup on application exit
    pub fn shutdown(&mut self) {
        self.surfaces.dispose();
        self.renderer.close();
    }

    /// Display bounds of the current page inside the viewport
    pub fn page_bounds(&self) -> Option<SurfaceBounds> {
        self.page_size
            .map(|size| size.fit_within(self.viewport, self.page_padding))
    }

    /// Rasterize the current page at its display bounds times `pixels_per_point`
    pub fn render_current_page(&self, pixels_per_point: f32) -> RenderResult<RenderedPage> {
        let bounds = self.page_bounds().ok_or(RenderError::NoDocument)?;
        let width = (bounds.width * pixels_per_point).round() as u32;
        let height = (bounds.height * pixels_per_point).round() as u32;
        self.renderer
            .render(self.session.current_page(), width, height)
    }

    pub fn navigation(&self) -> NavigationState {
        NavigationState {
            can_previous: self.session.can_go_previous(),
            can_next: self.session.can_go_next(),
            indicator: self.session.page_indicator(),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Raise a notice from outside the core, e.g. a rejected dropped file
    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn tools(&self) -> &AnnotationController {
        &self.tools
    }

    pub fn surfaces(&self) -> &SurfaceManager<F> {
        &self.surfaces
    }

    /// The active overlay, for routing pointer input
    pub fn surface_mut(&mut self) -> Option<&mut F::Surface> {
        self.surfaces.surface_mut()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn push_surface_mode(&mut self) {
        self.surfaces.reconfigure(self.tools.surface_mode());
    }

    /// Create the overlay for the current page
    ///
    /// The caller has already torn down the previous overlay.
    fn bind_current_page(&mut self) {
        let page = self.session.current_page();
        if !self.session.is_valid_page(page) {
            self.page_size = None;
            return;
        }

        self.page_size = match self.renderer.page_size(page) {
            Ok(size) => Some(size),
            Err(err) => {
                warn!(page, error = %err, "cannot size page, overlay not created");
                None
            }
        };

        if let Some(bounds) = self.page_bounds() {
            self.surfaces.initialize(bounds);
        }
    }
}
