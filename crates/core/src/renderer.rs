//! Page renderer adapter
//!
//! The core never talks to PDFium directly. It sees documents through the
//! [`PageRenderer`] trait; [`PdfiumRenderer`] is the production
//! implementation backed by `pdf-annotator-render`.

use crate::error::{RenderError, RenderResult};
use crate::session::FileHandle;
use crate::surface::SurfaceBounds;
use pdf_annotator_render::{PdfDocument, PdfEngine};
use tracing::info;

/// Page size in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest rectangle with the page's aspect ratio that fits inside
    /// `viewport` shrunk by `padding` on every side
    ///
    /// Empty when the viewport has not been laid out yet or the page has no
    /// area.
    pub fn fit_within(&self, viewport: SurfaceBounds, padding: f32) -> SurfaceBounds {
        let available_width = viewport.width - padding * 2.0;
        let available_height = viewport.height - padding * 2.0;

        if viewport.is_empty()
            || available_width <= 0.0
            || available_height <= 0.0
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return SurfaceBounds::default();
        }

        let scale = (available_width / self.width).min(available_height / self.height);
        SurfaceBounds::new(self.width * scale, self.height * scale)
    }
}

/// Rasterized page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    /// RGBA, 4 bytes per pixel, row-major
    pub pixels: Vec<u8>,
}

/// Renders pages of one loaded document
///
/// Page numbers are 1-based.
pub trait PageRenderer {
    /// Load `file`, replacing the current document, and report its page count
    ///
    /// On failure the previously loaded document must stay usable.
    fn open(&mut self, file: &FileHandle) -> RenderResult<u32>;

    fn page_size(&self, page: u32) -> RenderResult<PageSize>;

    fn render(&self, page: u32, width: u32, height: u32) -> RenderResult<RenderedPage>;

    /// Drop the loaded document
    fn close(&mut self);
}

/// PDFium-backed renderer
///
/// The library is bound lazily on the first `open`, so a missing PDFium
/// shows up as an ordinary load failure.
#[derive(Default)]
pub struct PdfiumRenderer {
    engine: Option<PdfEngine>,
    document: Option<PdfDocument>,
}

impl PdfiumRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn engine(&mut self) -> RenderResult<&PdfEngine> {
        if self.engine.is_none() {
            self.engine = Some(PdfEngine::bind()?);
        }
        self.engine.as_ref().ok_or(RenderError::NoDocument)
    }

    fn document(&self) -> RenderResult<&PdfDocument> {
        self.document.as_ref().ok_or(RenderError::NoDocument)
    }

    fn page_index(&self, page: u32) -> RenderResult<u16> {
        let total = self.document()?.page_count() as u32;
        if page == 0 || page > total {
            return Err(RenderError::PageOutOfRange { page, total });
        }
        Ok((page - 1) as u16)
    }
}

impl PageRenderer for PdfiumRenderer {
    fn open(&mut self, file: &FileHandle) -> RenderResult<u32> {
        let document = self.engine()?.open(file.path())?;
        let page_count = document.page_count() as u32;

        let metadata = document.metadata();
        info!(
            file = %file.path().display(),
            page_count,
            title = metadata.title.as_deref().unwrap_or(""),
            author = metadata.author.as_deref().unwrap_or(""),
            "document opened"
        );

        self.document = Some(document);
        Ok(page_count)
    }

    fn page_size(&self, page: u32) -> RenderResult<PageSize> {
        let index = self.page_index(page)?;
        let dimensions = self.document()?.page_dimensions(index)?;
        Ok(PageSize::new(dimensions.width, dimensions.height))
    }

    fn render(&self, page: u32, width: u32, height: u32) -> RenderResult<RenderedPage> {
        let index = self.page_index(page)?;
        let (pixels, width, height) = self.document()?.render_page_rgba(index, width, height)?;
        Ok(RenderedPage {
            width,
            height,
            pixels,
        })
    }

    fn close(&mut self) {
        self.document = None;
    }
}
