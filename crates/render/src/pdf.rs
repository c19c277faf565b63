//! PDF document abstraction layer
//!
//! Provides a high-level interface to PDF documents using PDFium.

use pdfium_render::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    /// Failed to initialize PDFium library
    #[error("PDFium initialization error: {0}")]
    InitializationError(String),

    /// Failed to load PDF document
    #[error("PDF load error: {0}")]
    LoadError(String),

    /// Invalid page index
    #[error("Invalid page index: {0}")]
    InvalidPageIndex(u16),

    /// Rendering error
    #[error("PDF render error: {0}")]
    RenderError(String),
}

/// Result type for PDF operations
pub type PdfResult<T> = Result<T, PdfError>;

/// Bound PDFium library
///
/// PDFium documents borrow the library instance for their whole lifetime,
/// so the instance is leaked once per engine and shared by every document
/// the engine opens.
pub struct PdfEngine {
    pdfium: &'static Pdfium,
}

impl PdfEngine {
    /// Bind the PDFium library
    ///
    /// Search order:
    /// 1. Executable's directory (for app bundles: .app/Contents/MacOS/)
    /// 2. Current working directory
    /// 3. System library paths
    pub fn bind() -> PdfResult<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        let bindings = match exe_dir
            .as_ref()
            .map(|dir| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)))
        {
            Some(Ok(bindings)) => bindings,
            _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library())
                .map_err(|e| PdfError::InitializationError(e.to_string()))?,
        };

        debug!("PDFium bound");
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(Self { pdfium })
    }

    /// Load a PDF document from a file path
    pub fn open<P: AsRef<Path>>(&self, path: P) -> PdfResult<PdfDocument> {
        let document = self
            .pdfium
            .load_pdf_from_file(path.as_ref(), None)
            .map_err(|e| PdfError::LoadError(e.to_string()))?;

        Ok(PdfDocument { document })
    }
}

/// PDF document handle
pub struct PdfDocument {
    document: pdfium_render::prelude::PdfDocument<'static>,
}

impl PdfDocument {
    /// Get the number of pages in the document
    pub fn page_count(&self) -> u16 {
        self.document.pages().len()
    }

    /// Get a page by index (0-based)
    fn get_page(&self, index: u16) -> PdfResult<PdfPage<'_>> {
        self.document
            .pages()
            .get(index)
            .map_err(|_| PdfError::InvalidPageIndex(index))
    }

    /// Page dimensions in points for a zero-based page index
    pub fn page_dimensions(&self, index: u16) -> PdfResult<PageDimensions> {
        let page = self.get_page(index)?;
        Ok(PageDimensions {
            width: page.width().value,
            height: page.height().value,
        })
    }

    /// Get the document's metadata
    pub fn metadata(&self) -> PdfMetadata {
        let meta = self.document.metadata();

        PdfMetadata {
            title: meta
                .get(PdfDocumentMetadataTagType::Title)
                .map(|v| v.value().to_string()),
            author: meta
                .get(PdfDocumentMetadataTagType::Author)
                .map(|v| v.value().to_string()),
        }
    }

    /// Render a page to RGBA pixel data (4 bytes per pixel)
    ///
    /// Returns `(rgba_data, width, height)`.
    pub fn render_page_rgba(
        &self,
        page_index: u16,
        width: u32,
        height: u32,
    ) -> PdfResult<(Vec<u8>, u32, u32)> {
        if width == 0 || height == 0 {
            return Err(PdfError::RenderError(format!(
                "empty target size {}x{}",
                width, height
            )));
        }

        let page = self.get_page(page_index)?;

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderError(e.to_string()))?;

        // PDFium may round the target size; report what was actually drawn
        Ok((
            bitmap.as_rgba_bytes().to_vec(),
            bitmap.width() as u32,
            bitmap.height() as u32,
        ))
    }
}

/// PDF document metadata
#[derive(Debug, Clone, Default)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Page dimensions in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_error_display() {
        let err = PdfError::InvalidPageIndex(5);
        assert_eq!(err.to_string(), "Invalid page index: 5");

        let err = PdfError::LoadError("file not found".to_string());
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_metadata_default() {
        let metadata = PdfMetadata::default();
        assert!(metadata.title.is_none());
        assert!(metadata.author.is_none());
    }

    #[test]
    fn test_pdfium_library_name_generation() {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        if let Some(dir) = exe_dir {
            let lib_path = Pdfium::pdfium_platform_library_name_at_path(&dir);
            let lib_name = lib_path.to_string_lossy();

            #[cfg(target_os = "linux")]
            assert!(
                lib_name.ends_with(".so"),
                "Expected .so extension on Linux, got: {}",
                lib_name
            );

            assert!(
                lib_name.to_lowercase().contains("pdfium"),
                "Library name should contain 'pdfium', got: {}",
                lib_name
            );
        }
    }
}
