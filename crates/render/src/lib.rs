//! PDF Annotator Render Library
//!
//! Thin PDFium wrapper: binds the library once, opens documents and
//! rasterizes single pages to RGBA buffers.

pub mod pdf;

pub use pdf::{PageDimensions, PdfDocument, PdfEngine, PdfError, PdfMetadata, PdfResult};
