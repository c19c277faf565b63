//! Error types for the annotator core

use pdf_annotator_render::PdfError;
use std::io;
use thiserror::Error;

/// Failures reported by a page renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no document is open")]
    NoDocument,

    /// The file is missing or cannot be parsed
    #[error("failed to load document: {0}")]
    Load(String),

    #[error("page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: u32, total: u32 },

    #[error("failed to render page: {0}")]
    Render(String),
}

impl From<PdfError> for RenderError {
    fn from(err: PdfError) -> Self {
        match err {
            PdfError::InitializationError(_) | PdfError::LoadError(_) => {
                RenderError::Load(err.to_string())
            }
            PdfError::InvalidPageIndex(_) | PdfError::RenderError(_) => {
                RenderError::Render(err.to_string())
            }
        }
    }
}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Failures while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for configuration key {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
