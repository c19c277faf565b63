//! PDF Annotator Core Library
//!
//! Document session, tool state and drawing-surface lifecycle for the PDF
//! annotator. UI toolkits drive an [`Annotator`] with discrete events and
//! read back what to display.

pub mod annotation;
pub mod annotator;
pub mod canvas;
pub mod config;
pub mod error;
pub mod renderer;
pub mod session;
pub mod surface;
pub mod tool;

pub use annotation::{Brush, Color, LineCap, LineJoin, ParseColorError, Stroke, SurfacePoint};
pub use annotator::{Annotator, NavigationState, Notice};
pub use canvas::{CanvasFactory, StrokeCanvas};
pub use config::AnnotatorConfig;
pub use error::{ConfigError, RenderError, RenderResult};
pub use renderer::{PageRenderer, PageSize, PdfiumRenderer, RenderedPage};
pub use session::{DocumentSession, FileHandle};
pub use surface::{
    apply_mode, DrawingSurface, SurfaceBounds, SurfaceFactory, SurfaceManager, SurfaceMode,
    SurfaceState,
};
pub use tool::{AnnotationController, Tool, ToolConfig};
