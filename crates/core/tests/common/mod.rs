//! Shared fakes for annotator scenario tests

#![allow(dead_code)]

use pdf_annotator_core::{
    Annotator, AnnotatorConfig, Color, DrawingSurface, FileHandle, LineCap, LineJoin,
    PageRenderer, PageSize, RenderError, RenderResult, RenderedPage, SurfaceBounds,
    SurfaceFactory,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Lifecycle events observed by the recording factory
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created(usize, SurfaceBounds),
    Disposed(usize),
    Resized(usize, SurfaceBounds),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Current brush and mode flags of a recording surface
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSettings {
    pub drawing: bool,
    pub erase: bool,
    pub color: Option<Color>,
    pub width: Option<u32>,
    pub opacity: Option<f32>,
}

pub struct RecordingSurface {
    pub index: usize,
    pub bounds: SurfaceBounds,
    pub settings: SurfaceSettings,
    log: EventLog,
}

impl DrawingSurface for RecordingSurface {
    fn set_drawing_mode(&mut self, enabled: bool) {
        self.settings.drawing = enabled;
    }

    fn set_brush_color(&mut self, color: Color) {
        self.settings.color = Some(color);
    }

    fn set_brush_width(&mut self, width: u32) {
        self.settings.width = Some(width);
    }

    fn set_brush_opacity(&mut self, opacity: f32) {
        self.settings.opacity = Some(opacity);
    }

    fn set_line_style(&mut self, _cap: LineCap, _join: LineJoin) {}

    fn set_erase_mode(&mut self, erase: bool) {
        self.settings.erase = erase;
    }

    fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
        self.log.borrow_mut().push(Event::Resized(self.index, bounds));
    }

    fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(Event::Disposed(self.index));
    }
}

#[derive(Default)]
pub struct RecordingFactory {
    created: usize,
    pub log: EventLog,
}

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn create(&mut self, bounds: SurfaceBounds) -> RecordingSurface {
        self.created += 1;
        self.log
            .borrow_mut()
            .push(Event::Created(self.created, bounds));
        RecordingSurface {
            index: self.created,
            bounds,
            settings: SurfaceSettings {
                drawing: false,
                erase: false,
                color: None,
                width: None,
                opacity: None,
            },
            log: Rc::clone(&self.log),
        }
    }
}

/// Renderer serving in-memory documents keyed by file name
///
/// Any other file name fails to load.
#[derive(Default)]
pub struct FakeRenderer {
    documents: HashMap<String, Vec<PageSize>>,
    open: Option<String>,
}

impl FakeRenderer {
    pub fn with_document(mut self, name: &str, pages: &[(f32, f32)]) -> Self {
        self.documents.insert(
            name.to_string(),
            pages.iter().map(|&(w, h)| PageSize::new(w, h)).collect(),
        );
        self
    }

    pub fn open_document(&self) -> Option<&str> {
        self.open.as_deref()
    }

    fn pages(&self) -> RenderResult<&[PageSize]> {
        self.open
            .as_ref()
            .and_then(|name| self.documents.get(name))
            .map(Vec::as_slice)
            .ok_or(RenderError::NoDocument)
    }
}

impl PageRenderer for FakeRenderer {
    fn open(&mut self, file: &FileHandle) -> RenderResult<u32> {
        let name = file.display_name();
        let pages = self
            .documents
            .get(&name)
            .ok_or_else(|| RenderError::Load(format!("{} is not a PDF", name)))?;
        let count = pages.len() as u32;
        self.open = Some(name);
        Ok(count)
    }

    fn page_size(&self, page: u32) -> RenderResult<PageSize> {
        let pages = self.pages()?;
        page.checked_sub(1)
            .and_then(|index| pages.get(index as usize))
            .copied()
            .ok_or(RenderError::PageOutOfRange {
                page,
                total: pages.len() as u32,
            })
    }

    fn render(&self, page: u32, width: u32, height: u32) -> RenderResult<RenderedPage> {
        self.page_size(page)?;
        Ok(RenderedPage {
            width,
            height,
            pixels: vec![0xFF; width as usize * height as usize * 4],
        })
    }

    fn close(&mut self) {
        self.open = None;
    }
}

pub const LETTER: (f32, f32) = (612.0, 792.0);

/// Viewport that shows a letter page at scale 1 with the default padding
pub const VIEWPORT: (f32, f32) = (652.0, 832.0);

/// Annotator with "three.pdf" (3 letter pages) and "single.pdf" (1 page),
/// already laid out
pub fn annotator() -> (Annotator<FakeRenderer, RecordingFactory>, EventLog) {
    annotator_with(&AnnotatorConfig::default())
}

pub fn annotator_with(
    config: &AnnotatorConfig,
) -> (Annotator<FakeRenderer, RecordingFactory>, EventLog) {
    let renderer = FakeRenderer::default()
        .with_document("three.pdf", &[LETTER, LETTER, LETTER])
        .with_document("single.pdf", &[(800.0, 400.0)]);
    let factory = RecordingFactory::default();
    let log = Rc::clone(&factory.log);

    let mut annotator = Annotator::new(renderer, factory, config);
    annotator.viewport_resized(VIEWPORT.0, VIEWPORT.1);
    (annotator, log)
}

pub fn created(log: &EventLog) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, Event::Created(..)))
        .count()
}

pub fn disposed(log: &EventLog) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, Event::Disposed(_)))
        .count()
}

pub fn settings(annotator: &Annotator<FakeRenderer, RecordingFactory>) -> SurfaceSettings {
    annotator
        .surfaces()
        .surface()
        .map(|s| s.settings.clone())
        .expect("a surface should be active")
}
