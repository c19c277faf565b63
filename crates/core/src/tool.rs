//! Annotation tool state
//!
//! [`AnnotationController`] owns which tool is active and the per-tool color
//! and width settings, and derives the [`SurfaceMode`] the overlay should be
//! in from them.

use crate::annotation::{Brush, Color, LineCap, LineJoin};
use crate::config::AnnotatorConfig;
use crate::surface::SurfaceMode;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, warn};

/// Accepted pen widths
pub const PEN_WIDTH_RANGE: RangeInclusive<u32> = 1..=10;

/// Accepted highlighter widths
pub const HIGHLIGHTER_WIDTH_RANGE: RangeInclusive<u32> = 5..=20;

/// Eraser width, independent of the pen and highlighter settings
pub const ERASER_WIDTH: u32 = 20;

/// Highlighter strokes are drawn half transparent
pub const HIGHLIGHTER_OPACITY: f32 = 0.5;

/// Freehand annotation tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pen,
    Highlighter,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Pen, Tool::Highlighter, Tool::Eraser];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Pen => "Pen",
            Tool::Highlighter => "Highlighter",
            Tool::Eraser => "Eraser",
        }
    }
}

/// Current tool and per-tool settings
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    /// `None` means pointer input passes through to the page
    pub active_tool: Option<Tool>,
    pub pen_color: Color,
    pub pen_width: u32,
    pub highlighter_color: Color,
    pub highlighter_width: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            active_tool: None,
            pen_color: Color::BLACK,
            pen_width: 2,
            highlighter_color: Color::YELLOW,
            highlighter_width: 10,
        }
    }
}

impl ToolConfig {
    /// Overlay behaviour for the active tool
    pub fn surface_mode(&self) -> SurfaceMode {
        match self.active_tool {
            None => SurfaceMode::Passthrough,
            Some(Tool::Pen) => SurfaceMode::Draw(Brush {
                color: self.pen_color,
                width: self.pen_width,
                opacity: 1.0,
                cap: LineCap::Round,
                join: LineJoin::Round,
            }),
            Some(Tool::Highlighter) => SurfaceMode::Draw(Brush {
                color: self.highlighter_color,
                width: self.highlighter_width,
                opacity: HIGHLIGHTER_OPACITY,
                cap: LineCap::Round,
                join: LineJoin::Round,
            }),
            Some(Tool::Eraser) => SurfaceMode::Erase { width: ERASER_WIDTH },
        }
    }
}

/// Owns tool selection and settings
///
/// Every setter reports whether the stored configuration changed; the
/// caller pushes [`surface_mode`](Self::surface_mode) to the surface manager
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnnotationController {
    config: ToolConfig,
}

impl AnnotationController {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    /// Controller with the configured defaults and no tool selected
    pub fn from_config(config: &AnnotatorConfig) -> Self {
        Self::new(ToolConfig {
            active_tool: None,
            pen_color: config.pen_color,
            pen_width: config.pen_width,
            highlighter_color: config.highlighter_color,
            highlighter_width: config.highlighter_width,
        })
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.config.active_tool
    }

    pub fn surface_mode(&self) -> SurfaceMode {
        self.config.surface_mode()
    }

    /// Select a tool, or `None` to stop drawing
    pub fn select_tool(&mut self, tool: Option<Tool>) -> bool {
        if self.config.active_tool == tool {
            return false;
        }
        debug!(?tool, "tool selected");
        self.config.active_tool = tool;
        true
    }

    pub fn set_pen_color(&mut self, color: Color) -> bool {
        replace(&mut self.config.pen_color, color)
    }

    pub fn set_highlighter_color(&mut self, color: Color) -> bool {
        replace(&mut self.config.highlighter_color, color)
    }

    /// Set the pen width; values outside [`PEN_WIDTH_RANGE`] are rejected
    pub fn set_pen_width(&mut self, width: u32) -> bool {
        if !PEN_WIDTH_RANGE.contains(&width) {
            warn!(width, "pen width out of range, ignoring");
            return false;
        }
        replace(&mut self.config.pen_width, width)
    }

    /// Set the highlighter width; values outside [`HIGHLIGHTER_WIDTH_RANGE`] are rejected
    pub fn set_highlighter_width(&mut self, width: u32) -> bool {
        if !HIGHLIGHTER_WIDTH_RANGE.contains(&width) {
            warn!(width, "highlighter width out of range, ignoring");
            return false;
        }
        replace(&mut self.config.highlighter_width, width)
    }

    /// Whether the tool's button shows as active
    pub fn is_tool_active(&self, tool: Tool) -> bool {
        self.config.active_tool == Some(tool)
    }

    /// Pen color and size inputs are only editable while the pen is active
    pub fn pen_inputs_enabled(&self) -> bool {
        self.is_tool_active(Tool::Pen)
    }

    /// Highlighter color and size inputs are only editable while the highlighter is active
    pub fn highlighter_inputs_enabled(&self) -> bool {
        self.is_tool_active(Tool::Highlighter)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
