//! Freehand annotation data model
//!
//! Strokes, colors and line styles drawn on the page overlay.
//! All coordinates are stored in surface-local space: origin at the top-left
//! of the drawing surface, units in logical pixels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Point in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f32,
    pub y: f32,
}

impl SurfacePoint {
    /// Create a new surface point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance_to(&self, other: &SurfacePoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional)
    pub fn from_hex(value: &str) -> Result<Self, ParseColorError> {
        let digits = value.trim().trim_start_matches('#');
        if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
            return Err(ParseColorError(value.to_string()));
        }

        let channel = |start: usize| {
            u8::from_str_radix(&digits[start..start + 2], 16)
                .map_err(|_| ParseColorError(value.to_string()))
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Color::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

/// Malformed hex color string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

/// Shape drawn at the open ends of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Shape drawn where two stroke segments meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Brush parameters a stroke is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    /// Stroke width in logical pixels
    pub width: u32,
    /// Opacity (0.0 = transparent, 1.0 = opaque)
    pub opacity: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1,
            opacity: 1.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }
}

/// A single freehand stroke
///
/// The brush is captured when the stroke starts; later brush changes only
/// affect strokes started afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<SurfacePoint>,
    brush: Brush,
}

impl Stroke {
    /// Start a stroke at `origin` with the given brush
    pub fn start(origin: SurfacePoint, brush: Brush) -> Self {
        Self {
            points: vec![origin],
            brush,
        }
    }

    pub fn points(&self) -> &[SurfacePoint] {
        &self.points
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Append a point, skipping exact repeats of the last one
    pub fn extend_to(&mut self, point: SurfacePoint) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y)
    pub fn bounding_box(&self) -> (f32, f32, f32, f32) {
        let first = self.points[0];
        self.points.iter().skip(1).fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        )
    }

    /// Whether an eraser of `radius` moved from `from` to `to` touches the stroke
    ///
    /// The stroke's own half-width is added to the radius. Pass the same
    /// point twice for a stationary eraser.
    pub fn intersects_sweep(&self, from: &SurfacePoint, to: &SurfacePoint, radius: f32) -> bool {
        let tolerance = radius + self.brush.width as f32 / 2.0;

        let (min_x, min_y, max_x, max_y) = self.bounding_box();
        if from.x.max(to.x) < min_x - tolerance
            || from.x.min(to.x) > max_x + tolerance
            || from.y.max(to.y) < min_y - tolerance
            || from.y.min(to.y) > max_y + tolerance
        {
            return false;
        }

        if self.points.len() == 1 {
            return point_near_line_segment(&self.points[0], from, to, tolerance);
        }

        self.points
            .windows(2)
            .any(|segment| segments_near(&segment[0], &segment[1], from, to, tolerance))
    }
}

/// Point-to-line-segment distance check
fn point_near_line_segment(
    point: &SurfacePoint,
    start: &SurfacePoint,
    end: &SurfacePoint,
    tolerance: f32,
) -> bool {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-6 {
        return point.distance_to(start) <= tolerance;
    }

    // Project point onto line segment
    let t = ((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = SurfacePoint::new(start.x + t * dx, start.y + t * dy);
    point.distance_to(&closest) <= tolerance
}

/// Segment-to-segment distance check
fn segments_near(
    a_start: &SurfacePoint,
    a_end: &SurfacePoint,
    b_start: &SurfacePoint,
    b_end: &SurfacePoint,
    tolerance: f32,
) -> bool {
    segments_cross(a_start, a_end, b_start, b_end)
        || point_near_line_segment(a_start, b_start, b_end, tolerance)
        || point_near_line_segment(a_end, b_start, b_end, tolerance)
        || point_near_line_segment(b_start, a_start, a_end, tolerance)
        || point_near_line_segment(b_end, a_start, a_end, tolerance)
}

/// Proper crossing; touching and collinear cases fall to the distance checks
fn segments_cross(
    a_start: &SurfacePoint,
    a_end: &SurfacePoint,
    b_start: &SurfacePoint,
    b_end: &SurfacePoint,
) -> bool {
    let side = |o: &SurfacePoint, a: &SurfacePoint, b: &SurfacePoint| {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };
    let opposite = |p: f32, q: f32| (p > 0.0 && q < 0.0) || (p < 0.0 && q > 0.0);

    opposite(side(b_start, b_end, a_start), side(b_start, b_end, a_end))
        && opposite(side(a_start, a_end, b_start), side(a_start, a_end, b_end))
}
