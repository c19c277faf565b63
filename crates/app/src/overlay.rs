//! Stroke overlay painting and pointer routing
//!
//! Strokes live in surface-local coordinates (origin at the page's top-left
//! corner); the helpers here translate between those and screen positions.

use pdf_annotator_core::{Brush, Color, LineCap, Stroke, StrokeCanvas, SurfacePoint};

/// Screen position to surface-local point
pub fn to_surface_point(pos: egui::Pos2, origin: egui::Pos2) -> SurfacePoint {
    SurfacePoint::new(pos.x - origin.x, pos.y - origin.y)
}

fn to_screen(point: &SurfacePoint, origin: egui::Pos2) -> egui::Pos2 {
    egui::pos2(origin.x + point.x, origin.y + point.y)
}

/// Brush color with the brush opacity folded into alpha
pub fn brush_color32(brush: &Brush) -> egui::Color32 {
    let alpha = (brush.color.a as f32 * brush.opacity).round() as u8;
    egui::Color32::from_rgba_unmultiplied(brush.color.r, brush.color.g, brush.color.b, alpha)
}

/// Color as the `[r, g, b]` array egui's color button edits
pub fn to_rgb(color: Color) -> [u8; 3] {
    [color.r, color.g, color.b]
}

pub fn from_rgb(rgb: [u8; 3]) -> Color {
    Color::rgb(rgb[0], rgb[1], rgb[2])
}

/// Paint committed strokes and the stroke in progress, clipped to `rect`
pub fn paint(painter: &egui::Painter, rect: egui::Rect, canvas: &StrokeCanvas) {
    let painter = painter.with_clip_rect(rect);
    for stroke in canvas.strokes().iter().chain(canvas.active_stroke()) {
        paint_stroke(&painter, rect.min, stroke);
    }
}

fn paint_stroke(painter: &egui::Painter, origin: egui::Pos2, stroke: &Stroke) {
    painter.extend(stroke_shapes(stroke, origin));
}

/// Half-disc segments per round cap
const CAP_SEGMENTS: usize = 8;

fn stroke_shapes(stroke: &Stroke, origin: egui::Pos2) -> Vec<egui::Shape> {
    let brush = stroke.brush();
    let color = brush_color32(brush);
    let width = brush.width as f32;

    let points: Vec<egui::Pos2> = stroke
        .points()
        .iter()
        .map(|p| to_screen(p, origin))
        .collect();

    match points.as_slice() {
        [] => Vec::new(),
        [single] => {
            if brush.cap == LineCap::Square {
                let rect = egui::Rect::from_center_size(*single, egui::vec2(width, width));
                vec![egui::Shape::rect_filled(rect, 0.0, color)]
            } else {
                vec![egui::Shape::circle_filled(*single, width / 2.0, color)]
            }
        }
        line => {
            // egui paths end flat; round ends are half discs outside the line
            let mut shapes = Vec::with_capacity(3);
            if brush.cap == LineCap::Round {
                let last = line.len() - 1;
                shapes.push(half_disc(line[0], line[1], width / 2.0, color));
                shapes.push(half_disc(line[last], line[last - 1], width / 2.0, color));
            }
            shapes.push(egui::Shape::line(line.to_vec(), egui::Stroke::new(width, color)));
            shapes
        }
    }
}

/// Filled half disc on `end`, bulging away from `inner`
fn half_disc(end: egui::Pos2, inner: egui::Pos2, radius: f32, color: egui::Color32) -> egui::Shape {
    let outward = (end - inner).normalized();
    let across = outward.rot90();
    let points = (0..=CAP_SEGMENTS)
        .map(|i| {
            let angle = std::f32::consts::PI * i as f32 / CAP_SEGMENTS as f32;
            end + radius * (across * angle.cos() + outward * angle.sin())
        })
        .collect();
    egui::Shape::convex_polygon(points, color, egui::Stroke::NONE)
}

/// Feed the page response's pointer activity into the canvas
pub fn route_pointer(
    ctx: &egui::Context,
    response: &egui::Response,
    origin: egui::Pos2,
    canvas: &mut StrokeCanvas,
) {
    if response.drag_started() {
        let press = ctx.input(|i| i.pointer.press_origin());
        if let Some(press) = press.or(response.interact_pointer_pos()) {
            canvas.pointer_down(to_surface_point(press, origin));
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            canvas.pointer_move(to_surface_point(pos, origin));
        }
    }

    if response.drag_stopped() {
        canvas.pointer_up();
    }

    // A click without drag: a dot, or a single erase
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            canvas.pointer_down(to_surface_point(pos, origin));
            canvas.pointer_up();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_point_is_relative_to_page_origin() {
        let point = to_surface_point(egui::pos2(130.0, 75.5), egui::pos2(100.0, 50.0));
        assert_eq!(point, SurfacePoint::new(30.0, 25.5));
        assert_eq!(to_screen(&point, egui::pos2(100.0, 50.0)), egui::pos2(130.0, 75.5));
    }

    #[test]
    fn test_brush_color_applies_opacity() {
        let brush = Brush {
            color: Color::YELLOW,
            opacity: 0.5,
            ..Brush::default()
        };
        assert_eq!(
            brush_color32(&brush),
            egui::Color32::from_rgba_unmultiplied(255, 255, 0, 128)
        );

        let opaque = Brush {
            color: Color::RED,
            ..Brush::default()
        };
        assert_eq!(brush_color32(&opaque), egui::Color32::RED);
    }

    fn two_point_stroke(cap: LineCap) -> Stroke {
        let brush = Brush {
            width: 20,
            cap,
            ..Brush::default()
        };
        let mut stroke = Stroke::start(SurfacePoint::new(10.0, 50.0), brush);
        stroke.extend_to(SurfacePoint::new(90.0, 50.0));
        stroke
    }

    #[test]
    fn test_round_cap_adds_half_disc_at_each_end() {
        let shapes = stroke_shapes(&two_point_stroke(LineCap::Round), egui::Pos2::ZERO);
        assert_eq!(shapes.len(), 3);

        let egui::Shape::Path(start_cap) = &shapes[0] else {
            panic!("expected a polygon cap, got {:?}", shapes[0]);
        };
        for point in &start_cap.points {
            assert!((point.distance(egui::pos2(10.0, 50.0)) - 10.0).abs() < 0.01);
            // Bulges out past the start, not back over the line
            assert!(point.x <= 10.0 + 0.01);
        }

        let egui::Shape::Path(end_cap) = &shapes[1] else {
            panic!("expected a polygon cap, got {:?}", shapes[1]);
        };
        assert!(end_cap.points.iter().all(|p| p.x >= 90.0 - 0.01));
    }

    #[test]
    fn test_butt_cap_is_a_plain_line() {
        let shapes = stroke_shapes(&two_point_stroke(LineCap::Butt), egui::Pos2::ZERO);
        assert_eq!(shapes.len(), 1);
        assert!(matches!(shapes[0], egui::Shape::LineSegment { .. } | egui::Shape::Path(_)));
    }

    #[test]
    fn test_rgb_conversion() {
        assert_eq!(to_rgb(Color::YELLOW), [255, 255, 0]);
        assert_eq!(from_rgb([255, 0, 0]), Color::RED);
    }
}
