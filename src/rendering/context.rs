use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// RGBA color, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Same color with alpha scaled by `opacity` (0.0..=1.0)
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRenderStyle {
    pub color: Color,
    pub width: f32,
    pub dash_pattern: Vec<f32>,
}

impl Default for LineRenderStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0, 0, 0),
            width: 1.0,
            dash_pattern: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRenderStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
}

impl Default for ShapeRenderStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::TRANSPARENT,
            stroke_color: Color::rgb(0, 0, 0),
            stroke_width: 1.0,
        }
    }
}

/// Commands that can be issued to a canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Line {
        points: Vec<Point>,
        style: LineRenderStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        style: ShapeRenderStyle,
    },
    Rect {
        min: Point,
        max: Point,
        style: ShapeRenderStyle,
    },
}

/// A retained 2D drawing surface the size of the overlay layer.
///
/// Layers clear and redraw it on every view change; renderers replay the
/// queued commands in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    drawing_queue: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Resizes the surface; like an HTML canvas this also wipes it.
    pub fn resize(&mut self, size: Point) {
        self.width = size.x;
        self.height = size.y;
        self.drawing_queue.clear();
    }

    pub fn clear(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn line(&mut self, points: &[Point], style: &LineRenderStyle) {
        if points.len() < 2 {
            return;
        }
        self.drawing_queue.push(DrawCommand::Line {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    pub fn circle(&mut self, center: Point, radius: f64, style: &ShapeRenderStyle) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        self.drawing_queue.push(DrawCommand::Circle {
            center,
            radius,
            style: style.clone(),
        });
    }

    pub fn rect(&mut self, min: Point, max: Point, style: &ShapeRenderStyle) {
        self.drawing_queue.push(DrawCommand::Rect {
            min,
            max,
            style: style.clone(),
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn is_empty(&self) -> bool {
        self.drawing_queue.is_empty()
    }

    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shapes_skipped() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.line(&[Point::new(1.0, 1.0)], &LineRenderStyle::default());
        canvas.circle(Point::new(5.0, 5.0), 0.0, &ShapeRenderStyle::default());
        canvas.circle(Point::new(5.0, 5.0), f64::NAN, &ShapeRenderStyle::default());
        assert!(canvas.is_empty());

        canvas.circle(Point::new(5.0, 5.0), 3.0, &ShapeRenderStyle::default());
        assert_eq!(canvas.commands().len(), 1);
    }

    #[test]
    fn test_resize_wipes() {
        let mut canvas = Canvas::new(100.0, 100.0);
        canvas.rect(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &ShapeRenderStyle::default());
        canvas.resize(Point::new(200.0, 50.0));
        assert!(canvas.is_empty());
        assert_eq!(canvas.size(), Point::new(200.0, 50.0));
    }

    #[test]
    fn test_color_opacity() {
        assert_eq!(Color::rgb(1, 2, 3).with_opacity(0.5).a, 128);
        assert_eq!(Color::rgb(1, 2, 3).with_opacity(2.0).a, 255);
    }
}
