//! Stylised weather overlays.
//!
//! No weather data is modelled here: each enabled kind paints a decorative
//! pattern that depends only on the viewport size.

use crate::{
    core::{geo::Point, viewport::ViewState},
    layers::base::{LayerProperties, LayerType, Overlay, OverlaySurface},
    rendering::context::{Canvas, Color, LineRenderStyle, ShapeRenderStyle},
    MapError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Temperature,
    Radar,
    Storms,
    Wind,
}

impl WeatherKind {
    pub const ALL: [WeatherKind; 4] = [
        WeatherKind::Radar,
        WeatherKind::Wind,
        WeatherKind::Storms,
        WeatherKind::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherKind::Radar => "radar",
            WeatherKind::Wind => "wind",
            WeatherKind::Storms => "storms",
            WeatherKind::Temperature => "temperature",
        }
    }
}

impl std::fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeatherKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radar" => Ok(WeatherKind::Radar),
            "wind" => Ok(WeatherKind::Wind),
            "storms" => Ok(WeatherKind::Storms),
            "temperature" => Ok(WeatherKind::Temperature),
            other => Err(MapError::ParseError(format!("unknown weather layer '{}'", other))),
        }
    }
}

/// Toggleable weather visuals sharing one canvas.
///
/// Kinds are painted in `Ord` order so the temperature wash sits underneath
/// the radar, storm and wind marks.
pub struct WeatherLayer {
    properties: LayerProperties,
    enabled: BTreeSet<WeatherKind>,
    canvas: Canvas,
    initialized: bool,
}

impl WeatherLayer {
    pub fn new(id: String, name: String) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Weather).with_z_index(10);
        Self {
            properties,
            enabled: BTreeSet::new(),
            canvas: Canvas::default(),
            initialized: false,
        }
    }

    pub fn set_enabled(&mut self, kind: WeatherKind, enabled: bool) {
        let changed = if enabled {
            self.enabled.insert(kind)
        } else {
            self.enabled.remove(&kind)
        };
        if changed {
            log::debug!("weather layer {} -> {}", kind, enabled);
            self.redraw();
        }
    }

    pub fn toggle(&mut self, kind: WeatherKind) {
        let enabled = !self.is_enabled(kind);
        self.set_enabled(kind, enabled);
    }

    pub fn is_enabled(&self, kind: WeatherKind) -> bool {
        self.enabled.contains(&kind)
    }

    pub fn enabled(&self) -> impl Iterator<Item = WeatherKind> + '_ {
        self.enabled.iter().copied()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn redraw(&mut self) {
        self.canvas.clear();
        if !self.initialized {
            return;
        }
        let size = self.canvas.size();
        for kind in self.enabled.clone() {
            match kind {
                WeatherKind::Temperature => draw_temperature(&mut self.canvas, size),
                WeatherKind::Radar => draw_radar(&mut self.canvas, size),
                WeatherKind::Storms => draw_storms(&mut self.canvas, size),
                WeatherKind::Wind => draw_wind(&mut self.canvas, size),
            }
        }
    }
}

impl Default for WeatherLayer {
    fn default() -> Self {
        Self::new("weather".to_string(), "Weather".to_string())
    }
}

fn draw_temperature(canvas: &mut Canvas, size: Point) {
    const BANDS: [Color; 4] = [
        Color::rgba(255, 120, 60, 40),
        Color::rgba(255, 190, 80, 36),
        Color::rgba(120, 200, 255, 36),
        Color::rgba(60, 120, 255, 40),
    ];
    let band = size.y / BANDS.len() as f64;
    for (i, color) in BANDS.iter().enumerate() {
        let style = ShapeRenderStyle {
            fill_color: *color,
            stroke_color: Color::TRANSPARENT,
            stroke_width: 0.0,
        };
        canvas.rect(
            Point::new(0.0, band * i as f64),
            Point::new(size.x, band * (i + 1) as f64),
            &style,
        );
    }
}

fn draw_radar(canvas: &mut Canvas, size: Point) {
    let cells = [(0.3, 0.35, 0.18), (0.62, 0.55, 0.22), (0.45, 0.75, 0.12)];
    let scale = size.x.min(size.y);
    for (fx, fy, fr) in cells {
        let center = Point::new(size.x * fx, size.y * fy);
        for (ring, alpha) in [(1.0, 50), (0.6, 80), (0.3, 120)] {
            let style = ShapeRenderStyle {
                fill_color: Color::rgba(40, 200, 90, alpha),
                stroke_color: Color::TRANSPARENT,
                stroke_width: 0.0,
            };
            canvas.circle(center, scale * fr * ring, &style);
        }
    }
}

fn draw_storms(canvas: &mut Canvas, size: Point) {
    let style = ShapeRenderStyle {
        fill_color: Color::rgba(200, 30, 30, 30),
        stroke_color: Color::rgba(220, 40, 40, 200),
        stroke_width: 2.0,
    };
    let scale = size.x.min(size.y);
    for (fx, fy) in [(0.7, 0.25), (0.2, 0.7)] {
        canvas.circle(Point::new(size.x * fx, size.y * fy), scale * 0.08, &style);
    }
}

fn draw_wind(canvas: &mut Canvas, size: Point) {
    const SPACING: f64 = 80.0;
    const LENGTH: f64 = 28.0;
    let style = LineRenderStyle {
        color: Color::rgba(255, 255, 255, 170),
        width: 1.5,
        dash_pattern: Vec::new(),
    };
    // Fixed south-westerly flow
    let (dx, dy) = (LENGTH * 0.866, -LENGTH * 0.5);
    let mut y = SPACING / 2.0;
    while y < size.y {
        let mut x = SPACING / 2.0;
        while x < size.x {
            canvas.line(&[Point::new(x, y), Point::new(x + dx, y + dy)], &style);
            x += SPACING;
        }
        y += SPACING;
    }
}

impl Overlay for WeatherLayer {
    crate::impl_overlay_properties!(properties);
    crate::impl_canvas_init!();

    fn on_view_changed(&mut self, view: &ViewState) {
        if self.canvas.size() != view.size {
            self.canvas.resize(view.size);
        }
        self.redraw();
    }

    fn surface(&self) -> OverlaySurface<'_> {
        OverlaySurface::Canvas(&self.canvas)
    }
}
