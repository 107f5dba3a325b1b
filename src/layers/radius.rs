use crate::{
    core::{
        geo::{self, LatLng},
        viewport::ViewState,
    },
    layers::base::{LayerProperties, LayerType, Overlay, OverlaySurface},
    rendering::context::{Canvas, Color, ShapeRenderStyle},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusCircle {
    pub center: LatLng,
    pub radius_meters: f64,
}

/// Work-area circle drawn around a point.
pub struct RadiusLayer {
    properties: LayerProperties,
    circle: Option<RadiusCircle>,
    canvas: Canvas,
    view: Option<ViewState>,
    initialized: bool,
    style: ShapeRenderStyle,
}

impl RadiusLayer {
    pub fn new(id: String, name: String) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Radius).with_z_index(15);
        Self {
            properties,
            circle: None,
            canvas: Canvas::default(),
            view: None,
            initialized: false,
            style: ShapeRenderStyle {
                fill_color: Color::rgba(0, 255, 136, 26),
                stroke_color: Color::rgb(0, 255, 136),
                stroke_width: 2.0,
            },
        }
    }

    /// Replaces the circle. Non-positive or non-finite radii clear it.
    pub fn set_radius(&mut self, center: LatLng, radius_meters: f64) {
        self.circle = (radius_meters.is_finite() && radius_meters > 0.0).then_some(RadiusCircle {
            center,
            radius_meters,
        });
        self.redraw();
    }

    pub fn clear_radius(&mut self) {
        self.circle = None;
        self.redraw();
    }

    pub fn circle(&self) -> Option<&RadiusCircle> {
        self.circle.as_ref()
    }

    /// Pixel radius of the circle in the last view seen
    pub fn pixel_radius(&self) -> Option<f64> {
        let (circle, view) = (self.circle?, self.view?);
        Some(geo::meters_to_pixels(circle.center.lat, circle.radius_meters, view.zoom))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn redraw(&mut self) {
        self.canvas.clear();
        if !self.initialized {
            return;
        }
        let (Some(circle), Some(view), Some(radius)) = (self.circle, self.view, self.pixel_radius())
        else {
            return;
        };
        let center = view.lat_lng_to_screen(&circle.center);
        self.canvas.circle(center, radius, &self.style);
    }
}

impl Default for RadiusLayer {
    fn default() -> Self {
        Self::new("radius".to_string(), "Radius".to_string())
    }
}

impl Overlay for RadiusLayer {
    crate::impl_overlay_properties!(properties);
    crate::impl_canvas_init!();

    fn on_view_changed(&mut self, view: &ViewState) {
        if self.canvas.size() != view.size {
            self.canvas.resize(view.size);
        }
        self.view = Some(*view);
        self.redraw();
    }

    fn surface(&self) -> OverlaySurface<'_> {
        OverlaySurface::Canvas(&self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::layers::base::OverlayLayer;
    use crate::rendering::context::DrawCommand;

    fn ready_layer(view: &ViewState) -> RadiusLayer {
        let mut layer = RadiusLayer::default();
        layer.init(&OverlayLayer::new(view.size));
        layer.on_view_changed(view);
        layer
    }

    #[test]
    fn test_circle_centered_on_point() {
        let view = ViewState::new(LatLng::new(33.749, -84.388), 15, Point::new(800.0, 600.0));
        let mut layer = ready_layer(&view);
        layer.set_radius(view.center, 200.0);

        let DrawCommand::Circle { center, radius, .. } = &layer.canvas().commands()[0] else {
            panic!("expected a circle");
        };
        assert!((center.x - 400.0).abs() < 1e-6 && (center.y - 300.0).abs() < 1e-6);
        // 200 m at zoom 15 is a few dozen pixels
        assert!(*radius > 20.0 && *radius < 100.0, "radius {}", radius);
    }

    #[test]
    fn test_radius_doubles_per_zoom() {
        let view = ViewState::new(LatLng::new(33.749, -84.388), 14, Point::new(800.0, 600.0));
        let mut layer = ready_layer(&view);
        layer.set_radius(view.center, 150.0);
        let low = layer.pixel_radius().expect("radius");

        let mut zoomed = view;
        zoomed.zoom_to(15, None);
        layer.on_view_changed(&zoomed);
        let high = layer.pixel_radius().expect("radius");
        assert!((high / low - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_radius_clears() {
        let view = ViewState::default();
        let mut layer = ready_layer(&view);
        layer.set_radius(view.center, 100.0);
        layer.set_radius(view.center, -5.0);
        assert!(layer.circle().is_none());
        assert!(layer.canvas().is_empty());
    }
}
