use crate::{
    core::{geo::LatLng, viewport::ViewState},
    layers::base::{LayerProperties, LayerType, Overlay, OverlaySurface},
    rendering::context::{Canvas, Color, LineRenderStyle, ShapeRenderStyle},
};
use serde::{Deserialize, Serialize};

/// A straight two-point route; waypoints are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: LatLng,
    pub to: LatLng,
}

/// Draws the active route as a line between its endpoints.
pub struct RouteLayer {
    properties: LayerProperties,
    route: Option<Route>,
    canvas: Canvas,
    view: Option<ViewState>,
    initialized: bool,
    line_style: LineRenderStyle,
    endpoint_style: ShapeRenderStyle,
}

impl RouteLayer {
    pub fn new(id: String, name: String) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Route).with_z_index(20);
        Self {
            properties,
            route: None,
            canvas: Canvas::default(),
            view: None,
            initialized: false,
            line_style: LineRenderStyle {
                color: Color::rgb(0, 170, 255),
                width: 4.0,
                dash_pattern: vec![10.0, 6.0],
            },
            endpoint_style: ShapeRenderStyle {
                fill_color: Color::WHITE,
                stroke_color: Color::rgb(0, 170, 255),
                stroke_width: 2.0,
            },
        }
    }

    /// Replaces the active route
    pub fn set_route(&mut self, from: LatLng, to: LatLng) {
        self.route = Some(Route { from, to });
        self.redraw();
    }

    pub fn clear_route(&mut self) {
        self.route = None;
        self.redraw();
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    fn redraw(&mut self) {
        self.canvas.clear();
        let (Some(route), Some(view)) = (self.route, self.view) else {
            return;
        };
        if !self.initialized {
            return;
        }

        let from = view.lat_lng_to_screen(&route.from);
        let to = view.lat_lng_to_screen(&route.to);
        self.canvas.line(&[from, to], &self.line_style);
        self.canvas.circle(from, 6.0, &self.endpoint_style);
        self.canvas.circle(to, 6.0, &self.endpoint_style);
    }
}

impl Default for RouteLayer {
    fn default() -> Self {
        Self::new("route".to_string(), "Route".to_string())
    }
}

impl Overlay for RouteLayer {
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

    fn ready_layer(view: &ViewState) -> RouteLayer {
        let mut layer = RouteLayer::default();
        layer.init(&OverlayLayer::new(view.size));
        layer.on_view_changed(view);
        layer
    }

    #[test]
    fn test_route_drawn_between_endpoints() {
        let view = ViewState::new(LatLng::new(33.749, -84.388), 13, Point::new(800.0, 600.0));
        let mut layer = ready_layer(&view);
        assert!(layer.canvas().is_empty());

        layer.set_route(LatLng::new(33.749, -84.388), LatLng::new(33.76, -84.37));
        let DrawCommand::Line { points, .. } = &layer.canvas().commands()[0] else {
            panic!("expected the route line first");
        };
        assert_eq!(points.len(), 2);
        assert!((points[0].x - 400.0).abs() < 1e-6 && (points[0].y - 300.0).abs() < 1e-6);
        assert!(points[1].x > 400.0 && points[1].y < 300.0);
        assert_eq!(layer.canvas().commands().len(), 3);
    }

    #[test]
    fn test_route_follows_view() {
        let view = ViewState::new(LatLng::new(33.749, -84.388), 13, Point::new(800.0, 600.0));
        let mut layer = ready_layer(&view);
        layer.set_route(LatLng::new(33.749, -84.388), LatLng::new(33.76, -84.37));

        let mut panned = view;
        panned.pan_by(Point::new(50.0, 0.0));
        layer.on_view_changed(&panned);
        let DrawCommand::Line { points, .. } = &layer.canvas().commands()[0] else {
            panic!("expected the route line first");
        };
        assert!((points[0].x - 450.0).abs() < 1e-6);
    }

    #[test]
    fn test_clear_route_wipes_canvas() {
        let view = ViewState::default();
        let mut layer = ready_layer(&view);
        layer.set_route(LatLng::new(33.7, -84.4), LatLng::new(33.8, -84.3));
        layer.clear_route();
        assert!(layer.route().is_none());
        assert!(layer.canvas().is_empty());
    }

    #[test]
    fn test_uninitialized_layer_draws_nothing() {
        let mut layer = RouteLayer::default();
        layer.set_route(LatLng::new(33.7, -84.4), LatLng::new(33.8, -84.3));
        assert!(layer.canvas().is_empty());
        assert!(!layer.is_initialized());
    }
}
