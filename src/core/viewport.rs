use crate::core::{
    constants::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE},
    geo::{self, LatLng, Point},
};
use serde::{Deserialize, Serialize};

/// The single source of truth for what is visible: center, zoom, the
/// not-yet-folded drag offset and the viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current integer zoom level
    pub zoom: u8,
    /// Accumulated drag in pixels that has not been folded into `center`
    pub pan_offset: Point,
    /// The size of the viewport in pixels
    pub size: Point,
}

impl ViewState {
    /// Creates a new view state with clamped zoom and normalized center
    pub fn new(center: LatLng, zoom: u8, size: Point) -> Self {
        Self {
            center: center.normalized(),
            zoom: Self::clamp_zoom(zoom as i32),
            pan_offset: Point::default(),
            size,
        }
    }

    /// Clamps any requested zoom into the supported range
    pub fn clamp_zoom(zoom: i32) -> u8 {
        zoom.clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8
    }

    /// World pixel position of `center` at the current zoom
    pub fn center_world(&self) -> Point {
        geo::project(&self.center, self.zoom)
    }

    /// World pixel under the middle of the viewport, accounting for the drag offset
    pub fn focus_world(&self) -> Point {
        self.center_world().subtract(&self.pan_offset)
    }

    /// World pixel of the viewport's top-left corner
    pub fn top_left_world(&self) -> Point {
        self.focus_world().subtract(&self.size.multiply(0.5))
    }

    /// World pixel of the viewport's bottom-right corner
    pub fn bottom_right_world(&self) -> Point {
        self.focus_world().add(&self.size.multiply(0.5))
    }

    /// Geographic location currently under the middle of the viewport
    pub fn visible_center(&self) -> LatLng {
        geo::unproject(&self.focus_world(), self.zoom)
    }

    /// Converts a world pixel into a screen pixel (viewport relative)
    pub fn world_to_screen(&self, world: &Point) -> Point {
        world.subtract(&self.top_left_world())
    }

    /// Converts a screen pixel into a world pixel
    pub fn screen_to_world(&self, screen: &Point) -> Point {
        screen.add(&self.top_left_world())
    }

    /// Converts a coordinate to a screen pixel.
    ///
    /// The world repeats horizontally, so the copy of `lat_lng` nearest to the
    /// viewport is chosen.
    pub fn lat_lng_to_screen(&self, lat_lng: &LatLng) -> Point {
        let mut world = geo::project(&LatLng::new(LatLng::clamp_lat(lat_lng.lat), lat_lng.lng), self.zoom);
        let span = geo::world_size(self.zoom);
        let focus = self.focus_world();
        let dx = world.x - focus.x;
        world.x -= (dx / span).round() * span;
        self.world_to_screen(&world)
    }

    /// Converts a screen pixel back to a coordinate
    pub fn screen_to_lat_lng(&self, screen: &Point) -> LatLng {
        let world = self.screen_to_world(screen);
        let lat_lng = geo::unproject(&world, self.zoom);
        LatLng::new(lat_lng.lat, LatLng::wrap_lng(lat_lng.lng))
    }

    /// Replaces the center and discards any pending drag offset
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center.normalized();
        self.pan_offset = Point::default();
    }

    /// Adds a drag delta to the pan offset, folding it into the center once
    /// either axis exceeds one tile. Non-finite deltas are ignored.
    pub fn pan_by(&mut self, delta: Point) {
        if !delta.is_finite() {
            log::warn!("ignoring non-finite pan delta {:?}", delta);
            return;
        }
        self.pan_offset = self.pan_offset.add(&delta);
        self.fold_if_needed();
    }

    /// Folds the offset into the center if it has drifted past one tile.
    /// Returns whether a fold happened.
    pub fn fold_if_needed(&mut self) -> bool {
        let threshold = TILE_SIZE as f64;
        if self.pan_offset.x.abs() > threshold || self.pan_offset.y.abs() > threshold {
            self.fold();
            true
        } else {
            false
        }
    }

    /// Moves the center to the point currently under the viewport middle and
    /// zeroes the offset. The visible picture does not change unless the
    /// drag went past the poles, in which case the view stops at the edge.
    pub fn fold(&mut self) {
        let focus = self.focus_world();
        let y = focus.y.clamp(0.0, geo::world_size(self.zoom));
        let lat = geo::world_y_to_lat(y, self.zoom);
        let lng = geo::world_x_to_lng(focus.x, self.zoom);
        self.center = LatLng::new(lat, lng).normalized();
        self.pan_offset = Point::default();
    }

    /// Changes zoom keeping the world point under `anchor` (a screen pixel)
    /// fixed. Without an anchor the viewport middle stays fixed.
    ///
    /// Returns `false` when the clamped zoom equals the current one or the
    /// anchor is not a finite point.
    pub fn zoom_to(&mut self, zoom: i32, anchor: Option<Point>) -> bool {
        if let Some(anchor) = anchor.filter(|a| !a.is_finite()) {
            log::warn!("ignoring zoom around non-finite anchor {:?}", anchor);
            return false;
        }
        let new_zoom = Self::clamp_zoom(zoom);
        if new_zoom == self.zoom {
            return false;
        }

        let scale = 2_f64.powi(new_zoom as i32 - self.zoom as i32);
        let from_middle = anchor
            .map(|a| a.subtract(&self.size.multiply(0.5)))
            .unwrap_or_default();

        // With c = center world, o = offset, a = anchor from middle:
        // the point under the anchor is (c - o + a). Scaling the world by k
        // keeps it under the anchor iff o' = o*k + a*(1 - k).
        self.pan_offset = self
            .pan_offset
            .multiply(scale)
            .add(&from_middle.multiply(1.0 - scale));
        self.zoom = new_zoom;
        self.fold_if_needed();
        true
    }

    /// Sets the viewport size in pixels
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        use crate::core::constants::{DEFAULT_CENTER, DEFAULT_ZOOM};
        Self::new(
            LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            DEFAULT_ZOOM,
            Point::new(800.0, 600.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlanta() -> ViewState {
        ViewState::new(LatLng::new(33.749, -84.388), 13, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_view_creation_clamps() {
        let view = ViewState::new(LatLng::new(89.9, 200.0), 30, Point::new(800.0, 600.0));
        assert_eq!(view.zoom, MAX_ZOOM);
        assert!(view.center.lat <= crate::core::constants::MAX_LATITUDE);
        assert!((view.center.lng - -160.0).abs() < 1e-9);
    }

    #[test]
    fn test_center_maps_to_viewport_middle() {
        let view = atlanta();
        let screen = view.lat_lng_to_screen(&view.center);
        assert!((screen.x - 400.0).abs() < 1e-6);
        assert!((screen.y - 300.0).abs() < 1e-6);

        let back = view.screen_to_lat_lng(&Point::new(400.0, 300.0));
        assert!((back.lat - 33.749).abs() < 1e-9);
        assert!((back.lng - -84.388).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_content_with_drag() {
        let mut view = atlanta();
        let before = view.lat_lng_to_screen(&view.center);
        view.pan_by(Point::new(40.0, -25.0));
        let after = view.lat_lng_to_screen(&view.center);
        assert!((after.x - before.x - 40.0).abs() < 1e-6);
        assert!((after.y - before.y + 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_fold_preserves_picture() {
        let mut view = atlanta();
        let landmark = LatLng::new(33.76, -84.40);
        view.pan_by(Point::new(200.0, 120.0));
        let before = view.lat_lng_to_screen(&landmark);
        view.pan_by(Point::new(100.0, 0.0));
        assert!(view.pan_offset.is_zero());
        let expected = before.add(&Point::new(100.0, 0.0));
        let after = view.lat_lng_to_screen(&landmark);
        assert!(after.distance_to(&expected) < 1e-6);
    }

    #[test]
    fn test_zoom_noop_when_clamped() {
        let mut view = atlanta();
        view.zoom = MAX_ZOOM;
        assert!(!view.zoom_to(25, None));
        assert_eq!(view.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut view = atlanta();
        let anchor = Point::new(610.0, 95.0);
        let under = view.screen_to_lat_lng(&anchor);
        assert!(view.zoom_to(14, Some(anchor)));
        let after = view.lat_lng_to_screen(&under);
        assert!(after.distance_to(&anchor) < 1.0);
        assert!(view.pan_offset.x.abs() <= TILE_SIZE as f64);
        assert!(view.pan_offset.y.abs() <= TILE_SIZE as f64);
    }

    #[test]
    fn test_non_finite_input_leaves_view_alone() {
        let mut view = atlanta();
        view.pan_by(Point::new(30.0, 0.0));
        let before = view;

        assert!(!view.zoom_to(14, Some(Point::new(f64::NAN, 300.0))));
        view.pan_by(Point::new(f64::INFINITY, 10.0));
        view.pan_by(Point::new(5.0, f64::NAN));
        assert_eq!(view, before);
    }

    #[test]
    fn test_marker_copy_nearest_viewport() {
        let view = ViewState::new(LatLng::new(0.0, 179.0), 3, Point::new(800.0, 600.0));
        let screen = view.lat_lng_to_screen(&LatLng::new(0.0, -179.0));
        // Two degrees east of center, not a whole world away
        assert!(screen.x > 400.0 && screen.x < 450.0);
    }
}
