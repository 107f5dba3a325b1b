use crate::core::constants::{MAX_LATITUDE, METERS_PER_DEGREE, TILE_SIZE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        if (-180.0..=180.0).contains(&lng) {
            return lng;
        }
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }

    /// Clamps latitude to the drawable Mercator band
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Returns a copy clamped/wrapped into the range the engine can display.
    pub fn normalized(&self) -> Self {
        Self::new(Self::clamp_lat(self.lat), Self::wrap_lng(self.lng))
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or world pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Width (and height) of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE as f64 * 2_f64.powi(zoom as i32)
}

/// Number of tiles along one axis at `zoom`.
pub fn tiles_per_axis(zoom: u8) -> i64 {
    1_i64 << zoom
}

/// Linear map of longitude over [-180, 180] onto [0, world_size].
pub fn lng_to_world_x(lng: f64, zoom: u8) -> f64 {
    (lng + 180.0) / 360.0 * world_size(zoom)
}

/// Spherical Web-Mercator vertical projection.
///
/// Infinite at exactly ±90°; callers clamp with [`LatLng::clamp_lat`] first.
pub fn lat_to_world_y(lat: f64, zoom: u8) -> f64 {
    let sin = lat.to_radians().sin();
    (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * world_size(zoom)
}

/// Inverse of [`lng_to_world_x`].
pub fn world_x_to_lng(x: f64, zoom: u8) -> f64 {
    x / world_size(zoom) * 360.0 - 180.0
}

/// Inverse of [`lat_to_world_y`].
pub fn world_y_to_lat(y: f64, zoom: u8) -> f64 {
    let n = PI - 2.0 * PI * y / world_size(zoom);
    n.sinh().atan().to_degrees()
}

/// Projects a coordinate into world pixels at `zoom`.
pub fn project(lat_lng: &LatLng, zoom: u8) -> Point {
    Point::new(
        lng_to_world_x(lat_lng.lng, zoom),
        lat_to_world_y(lat_lng.lat, zoom),
    )
}

/// Unprojects world pixels back into a coordinate at `zoom`.
pub fn unproject(point: &Point, zoom: u8) -> LatLng {
    LatLng::new(world_y_to_lat(point.y, zoom), world_x_to_lng(point.x, zoom))
}

/// Approximate on-screen radius of a circle of `meters` around latitude `lat`.
///
/// Uses a flat-earth meters to degrees conversion, so it is only meaningful
/// for small radii.
pub fn meters_to_pixels(lat: f64, meters: f64, zoom: u8) -> f64 {
    let lat = LatLng::clamp_lat(lat);
    let degrees = meters / METERS_PER_DEGREE;
    let edge = LatLng::clamp_lat(lat + degrees);
    (lat_to_world_y(lat, zoom) - lat_to_world_y(edge, zoom)).abs()
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Builds a coordinate from raw grid indices.
    ///
    /// `x` wraps around the world horizontally; a `y` above the north edge or
    /// below the south edge has no tile and yields `None`.
    pub fn wrapped(x: i64, y: i64, z: u8) -> Option<Self> {
        let n = tiles_per_axis(z);
        if y < 0 || y >= n {
            return None;
        }
        Some(Self::new(x.rem_euclid(n) as u32, y as u32, z))
    }

    /// Checks if the tile is valid for its zoom level
    pub fn is_valid(&self) -> bool {
        let max_coord = tiles_per_axis(self.z);
        (self.x as i64) < max_coord && (self.y as i64) < max_coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_round_trip() {
        for zoom in 2..=20u8 {
            for lng in [-179.999, -84.388, -0.5, 0.0, 12.34567, 179.999] {
                let back = world_x_to_lng(lng_to_world_x(lng, zoom), zoom);
                assert!((back - lng).abs() < 1e-9, "zoom {} lng {} -> {}", zoom, lng, back);
            }
        }
    }

    #[test]
    fn test_latitude_round_trip() {
        for zoom in 2..=20u8 {
            for lat in [-84.99, -45.0, -0.001, 0.0, 33.749, 84.99] {
                let back = world_y_to_lat(lat_to_world_y(lat, zoom), zoom);
                assert!((back - lat).abs() < 1e-9, "zoom {} lat {} -> {}", zoom, lat, back);
            }
        }
    }

    #[test]
    fn test_world_edges() {
        assert_eq!(lng_to_world_x(-180.0, 2), 0.0);
        assert_eq!(lng_to_world_x(180.0, 2), world_size(2));
        assert!((lat_to_world_y(0.0, 3) - world_size(3) / 2.0).abs() < 1e-9);
        assert!(lat_to_world_y(MAX_LATITUDE, 2).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(LatLng::wrap_lng(10.0), 10.0);
        assert!((LatLng::wrap_lng(190.0) - -170.0).abs() < 1e-9);
        assert!((LatLng::wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((LatLng::wrap_lng(540.0) - -180.0).abs() < 1e-9);
    }

    #[test]
    fn test_tile_wrapping() {
        assert_eq!(TileCoord::wrapped(-1, 0, 3), Some(TileCoord::new(7, 0, 3)));
        assert_eq!(TileCoord::wrapped(8, 2, 3), Some(TileCoord::new(0, 2, 3)));
        assert_eq!(TileCoord::wrapped(0, -1, 3), None);
        assert_eq!(TileCoord::wrapped(0, 8, 3), None);
        assert!(TileCoord::new(7, 7, 3).is_valid());
        assert!(!TileCoord::new(8, 0, 3).is_valid());
    }

    #[test]
    fn test_meters_to_pixels_scales_with_zoom() {
        let low = meters_to_pixels(33.749, 200.0, 13);
        let high = meters_to_pixels(33.749, 200.0, 14);
        assert!(low > 0.0);
        assert!((high / low - 2.0).abs() < 1e-6);
    }
}
