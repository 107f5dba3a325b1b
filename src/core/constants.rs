//! Engine-wide constants.

/// Square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom level the controller will settle on.
pub const MIN_ZOOM: u8 = 2;

/// Highest zoom level the controller will settle on.
pub const MAX_ZOOM: u8 = 20;

/// Latitude limit of the square Web-Mercator world (atan(sinh(π))).
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Meters per degree of latitude used by the flat-earth radius approximation.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Default view: Atlanta.
pub const DEFAULT_CENTER: (f64, f64) = (33.7490, -84.3880);

/// Default zoom level.
pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom used when centering on a geocoded job address.
pub const JOB_ZOOM: u8 = 16;

/// Zoom used when centering on the user's own location.
pub const USER_LOCATION_ZOOM: u8 = 15;

/// Key of the base layer used when a requested key is unknown.
pub const DEFAULT_BASE_LAYER: &str = "street";

/// Marker icon default size.
pub const MARKER_ICON_SIZE: (u32, u32) = (25, 41);

/// Anchor inside the icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (12, 41);
