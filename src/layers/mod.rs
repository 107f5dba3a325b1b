#[macro_use]
pub mod macros;

pub mod base;
pub mod manager;
pub mod marker;
pub mod radius;
pub mod route;
pub mod tile;
pub mod weather;

pub use base::{LayerProperties, LayerType, Overlay, OverlayLayer, OverlaySurface};
pub use manager::OverlayManager;
pub use marker::{Marker, MarkerElement, MarkerKind, MarkerLayer};
pub use radius::{RadiusCircle, RadiusLayer};
pub use route::{Route, RouteLayer};
pub use tile::TileLayer;
pub use weather::{WeatherKind, WeatherLayer};
