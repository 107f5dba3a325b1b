pub mod builder;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod viewport;

pub use builder::MapEngineBuilder;
pub use config::{MapOptions, ServiceEndpoints};
pub use geo::{LatLng, Point, TileCoord};
pub use map::{Container, MapEngine};
pub use viewport::ViewState;
