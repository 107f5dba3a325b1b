//! # timbermap
//!
//! A small slippy-map engine for a tree-service site: Web-Mercator tiles,
//! drag and wheel navigation, and overlays for the job site, nearby stores,
//! routes, work-area radius and weather.
//!
//! The engine is headless. [`MapEngine`] keeps the view state, computes which
//! tiles cover the viewport and tells overlays when the view changes; painting
//! is done by the egui widget behind the `egui` feature, or by any other
//! renderer reading [`MapEngine::tiles`] and each overlay's surface.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod services;
pub mod tiles;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapEngineBuilder,
    config::MapOptions,
    geo::{LatLng, Point, TileCoord},
    map::{Container, MapEngine},
    viewport::ViewState,
};

pub use layers::{
    base::{Overlay, OverlayLayer, OverlaySurface},
    marker::MarkerLayer,
    radius::RadiusLayer,
    route::RouteLayer,
    weather::{WeatherKind, WeatherLayer},
};

pub use input::{events::InputEvent, handler::InputHandler};

pub use tiles::{grid::TileGrid, source::TileSource};

pub use services::ServiceClient;

#[cfg(feature = "egui")]
pub use ui::widget::MapWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
