//! Prelude module for common timbermap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use timbermap::prelude::*;`

pub use crate::core::{
    builder::MapEngineBuilder,
    config::{MapOptions, ServiceEndpoints},
    geo::{LatLng, Point, TileCoord},
    map::{Container, MapEngine},
    viewport::ViewState,
};

pub use crate::layers::{
    base::{LayerType, Overlay, OverlayLayer, OverlaySurface},
    manager::OverlayManager,
    marker::{Marker, MarkerKind, MarkerLayer},
    radius::RadiusLayer,
    route::RouteLayer,
    tile::TileLayer,
    weather::{WeatherKind, WeatherLayer},
};

pub use crate::input::{
    events::{EventHandled, InputEvent, TouchEventType, TouchPoint},
    handler::{Action, InputHandler},
};

pub use crate::tiles::{
    grid::{TileGrid, TilePlacement},
    source::{BaseLayers, TileSource, UrlTemplate},
};

pub use crate::rendering::context::{Canvas, Color, DrawCommand};

pub use crate::services::{
    AddressIntel, CurrentWeather, DirectionsProvider, Place, ServiceClient, SiteIntel,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::services::LookupTracker;

pub use crate::ui::tabs::PanelTabs;

#[cfg(feature = "egui")]
pub use crate::ui::widget::{MapWidget, MapWidgetExt};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
