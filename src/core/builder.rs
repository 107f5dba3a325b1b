//! Map builder for fluent API configuration
//!
//! `MapEngineBuilder` collects options and overlays and produces a validated
//! [`MapEngine`]. Overlays given to the builder are registered before the
//! engine is mounted, so they are bound by [`MapEngine::init`].

use crate::{
    core::{
        config::{MapOptions, ServiceEndpoints},
        geo::LatLng,
        map::MapEngine,
    },
    layers::{
        base::Overlay, marker::MarkerLayer, radius::RadiusLayer, route::RouteLayer,
        weather::WeatherLayer,
    },
    tiles::source::UrlTemplate,
    Result,
};

/// Builder for creating and configuring MapEngine instances
pub struct MapEngineBuilder {
    options: MapOptions,
    overlays: Vec<Box<dyn Overlay>>,
}

impl MapEngineBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            options: MapOptions::default(),
            overlays: Vec::new(),
        }
    }

    /// Start from options loaded elsewhere, e.g. [`MapOptions::from_path`]
    pub fn with_options(mut self, options: MapOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: u8) -> Self {
        self.options.default_center = center;
        self.options.default_zoom = zoom;
        self
    }

    /// Set the base layer active at startup
    pub fn with_base_layer(mut self, key: impl Into<String>) -> Self {
        self.options.base_layer = key.into();
        self
    }

    /// Add or replace a tile source
    pub fn with_tile_source(mut self, key: impl Into<String>, template: UrlTemplate) -> Self {
        self.options.tile_sources.insert(key.into(), template);
        self
    }

    pub fn with_services(mut self, services: ServiceEndpoints) -> Self {
        self.options.services = services;
        self
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlays.push(overlay);
        self
    }

    /// Weather, radius, route and marker overlays with their default ids
    pub fn with_standard_overlays(self) -> Self {
        self.with_overlay(Box::new(WeatherLayer::default()))
            .with_overlay(Box::new(RadiusLayer::default()))
            .with_overlay(Box::new(RouteLayer::default()))
            .with_overlay(Box::new(MarkerLayer::default()))
    }

    /// Validates the options and creates the engine
    pub fn build(self) -> Result<MapEngine> {
        self.options.validate()?;

        let mut engine = MapEngine::new(self.options);
        for overlay in self.overlays {
            engine.add_overlay(overlay);
        }
        Ok(engine)
    }
}

impl Default for MapEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
