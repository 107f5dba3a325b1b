//! Configuration for the map engine and the lookup services
//!
//! Everything here has a working default so a map can be created with
//! `MapOptions::default()`. Deployments that need other tile servers or
//! service mirrors load the same structure from JSON.

use crate::{
    core::{
        constants::{DEFAULT_BASE_LAYER, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM},
        geo::LatLng,
    },
    prelude::HashMap,
    tiles::source::{BaseLayers, UrlTemplate},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// Endpoints and identification for the HTTP lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    /// Nominatim search endpoint (geocoding and store search)
    pub nominatim: String,
    /// Overpass interpreter endpoint
    pub overpass: String,
    /// Open-Meteo forecast endpoint
    pub open_meteo: String,
    /// Sent as `User-Agent`; Nominatim rejects anonymous clients
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_secs: u64,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            nominatim: "https://nominatim.openstreetmap.org/search".to_string(),
            overpass: "https://overpass-api.de/api/interpreter".to_string(),
            open_meteo: "https://api.open-meteo.com/v1/forecast".to_string(),
            user_agent: concat!("timbermap/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Map construction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub default_center: LatLng,
    pub default_zoom: u8,
    /// Key into `tile_sources` used at startup
    pub base_layer: String,
    /// Tile URL templates by base-layer key
    pub tile_sources: BTreeMap<String, UrlTemplate>,
    pub services: ServiceEndpoints,
}

impl Default for MapOptions {
    fn default() -> Self {
        let tile_sources = ["street", "satellite", "terrain", "trails"]
            .into_iter()
            .map(|key| (key.to_string(), UrlTemplate::openstreetmap()))
            .collect();

        Self {
            default_center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            default_zoom: DEFAULT_ZOOM,
            base_layer: DEFAULT_BASE_LAYER.to_string(),
            tile_sources,
            services: ServiceEndpoints::default(),
        }
    }
}

impl MapOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading map options from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every template has its placeholders and that the startup
    /// layer and zoom make sense.
    pub fn validate(&self) -> Result<()> {
        if self.tile_sources.is_empty() {
            return Err(MapError::Config("no tile sources configured".to_string()));
        }
        for (key, template) in &self.tile_sources {
            for placeholder in ["{z}", "{x}", "{y}"] {
                if !template.as_str().contains(placeholder) {
                    return Err(MapError::Config(format!(
                        "tile source '{}' is missing {}",
                        key, placeholder
                    )));
                }
            }
        }
        if !self.tile_sources.contains_key(&self.base_layer) {
            return Err(MapError::Config(format!(
                "base layer '{}' has no tile source",
                self.base_layer
            )));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.default_zoom) {
            return Err(MapError::Config(format!(
                "default zoom {} outside {}..={}",
                self.default_zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        if !self.default_center.is_valid() {
            return Err(MapError::Config(format!(
                "default center {:?} is not a valid coordinate",
                self.default_center
            )));
        }
        Ok(())
    }

    /// Registry of the configured tile sources with the startup layer active
    pub fn base_layers(&self) -> BaseLayers {
        let sources: HashMap<String, UrlTemplate> = self
            .tile_sources
            .iter()
            .map(|(key, template)| (key.clone(), template.clone()))
            .collect();
        if !sources.contains_key(&self.base_layer) {
            log::warn!("base layer '{}' unknown, using fallback", self.base_layer);
        }
        BaseLayers::new(sources, self.base_layer.clone())
    }
}
