use crate::core::{constants::DEFAULT_BASE_LAYER, geo::TileCoord};
use crate::prelude::HashMap;
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// A URL template with literal `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub const OPENSTREETMAP: &'static str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn openstreetmap() -> Self {
        Self::new(Self::OPENSTREETMAP)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TileSource for UrlTemplate {
    fn url(&self, coord: TileCoord) -> String {
        self.0
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

/// Keyed set of base-layer tile sources with one active entry.
///
/// Unknown keys resolve to the `street` source (or, failing that, plain
/// OpenStreetMap) so a bad key never leaves the map without tiles.
#[derive(Debug, Clone)]
pub struct BaseLayers {
    sources: HashMap<String, UrlTemplate>,
    active: String,
    fallback: UrlTemplate,
}

impl BaseLayers {
    pub fn new(sources: HashMap<String, UrlTemplate>, active: impl Into<String>) -> Self {
        let fallback = sources
            .get(DEFAULT_BASE_LAYER)
            .cloned()
            .unwrap_or_else(UrlTemplate::openstreetmap);
        Self {
            sources,
            active: active.into(),
            fallback,
        }
    }

    /// The four layers the site offers. Only `street` has its own imagery;
    /// the rest point at the same OSM tiles until real sources are wired in.
    pub fn standard() -> Self {
        let mut sources = HashMap::default();
        for key in ["street", "satellite", "terrain", "trails"] {
            sources.insert(key.to_string(), UrlTemplate::openstreetmap());
        }
        Self::new(sources, DEFAULT_BASE_LAYER)
    }

    /// Key of the active layer, as last requested
    pub fn active_key(&self) -> &str {
        &self.active
    }

    /// Switches the active layer; returns whether the key is registered.
    pub fn set_active(&mut self, key: &str) -> bool {
        self.active = key.to_string();
        self.sources.contains_key(key)
    }

    /// Source for the active key, or the fallback
    pub fn active(&self) -> &UrlTemplate {
        self.sources.get(&self.active).unwrap_or(&self.fallback)
    }

    pub fn insert(&mut self, key: impl Into<String>, template: UrlTemplate) {
        self.sources.insert(key.into(), template);
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for BaseLayers {
    fn default() -> Self {
        Self::standard()
    }
}

impl TileSource for BaseLayers {
    fn url(&self, coord: TileCoord) -> String {
        self.active().url(coord)
    }
}
