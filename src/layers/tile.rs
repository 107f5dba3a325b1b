use crate::{
    core::{geo::Point, viewport::ViewState},
    layers::base::{LayerProperties, LayerType},
    tiles::{
        grid::{TileGrid, TilePlacement},
        source::TileSource,
    },
};

/// The engine's tile child layer: the tiles placed by the last render.
///
/// Image loading is left to whoever paints the placements. A tile whose
/// image fails to load stays blank; there is no retry and no fallback source.
pub struct TileLayer {
    properties: LayerProperties,
    size: Point,
    tiles: Vec<TilePlacement>,
}

impl TileLayer {
    pub fn new(size: Point) -> Self {
        Self {
            properties: LayerProperties::new(
                "tile-layer".to_string(),
                "Tiles".to_string(),
                LayerType::Tile,
            ),
            size,
            tiles: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.properties.id
    }

    /// Clears the layer and places the tiles for `view`.
    pub fn rebuild(&mut self, view: &ViewState, source: &dyn TileSource) -> &[TilePlacement] {
        self.size = view.size;
        self.tiles = TileGrid::compute(view, source);
        log::debug!(
            "placed {} tiles at zoom {} ({}x{})",
            self.tiles.len(),
            view.zoom,
            self.size.x,
            self.size.y
        );
        &self.tiles
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn tiles(&self) -> &[TilePlacement] {
        &self.tiles
    }

    pub fn size(&self) -> Point {
        self.size
    }
}
