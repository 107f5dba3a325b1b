//! Visible tile computation.
//!
//! The grid is rebuilt from scratch for every render: a viewport needs tens
//! of tiles, so diffing against the previous set is not worth it.

use super::source::TileSource;
use crate::core::{
    constants::TILE_SIZE,
    geo::{Point, TileCoord},
    viewport::ViewState,
};
use serde::{Deserialize, Serialize};

/// A tile positioned on screen, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub url: String,
    /// Top-left corner relative to the viewport
    pub screen: Point,
    pub size: f64,
}

impl TilePlacement {
    /// Bottom-right corner relative to the viewport
    pub fn screen_max(&self) -> Point {
        self.screen.add(&Point::new(self.size, self.size))
    }
}

/// Inclusive range of raw (unwrapped) tile indices covering a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl TileRange {
    pub fn columns(&self) -> i64 {
        self.max_x - self.min_x + 1
    }

    pub fn rows(&self) -> i64 {
        self.max_y - self.min_y + 1
    }
}

pub struct TileGrid;

impl TileGrid {
    /// Raw tile bounds of the viewport, before wrapping or pole exclusion.
    pub fn range(view: &ViewState) -> TileRange {
        let tile = TILE_SIZE as f64;
        let top_left = view.top_left_world();
        let bottom_right = view.bottom_right_world();
        TileRange {
            min_x: (top_left.x / tile).floor() as i64,
            max_x: (bottom_right.x / tile).floor() as i64,
            min_y: (top_left.y / tile).floor() as i64,
            max_y: (bottom_right.y / tile).floor() as i64,
        }
    }

    /// Every tile needed to cover the viewport, with its URL and screen position.
    pub fn compute(view: &ViewState, source: &dyn TileSource) -> Vec<TilePlacement> {
        let tile = TILE_SIZE as f64;
        let range = Self::range(view);
        let top_left = view.top_left_world();

        let mut placements =
            Vec::with_capacity((range.columns().max(0) * range.rows().max(0)) as usize);
        for x in range.min_x..=range.max_x {
            for y in range.min_y..=range.max_y {
                let Some(coord) = TileCoord::wrapped(x, y, view.zoom) else {
                    continue;
                };
                let world = Point::new(x as f64 * tile, y as f64 * tile);
                placements.push(TilePlacement {
                    coord,
                    url: source.url(coord),
                    screen: world.subtract(&top_left),
                    size: tile,
                });
            }
        }
        placements
    }
}
