pub mod grid;
pub mod source;

// Re-exports for convenience
pub use grid::{TileGrid, TilePlacement};
pub use source::{BaseLayers, TileSource, UrlTemplate};
