pub mod context;

// Re-export main types
pub use context::{Canvas, Color, DrawCommand, LineRenderStyle, ShapeRenderStyle};
