use crate::{
    core::{geo::Point, viewport::ViewState},
    layers::marker::Marker,
    rendering::context::Canvas,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    Tile,
    Marker,
    Route,
    Weather,
    Radius,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Marker => write!(f, "marker"),
            LayerType::Route => write!(f, "route"),
            LayerType::Weather => write!(f, "weather"),
            LayerType::Radius => write!(f, "radius"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            visible: true,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Handle to the engine's overlay layer, given to overlays when they bind.
///
/// It carries what an overlay needs to size its own surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    pub id: String,
    pub size: Point,
}

impl OverlayLayer {
    pub fn new(size: Point) -> Self {
        Self {
            id: "overlay-layer".to_string(),
            size,
        }
    }

    pub fn center(&self) -> Point {
        self.size.multiply(0.5)
    }
}

/// What an overlay exposes for painting.
#[derive(Debug, Clone, Copy)]
pub enum OverlaySurface<'a> {
    /// One positioned element per marker
    Markers(&'a [Marker]),
    /// A single shared drawing surface
    Canvas(&'a Canvas),
}

/// A layer stacked above the tiles that follows the view.
///
/// Overlays bind to the engine's [`OverlayLayer`] in [`Overlay::init`] and
/// are told about every view change afterwards. An overlay that was never
/// initialized is skipped by the coordinator.
pub trait Overlay: std::any::Any {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn layer_type(&self) -> LayerType;
    fn z_index(&self) -> i32;
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Binds to the overlay layer and creates the overlay's surface
    fn init(&mut self, host: &OverlayLayer);

    fn is_initialized(&self) -> bool;

    /// Recompute screen positions and redraw for the new view
    fn on_view_changed(&mut self, view: &ViewState);

    fn surface(&self) -> OverlaySurface<'_>;

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
