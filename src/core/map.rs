use crate::{
    core::{
        config::MapOptions,
        constants::{JOB_ZOOM, USER_LOCATION_ZOOM},
        geo::{LatLng, Point},
        viewport::ViewState,
    },
    input::{
        events::{EventHandled, InputEvent},
        handler::{Action, InputHandler},
    },
    layers::{
        base::{Overlay, OverlayLayer},
        manager::OverlayManager,
        marker::MarkerLayer,
        radius::RadiusLayer,
        route::RouteLayer,
        tile::TileLayer,
    },
    tiles::{grid::TilePlacement, source::BaseLayers},
};

/// The element the map is mounted into
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: String,
    pub size: Point,
    /// Loading text shown until the map takes over
    pub placeholder: Option<String>,
}

impl Container {
    pub fn new(id: impl Into<String>, size: Point) -> Self {
        Self {
            id: id.into(),
            size,
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    fn has_usable_size(&self) -> bool {
        valid_size(self.size)
    }
}

fn valid_size(size: Point) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

/// The layers created by [`MapEngine::init`]
struct Mounted {
    container: Container,
    tile_layer: TileLayer,
    overlay_layer: OverlayLayer,
}

/// A slippy map: one view, a tile layer and the overlays stacked on top.
///
/// Nothing is drawn until [`init`](Self::init) mounts the engine into a
/// container. Every change to the view goes through [`render`](Self::render),
/// which rebuilds the tile set and then tells the overlays. Operations never
/// fail: bad input is clamped, or logged and ignored.
pub struct MapEngine {
    options: MapOptions,
    view: ViewState,
    base_layers: BaseLayers,
    input: InputHandler,
    overlays: OverlayManager,
    mounted: Option<Mounted>,
}

impl MapEngine {
    pub fn new(options: MapOptions) -> Self {
        let view = ViewState::new(
            options.default_center,
            options.default_zoom,
            Point::new(800.0, 600.0),
        );
        let base_layers = options.base_layers();
        Self {
            options,
            view,
            base_layers,
            input: InputHandler::new(),
            overlays: OverlayManager::new(),
            mounted: None,
        }
    }

    /// Mounts the map into `container`.
    ///
    /// Removes the placeholder, creates the tile layer and the overlay layer,
    /// initializes overlays registered so far and renders. A missing or
    /// zero-sized container is logged and ignored, as is a second call.
    pub fn init(&mut self, container: Option<Container>) {
        let Some(mut container) = container else {
            log::warn!("map container not found; map not initialized");
            return;
        };
        if !container.has_usable_size() {
            log::warn!(
                "map container '{}' has no usable size ({}x{}); map not initialized",
                container.id,
                container.size.x,
                container.size.y
            );
            return;
        }
        if self.mounted.is_some() {
            log::warn!("map already initialized; ignoring container '{}'", container.id);
            return;
        }

        if let Some(placeholder) = container.placeholder.take() {
            log::debug!("removed placeholder '{}'", placeholder);
        }
        self.view.set_size(container.size);

        let tile_layer = TileLayer::new(container.size);
        let overlay_layer = OverlayLayer::new(container.size);
        self.overlays.init_pending(&overlay_layer);

        log::info!(
            "map initialized in '{}' at {:?} zoom {}",
            container.id,
            self.view.center,
            self.view.zoom
        );
        self.mounted = Some(Mounted {
            container,
            tile_layer,
            overlay_layer,
        });
        self.render();
    }

    pub fn is_initialized(&self) -> bool {
        self.mounted.is_some()
    }

    /// Ids of the container's children, bottom first
    pub fn layer_ids(&self) -> Vec<&str> {
        self.mounted
            .as_ref()
            .map(|m| vec![m.tile_layer.id(), m.overlay_layer.id.as_str()])
            .unwrap_or_default()
    }

    pub fn container(&self) -> Option<&Container> {
        self.mounted.as_ref().map(|m| &m.container)
    }

    /// Rebuilds the tile set for the current view, then notifies overlays.
    /// Does nothing before [`init`](Self::init).
    pub fn render(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        mounted.tile_layer.rebuild(&self.view, &self.base_layers);
        self.overlays.notify(&self.view);
    }

    /// Centers the map on a coordinate and discards any pending drag
    pub fn set_center(&mut self, lat: f64, lng: f64) {
        if !lat.is_finite() || !lng.is_finite() {
            log::warn!("ignoring non-finite center ({}, {})", lat, lng);
            return;
        }
        self.view.set_center(LatLng::new(lat, lng));
        self.render();
    }

    /// Sets the zoom around the viewport middle
    pub fn set_zoom(&mut self, zoom: i32) {
        self.set_zoom_at(zoom, None);
    }

    /// Sets the zoom keeping the map point under `anchor` in place.
    /// Out-of-range zooms are clamped; an unchanged zoom does nothing.
    pub fn set_zoom_at(&mut self, zoom: i32, anchor: Option<Point>) {
        if self.view.zoom_to(zoom, anchor) {
            log::debug!("zoom -> {}", self.view.zoom);
            self.render();
        }
    }

    /// Switches the tile source. Unknown keys fall back to the street layer.
    pub fn set_base_layer(&mut self, key: &str) {
        if self.base_layers.set_active(key) {
            log::info!("base layer -> {}", key);
        } else {
            log::warn!("unknown base layer '{}', using fallback tiles", key);
        }
        self.render();
    }

    pub fn base_layers(&self) -> &BaseLayers {
        &self.base_layers
    }

    /// The stored center; it lags the picture by the pending drag offset
    pub fn center(&self) -> LatLng {
        self.view.center
    }

    /// The coordinate under the middle of the viewport
    pub fn visible_center(&self) -> LatLng {
        self.view.visible_center()
    }

    pub fn zoom(&self) -> u8 {
        self.view.zoom
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn overlay_layer(&self) -> Option<&OverlayLayer> {
        self.mounted.as_ref().map(|m| &m.overlay_layer)
    }

    pub fn tile_layer(&self) -> Option<&TileLayer> {
        self.mounted.as_ref().map(|m| &m.tile_layer)
    }

    /// Tiles placed by the last render
    pub fn tiles(&self) -> &[TilePlacement] {
        self.tile_layer().map(TileLayer::tiles).unwrap_or(&[])
    }

    /// Registers an overlay. On a mounted map it is bound and positioned
    /// right away; otherwise binding waits for [`init`](Self::init).
    pub fn add_overlay(&mut self, mut overlay: Box<dyn Overlay>) {
        if let Some(mounted) = &self.mounted {
            overlay.init(&mounted.overlay_layer);
            overlay.on_view_changed(&self.view);
        }
        log::debug!("overlay '{}' registered", overlay.id());
        self.overlays.add(overlay);
    }

    pub fn remove_overlay(&mut self, id: &str) -> Option<Box<dyn Overlay>> {
        self.overlays.remove(id)
    }

    pub fn overlay<T: Overlay>(&self) -> Option<&T> {
        self.overlays.find::<T>()
    }

    pub fn overlay_mut<T: Overlay>(&mut self) -> Option<&mut T> {
        self.overlays.find_mut::<T>()
    }

    /// Overlays in paint order
    pub fn overlays(&self) -> impl Iterator<Item = &dyn Overlay> {
        self.overlays.overlays()
    }

    /// Calls `listener` after every render
    pub fn on_view_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&ViewState) + 'static,
    {
        self.overlays.on_view_changed(listener);
    }

    pub fn input(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    /// Feeds one pointer, touch or resize event through the gesture handler
    pub fn handle_input(&mut self, event: &InputEvent) -> EventHandled {
        let actions = self.input.handle_event(event);
        if actions.is_empty() {
            return EventHandled::NotHandled;
        }
        for action in actions {
            match action {
                Action::Pan { delta } => {
                    self.view.pan_by(delta);
                    self.render();
                }
                Action::Zoom { step, anchor } => {
                    self.set_zoom_at(self.view.zoom as i32 + step, anchor);
                }
                Action::Resize { size } => self.resize(size),
            }
        }
        EventHandled::Handled
    }

    /// Resizes the viewport and both child layers, then renders
    pub fn resize(&mut self, size: Point) {
        if !valid_size(size) {
            log::warn!("ignoring resize to {}x{}", size.x, size.y);
            return;
        }
        if size == self.view.size {
            return;
        }
        self.view.set_size(size);
        if let Some(mounted) = self.mounted.as_mut() {
            mounted.container.size = size;
            mounted.overlay_layer.size = size;
        }
        self.render();
    }

    pub fn lat_lng_to_screen(&self, lat_lng: &LatLng) -> Point {
        self.view.lat_lng_to_screen(lat_lng)
    }

    pub fn screen_to_lat_lng(&self, screen: &Point) -> LatLng {
        self.view.screen_to_lat_lng(screen)
    }

    /// Drops the old job marker, centers on `position` at street zoom and
    /// marks it with `label`.
    pub fn show_job_location(&mut self, position: LatLng, label: impl Into<String>) {
        if let Some(markers) = self.overlay_mut::<MarkerLayer>() {
            markers.clear_job_marker();
        }

        self.view.set_center(position);
        self.view.zoom_to(JOB_ZOOM as i32, None);
        self.render();

        let label = label.into();
        match self.overlay_mut::<MarkerLayer>() {
            Some(markers) => {
                let id = markers.add_job_marker(position.lat, position.lng);
                if let Some(marker) = markers.marker_mut(id) {
                    marker.label = label;
                }
            }
            None => log::warn!("no marker overlay registered; job '{}' not marked", label),
        }
    }

    /// Removes the job marker and the route to it
    pub fn clear_job_view(&mut self) {
        if let Some(markers) = self.overlay_mut::<MarkerLayer>() {
            markers.clear_job_marker();
        }
        if let Some(route) = self.overlay_mut::<RouteLayer>() {
            route.clear_route();
        }
    }

    /// Marks the user's position and centers on it
    pub fn show_user_location(&mut self, position: LatLng) {
        match self.overlay_mut::<MarkerLayer>() {
            Some(markers) => {
                markers.set_user_marker(position.lat, position.lng);
            }
            None => log::warn!("no marker overlay registered; user location not marked"),
        }
        self.view.set_center(position);
        self.view.zoom_to(USER_LOCATION_ZOOM as i32, None);
        self.render();
    }

    /// Draws a work-area circle around whatever is in the middle of the view
    pub fn set_radius_at_center(&mut self, meters: f64) {
        let center = self.visible_center();
        match self.overlay_mut::<RadiusLayer>() {
            Some(radius) => radius.set_radius(center, meters),
            None => log::warn!("no radius overlay registered"),
        }
    }
}

impl Default for MapEngine {
    fn default() -> Self {
        Self::new(MapOptions::default())
    }
}
