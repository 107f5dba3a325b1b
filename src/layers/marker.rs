use crate::{
    core::{
        constants::MARKER_ICON_SIZE,
        geo::{LatLng, Point},
        viewport::ViewState,
    },
    layers::base::{LayerProperties, LayerType, Overlay, OverlayLayer, OverlaySurface},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// The client's job site; at most one at a time
    Job,
    /// A supply store near the job
    Store,
    /// The user's own location; at most one at a time
    User,
}

/// The on-screen element a marker owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerElement {
    /// Pixel position of the marker's anchor inside the overlay layer
    pub screen: Point,
    /// False when the anchor is off screen by more than an icon
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: u64,
    pub position: LatLng,
    pub kind: MarkerKind,
    pub label: String,
    pub metadata: serde_json::Value,
    element: Option<MarkerElement>,
}

impl Marker {
    fn new(id: u64, position: LatLng, kind: MarkerKind, label: String) -> Self {
        Self {
            id,
            position,
            kind,
            label,
            metadata: serde_json::Value::Null,
            element: None,
        }
    }

    /// Current element, once the marker has been positioned for a view
    pub fn element(&self) -> Option<&MarkerElement> {
        self.element.as_ref()
    }

    fn reposition(&mut self, view: &ViewState) {
        let screen = view.lat_lng_to_screen(&self.position);
        let margin_x = MARKER_ICON_SIZE.0 as f64;
        let margin_y = MARKER_ICON_SIZE.1 as f64;
        let visible = screen.x >= -margin_x
            && screen.y >= -margin_y
            && screen.x <= view.size.x + margin_x
            && screen.y <= view.size.y + margin_y;
        match self.element.as_mut() {
            Some(element) => {
                element.screen = screen;
                element.visible = visible;
            }
            None => self.element = Some(MarkerElement { screen, visible }),
        }
    }
}

/// Point markers for the job site, nearby stores and the user.
pub struct MarkerLayer {
    properties: LayerProperties,
    markers: Vec<Marker>,
    view: Option<ViewState>,
    initialized: bool,
    next_id: u64,
}

impl MarkerLayer {
    pub fn new(id: String, name: String) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Marker).with_z_index(30);
        Self {
            properties,
            markers: Vec::new(),
            view: None,
            initialized: false,
            next_id: 1,
        }
    }

    /// Places the job marker. Callers clear the previous one first; if they
    /// did not, the older marker is dropped so only one job marker exists.
    pub fn add_job_marker(&mut self, lat: f64, lng: f64) -> u64 {
        if self.job_marker().is_some() {
            log::warn!("job marker added without clearing the previous one; replacing it");
            self.clear_job_marker();
        }
        self.push(LatLng::new(lat, lng), MarkerKind::Job, "Job Location".to_string())
    }

    pub fn clear_job_marker(&mut self) {
        self.markers.retain(|m| m.kind != MarkerKind::Job);
    }

    pub fn add_store_marker(&mut self, lat: f64, lng: f64, label: impl Into<String>) -> u64 {
        self.push(LatLng::new(lat, lng), MarkerKind::Store, label.into())
    }

    pub fn clear_store_markers(&mut self) {
        self.markers.retain(|m| m.kind != MarkerKind::Store);
    }

    /// Places or moves the single user-location marker
    pub fn set_user_marker(&mut self, lat: f64, lng: f64) -> u64 {
        let position = LatLng::new(lat, lng);
        if let Some(marker) = self.markers.iter_mut().find(|m| m.kind == MarkerKind::User) {
            marker.position = position;
            let id = marker.id;
            if let Some(view) = self.view {
                marker.reposition(&view);
            }
            return id;
        }
        self.push(position, MarkerKind::User, "Your Location".to_string())
    }

    pub fn clear_user_marker(&mut self) {
        self.markers.retain(|m| m.kind != MarkerKind::User);
    }

    /// Mutable access to a marker, e.g. to relabel it or attach metadata
    pub fn marker_mut(&mut self, id: u64) -> Option<&mut Marker> {
        self.markers.iter_mut().find(|m| m.id == id)
    }

    pub fn job_marker(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind == MarkerKind::Job)
    }

    pub fn store_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.kind == MarkerKind::Store)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Moves every element to its position in the last view seen.
    pub fn reposition_all(&mut self) {
        let Some(view) = self.view else {
            return;
        };
        for marker in &mut self.markers {
            marker.reposition(&view);
        }
    }

    fn push(&mut self, position: LatLng, kind: MarkerKind, label: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let mut marker = Marker::new(id, position, kind, label);
        if let Some(view) = self.view {
            marker.reposition(&view);
        }
        self.markers.push(marker);
        id
    }
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::new("markers".to_string(), "Markers".to_string())
    }
}

impl Overlay for MarkerLayer {
    crate::impl_overlay_properties!(properties);

    fn init(&mut self, _host: &OverlayLayer) {
        self.initialized = true;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn on_view_changed(&mut self, view: &ViewState) {
        self.view = Some(*view);
        self.reposition_all();
    }

    fn surface(&self) -> OverlaySurface<'_> {
        OverlaySurface::Markers(&self.markers)
    }
}
