use crate::{
    core::viewport::ViewState,
    layers::base::{Overlay, OverlayLayer},
};

use crate::prelude::HashMap;

/// Listener invoked after every render with the new view
pub type ViewListener = Box<dyn FnMut(&ViewState)>;

/// Owns the overlays stacked on the map and notifies them after each render.
///
/// Overlays are kept by id and visited in z-index order. Plain callbacks can
/// be registered too, for collaborators that only need to watch the view.
pub struct OverlayManager {
    /// All overlays indexed by ID
    overlays: HashMap<String, Box<dyn Overlay>>,
    /// Ordered list of overlay IDs (sorted by z-index)
    render_order: Vec<String>,
    listeners: Vec<ViewListener>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self {
            overlays: HashMap::default(),
            render_order: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Adds an overlay, replacing any overlay with the same id
    pub fn add(&mut self, overlay: Box<dyn Overlay>) {
        let overlay_id = overlay.id().to_string();
        let z_index = overlay.z_index();

        if self.overlays.insert(overlay_id.clone(), overlay).is_some() {
            log::warn!("overlay '{}' replaced", overlay_id);
            self.render_order.retain(|id| id != &overlay_id);
        }

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.overlays
                    .get(id)
                    .map(|o| o.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, overlay_id);
    }

    pub fn remove(&mut self, overlay_id: &str) -> Option<Box<dyn Overlay>> {
        self.render_order.retain(|id| id != overlay_id);
        self.overlays.remove(overlay_id)
    }

    pub fn get(&self, overlay_id: &str) -> Option<&dyn Overlay> {
        self.overlays.get(overlay_id).map(|o| o.as_ref())
    }

    /// First overlay of concrete type `T`, in render order
    pub fn find<T: Overlay>(&self) -> Option<&T> {
        self.render_order
            .iter()
            .filter_map(|id| self.overlays.get(id))
            .find_map(|o| o.as_any().downcast_ref::<T>())
    }

    /// First overlay of concrete type `T`, mutably
    pub fn find_mut<T: Overlay>(&mut self) -> Option<&mut T> {
        let id = self
            .render_order
            .iter()
            .find(|id| {
                self.overlays
                    .get(*id)
                    .map(|o| o.as_any().is::<T>())
                    .unwrap_or(false)
            })?
            .clone();
        self.overlays
            .get_mut(&id)
            .and_then(|o| o.as_any_mut().downcast_mut::<T>())
    }

    pub fn on_view_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&ViewState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Binds every overlay that has not been initialized yet
    pub fn init_pending(&mut self, host: &OverlayLayer) {
        for id in &self.render_order {
            if let Some(overlay) = self.overlays.get_mut(id) {
                if !overlay.is_initialized() {
                    log::debug!("binding overlay '{}' to {}", id, host.id);
                    overlay.init(host);
                }
            }
        }
    }

    /// Tells every initialized overlay, then every listener, about `view`.
    /// Overlays that were never initialized are skipped.
    pub fn notify(&mut self, view: &ViewState) {
        for id in &self.render_order {
            if let Some(overlay) = self.overlays.get_mut(id) {
                if overlay.is_initialized() {
                    overlay.on_view_changed(view);
                }
            }
        }
        for listener in &mut self.listeners {
            listener(view);
        }
    }

    /// Overlays in render order (lowest z-index first)
    pub fn overlays(&self) -> impl Iterator<Item = &dyn Overlay> {
        self.render_order
            .iter()
            .filter_map(|id| self.overlays.get(id).map(|o| o.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::layers::{marker::MarkerLayer, radius::RadiusLayer, route::RouteLayer};
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = OverlayManager::new();
        manager.add(Box::new(MarkerLayer::default()));
        manager.add(Box::new(RouteLayer::default()));
        manager.add(Box::new(RadiusLayer::default()));

        let ids: Vec<_> = manager.overlays().map(|o| o.id().to_string()).collect();
        assert_eq!(ids, vec!["radius", "route", "markers"]);
    }

    #[test]
    fn test_uninitialized_overlays_skipped() {
        let mut manager = OverlayManager::new();
        manager.add(Box::new(MarkerLayer::default()));
        manager
            .find_mut::<MarkerLayer>()
            .expect("marker layer")
            .add_job_marker(33.749, -84.388);

        let view = crate::core::viewport::ViewState::default();
        manager.notify(&view);
        let marker = manager.find::<MarkerLayer>().and_then(|l| l.job_marker()).cloned();
        assert!(marker.expect("job marker").element().is_none());

        manager.init_pending(&OverlayLayer::new(Point::new(800.0, 600.0)));
        manager.notify(&view);
        let layer = manager.find::<MarkerLayer>().expect("marker layer");
        assert!(layer.job_marker().and_then(|m| m.element()).is_some());
    }

    #[test]
    fn test_listeners_called_after_overlays() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);

        let mut manager = OverlayManager::new();
        manager.on_view_changed(move |_| seen.set(seen.get() + 1));
        manager.notify(&crate::core::viewport::ViewState::default());
        manager.notify(&crate::core::viewport::ViewState::default());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut manager = OverlayManager::new();
        manager.add(Box::new(MarkerLayer::default()));
        manager.add(Box::new(MarkerLayer::default()));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.overlays().count(), 1);

        assert!(manager.remove("markers").is_some());
        assert!(manager.is_empty());
        assert!(manager.find::<MarkerLayer>().is_none());
    }
}
