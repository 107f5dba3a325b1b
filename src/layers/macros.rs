//! Macros to reduce boilerplate in overlay implementations

/// Implements the property-backed part of [`Overlay`](crate::layers::base::Overlay):
/// id(), name(), layer_type(), z_index(), visibility and the `Any` casts.
///
/// Usage:
/// ```ignore
/// impl Overlay for MyLayer {
///     crate::impl_overlay_properties!(properties);
///     // init, is_initialized, on_view_changed, surface
/// }
/// ```
#[macro_export]
macro_rules! impl_overlay_properties {
    ($properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.$properties_field.layer_type
        }

        fn z_index(&self) -> i32 {
            self.$properties_field.z_index
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

/// Implements init()/is_initialized() for canvas overlays holding
/// `canvas: Canvas` and `initialized: bool`, then redraws.
#[macro_export]
macro_rules! impl_canvas_init {
    () => {
        fn init(&mut self, host: &$crate::layers::base::OverlayLayer) {
            self.canvas.resize(host.size);
            self.initialized = true;
            self.redraw();
        }

        fn is_initialized(&self) -> bool {
            self.initialized
        }
    };
}
