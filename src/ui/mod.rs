pub mod tabs;

#[cfg(feature = "egui")]
pub mod widget;

pub use tabs::{Panel, PanelTab, PanelTabs};

#[cfg(feature = "egui")]
pub use widget::{MapWidget, MapWidgetExt};
